//! Compiled-contract artifacts for deployment and source verification.
//!
//! The delegator's creation bytecode and standard-JSON source are not baked
//! into this tool; they ship as a JSON artifact produced by the Solidity
//! build and are loaded at startup.

use std::path::Path;

use alloy::primitives::Bytes;
use anyhow::{Context, Result};
use serde::Deserialize;

/// A compiled contract: everything needed to create it on-chain and to
/// verify its source on a block explorer afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployArtifact {
    /// Fully qualified name, e.g. `MErc20Delegator.sol:MErc20Delegator`.
    pub contract_name: String,
    /// Creation bytecode (constructor arguments not included).
    pub bytecode: Bytes,
    /// Standard-JSON compiler input, forwarded verbatim to the verifier.
    pub source: serde_json::Value,
    /// Compiler release the bytecode was built with.
    pub compiler_version: String,
    /// Optimizer runs setting used by the build.
    #[serde(default = "default_optimization_runs")]
    pub optimization_runs: u32,
}

fn default_optimization_runs() -> u32 {
    200
}

impl DeployArtifact {
    /// Load an artifact from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading deploy artifact {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing deploy artifact {}", path.display()))
    }

    /// Creation payload: bytecode followed by ABI-encoded constructor args.
    pub fn init_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        Bytes::from(code)
    }

    /// Standard-JSON source as a string, the shape the verifier expects.
    pub fn source_json(&self) -> Result<String> {
        serde_json::to_string(&self.source).context("serializing artifact source")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT_JSON: &str = r#"{
        "contractName": "MErc20Delegator.sol:MErc20Delegator",
        "bytecode": "0x608060405260aa",
        "source": {"language": "Solidity", "sources": {}},
        "compilerVersion": "v0.5.7+commit.6da8b019",
        "optimizationRuns": 200
    }"#;

    #[test]
    fn test_parse_artifact() {
        let artifact: DeployArtifact = serde_json::from_str(ARTIFACT_JSON).unwrap();
        assert_eq!(artifact.contract_name, "MErc20Delegator.sol:MErc20Delegator");
        assert_eq!(artifact.compiler_version, "v0.5.7+commit.6da8b019");
        assert_eq!(artifact.optimization_runs, 200);
        assert_eq!(artifact.bytecode.len(), 7);
    }

    #[test]
    fn test_optimization_runs_defaults() {
        let artifact: DeployArtifact = serde_json::from_str(
            r#"{
                "contractName": "A.sol:A",
                "bytecode": "0x00",
                "source": {},
                "compilerVersion": "v0.5.7+commit.6da8b019"
            }"#,
        )
        .unwrap();
        assert_eq!(artifact.optimization_runs, 200);
    }

    #[test]
    fn test_init_code_appends_constructor_args() {
        let artifact: DeployArtifact = serde_json::from_str(ARTIFACT_JSON).unwrap();
        let args = [0x01u8, 0x02, 0x03];
        let init_code = artifact.init_code(&args);

        assert_eq!(&init_code[..artifact.bytecode.len()], artifact.bytecode.as_ref());
        assert_eq!(&init_code[artifact.bytecode.len()..], &args);
    }

    #[test]
    fn test_source_json_round_trips() {
        let artifact: DeployArtifact = serde_json::from_str(ARTIFACT_JSON).unwrap();
        let source = artifact.source_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&source).unwrap();
        assert_eq!(parsed["language"], "Solidity");
    }
}

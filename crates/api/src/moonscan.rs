//! Moonscan source-verification API client.
//!
//! Verification is a courtesy to explorers, not part of the deployment's
//! critical path: callers log a failed verification and move on.

use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Code format for standard-JSON submissions.
const CODE_FORMAT: &str = "solidity-standard-json-input";

/// Everything the explorer needs to reproduce and check a build.
#[derive(Debug, Clone)]
pub struct VerifySourceRequest {
    /// Address of the freshly deployed contract.
    pub contract_address: Address,
    /// Standard-JSON compiler input as a string.
    pub source_code: String,
    /// Fully qualified contract name, e.g. `MErc20Delegator.sol:MErc20Delegator`.
    pub contract_name: String,
    /// Compiler release, e.g. `v0.5.7+commit.6da8b019`.
    pub compiler_version: String,
    /// Optimizer runs the build used.
    pub optimization_runs: u32,
    /// ABI-encoded constructor arguments, hex without the 0x prefix.
    pub constructor_arguments: String,
}

/// Explorer response envelope; `status` is `"1"` on acceptance and the
/// `result` then carries a lookup GUID.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationResponse {
    pub status: String,
    pub message: String,
    pub result: String,
}

impl VerificationResponse {
    /// Whether the explorer accepted the submission for processing.
    pub fn accepted(&self) -> bool {
        self.status == "1"
    }
}

#[derive(Serialize)]
struct VerifyForm<'a> {
    apikey: &'a str,
    module: &'static str,
    action: &'static str,
    contractaddress: String,
    #[serde(rename = "sourceCode")]
    source_code: &'a str,
    codeformat: &'static str,
    contractname: &'a str,
    compilerversion: &'a str,
    #[serde(rename = "optimizationUsed")]
    optimization_used: u8,
    runs: u32,
    #[serde(rename = "constructorArguments")]
    constructor_arguments: &'a str,
}

/// Moonscan API client.
#[derive(Debug, Clone)]
pub struct MoonscanClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl MoonscanClient {
    /// Create a client for the given API endpoint.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    /// The API endpoint this client posts to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Submit a contract for source verification.
    ///
    /// Returns the explorer's response envelope; transport failures and
    /// non-success HTTP statuses are errors for the caller to log.
    pub async fn verify_source(&self, request: &VerifySourceRequest) -> Result<VerificationResponse> {
        let form = VerifyForm {
            apikey: &self.api_key,
            module: "contract",
            action: "verifysourcecode",
            contractaddress: format!("{:?}", request.contract_address),
            source_code: &request.source_code,
            codeformat: CODE_FORMAT,
            contractname: &request.contract_name,
            compilerversion: &request.compiler_version,
            optimization_used: 1,
            runs: request.optimization_runs,
            constructor_arguments: &request.constructor_arguments,
        };

        debug!(
            contract = %request.contract_address,
            api_url = %self.api_url,
            "Submitting source verification"
        );

        let response = self
            .client
            .post(&self.api_url)
            .form(&form)
            .send()
            .await
            .context("posting verification request")?
            .error_for_status()
            .context("verification endpoint rejected the request")?;

        let parsed: VerificationResponse = response
            .json()
            .await
            .context("parsing verification response")?;

        debug!(
            status = %parsed.status,
            message = %parsed.message,
            result = %parsed.result,
            "Verification response received"
        );

        Ok(parsed)
    }
}

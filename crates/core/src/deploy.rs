//! Market contract deployment.
//!
//! Deploys the delegator proxy with constructor parameters derived from the
//! environment registry and the market configuration, waits for
//! confirmation depth, then hands the result to the explorer for
//! best-effort source verification.

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolConstructor;
use anyhow::Result;
use tracing::{debug, info, warn};

use deployer_api::{MoonscanClient, VerifySourceRequest};
use deployer_chain::bindings::MErc20Delegator;
use deployer_chain::{DeployArtifact, TransactionSubmitter};

use crate::config::{DeployResult, DeploymentConfiguration, MarketConfiguration};
use crate::mantissa::initial_exchange_rate;

/// All deployed mTokens use 8 decimals regardless of the underlying.
const MTOKEN_DECIMALS: u8 = 8;

/// Deploys market contracts and submits them for source verification.
pub struct ContractDeployer<'a> {
    submitter: &'a TransactionSubmitter,
    artifact: &'a DeployArtifact,
    verifier: Option<&'a MoonscanClient>,
}

impl<'a> ContractDeployer<'a> {
    pub fn new(
        submitter: &'a TransactionSubmitter,
        artifact: &'a DeployArtifact,
        verifier: Option<&'a MoonscanClient>,
    ) -> Self {
        Self {
            submitter,
            artifact,
            verifier,
        }
    }

    /// Deploy one market contract and wait for confirmation depth.
    ///
    /// Source verification is attempted when a verifier is configured; its
    /// failure is logged and never fails the deployment.
    pub async fn deploy(
        &self,
        market: &MarketConfiguration,
        deployment: &DeploymentConfiguration,
    ) -> Result<DeployResult> {
        let contracts = deployment.environment.contracts();
        let exchange_rate = initial_exchange_rate(market.token_decimals);

        debug!(
            comptroller = %contracts.comptroller,
            interest_rate_model = %contracts.interest_rate_model,
            implementation = %contracts.mtoken_implementation,
            admin = %contracts.timelock,
            initial_exchange_rate = %exchange_rate,
            "Resolved deployment parameters"
        );

        let constructor = MErc20Delegator::constructorCall {
            underlying_: market.token_address,
            comptroller_: contracts.comptroller,
            interestRateModel_: contracts.interest_rate_model,
            initialExchangeRateMantissa_: exchange_rate,
            name_: market.mtoken_name.clone(),
            symbol_: market.mtoken_symbol.clone(),
            decimals_: MTOKEN_DECIMALS,
            admin_: contracts.timelock,
            implementation_: contracts.mtoken_implementation,
            becomeImplementationData_: Bytes::from(vec![0u8]),
        };
        let constructor_args = constructor.abi_encode();
        let init_code = self.artifact.init_code(&constructor_args);

        info!(symbol = %market.mtoken_symbol, "Deploying mToken contract");
        let deployed = self
            .submitter
            .submit_deployment(init_code, deployment.required_confirmations)
            .await?;
        info!(
            address = %deployed.address,
            tx_hash = %deployed.transaction_hash,
            "mToken contract deployed"
        );

        match self.verifier {
            Some(verifier) => {
                self.verify_source(verifier, deployed.address, &constructor_args)
                    .await;
            }
            None => {
                info!("Skipping source verification; no explorer API configured");
            }
        }

        Ok(DeployResult {
            contract_address: deployed.address,
            transaction_hash: deployed.transaction_hash,
        })
    }

    /// Best-effort explorer verification: every failure is logged and
    /// discarded.
    async fn verify_source(
        &self,
        verifier: &MoonscanClient,
        contract_address: Address,
        constructor_args: &[u8],
    ) {
        let source_code = match self.artifact.source_json() {
            Ok(source) => source,
            Err(e) => {
                warn!(error = %e, "Could not serialize artifact source; skipping verification");
                return;
            }
        };

        let request = VerifySourceRequest {
            contract_address,
            source_code,
            contract_name: self.artifact.contract_name.clone(),
            compiler_version: self.artifact.compiler_version.clone(),
            optimization_runs: self.artifact.optimization_runs,
            constructor_arguments: hex::encode(constructor_args),
        };

        match verifier.verify_source(&request).await {
            Ok(response) if response.accepted() => {
                info!(guid = %response.result, "Contract submitted for verification");
            }
            Ok(response) => {
                warn!(
                    status = %response.status,
                    message = %response.message,
                    result = %response.result,
                    "Explorer rejected verification; the contract may need manual verification"
                );
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "Contract verification failed; the deploy continues"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    #[test]
    fn test_constructor_encoding_matches_parameters() {
        let underlying = Address::repeat_byte(0x01);
        let constructor = MErc20Delegator::constructorCall {
            underlying_: underlying,
            comptroller_: Address::repeat_byte(0x02),
            interestRateModel_: Address::repeat_byte(0x03),
            initialExchangeRateMantissa_: initial_exchange_rate(6),
            name_: "Market USDC".to_string(),
            symbol_: "mUSDC".to_string(),
            decimals_: MTOKEN_DECIMALS,
            admin_: Address::repeat_byte(0x04),
            implementation_: Address::repeat_byte(0x05),
            becomeImplementationData_: Bytes::from(vec![0u8]),
        };

        let encoded = constructor.abi_encode();
        // First word: the underlying token address, right-aligned.
        assert_eq!(&encoded[12..32], underlying.as_slice());
        // Fourth word: the exchange-rate mantissa (2 * 10^14 for 6 decimals).
        assert_eq!(
            U256::from_be_slice(&encoded[96..128]),
            U256::from(200_000_000_000_000u64)
        );
    }
}

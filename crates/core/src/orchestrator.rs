//! End-to-end deployment orchestration.
//!
//! Markets are processed strictly in order, one at a time: deploy,
//! configure, build the governance proposal. Nothing is reported until
//! every market has fully completed; the per-market proposals are then
//! merged into the single proposal submitted to governance.

use anyhow::Result;
use tracing::info;

use deployer_api::MoonscanClient;
use deployer_chain::{DeployArtifact, TransactionSubmitter};

use crate::config::{ConfigureMarketResult, DeployResult, DeploymentConfiguration, MarketConfiguration};
use crate::configure::MarketConfigurer;
use crate::deploy::ContractDeployer;
use crate::proposal::{build_market_proposal, merge_proposals, ProposalData};

/// Everything a run produces, index-aligned across the per-market arrays.
#[derive(Debug, Clone)]
pub struct MarketsDeployReport {
    /// The merged governance proposal covering all markets.
    pub proposal: ProposalData,
    /// Configuration of each market, in deployment order.
    pub market_configurations: Vec<MarketConfiguration>,
    /// Deploy result of each market.
    pub deploy_results: Vec<DeployResult>,
    /// Configuration hashes of each market.
    pub configure_results: Vec<ConfigureMarketResult>,
}

/// Drives the full deploy-configure-propose sequence for a set of markets.
pub struct Orchestrator<'a> {
    submitter: &'a TransactionSubmitter,
    artifact: &'a DeployArtifact,
    verifier: Option<&'a MoonscanClient>,
}

impl<'a> Orchestrator<'a> {
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

    /// Deploy and wire every market, in order, and return the aggregate
    /// report with the merged governance proposal.
    pub async fn run(
        &self,
        markets: &[MarketConfiguration],
        deployment: &DeploymentConfiguration,
    ) -> Result<MarketsDeployReport> {
        let deployer = ContractDeployer::new(self.submitter, self.artifact, self.verifier);
        let configurer = MarketConfigurer::new(self.submitter);

        let mut deploy_results = Vec::with_capacity(markets.len());
        let mut configure_results = Vec::with_capacity(markets.len());
        let mut proposals = Vec::with_capacity(markets.len());

        for (index, market) in markets.iter().enumerate() {
            info!(
                market = index + 1,
                of = markets.len(),
                symbol = %market.mtoken_symbol,
                "Deploying market"
            );

            let deploy_result = deployer.deploy(market, deployment).await?;
            let configure_result = configurer
                .configure(deploy_result.contract_address, market, deployment)
                .await?;
            let proposal =
                build_market_proposal(deploy_result.contract_address, market, deployment);

            deploy_results.push(deploy_result);
            configure_results.push(configure_result);
            proposals.push(proposal);
        }

        Ok(MarketsDeployReport {
            proposal: merge_proposals(proposals),
            market_configurations: markets.to_vec(),
            deploy_results,
            configure_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use alloy::primitives::{Address, Bytes, B256, U256};
    use async_trait::async_trait;

    use deployer_chain::bindings::MErc20Delegator;
    use deployer_chain::{ChainClient, DeployedContract, RetryPolicy, TokenMetadata};

    use crate::config::UNLIMITED_BORROW_CAP;
    use crate::environment::Environment;
    use crate::mantissa::percent_to_mantissa;
    use alloy::sol_types::SolCall;

    /// Records every transaction and hands out deterministic hashes and
    /// contract addresses.
    #[derive(Default)]
    struct RecordingChain {
        calls: Mutex<Vec<(Address, Bytes, u64)>>,
        deployments: Mutex<Vec<(Bytes, u64)>>,
    }

    #[async_trait]
    impl ChainClient for RecordingChain {
        fn sender(&self) -> Address {
            Address::repeat_byte(0xaa)
        }

        async fn call_contract(
            &self,
            target: Address,
            calldata: Bytes,
            confirmations: u64,
        ) -> anyhow::Result<B256> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((target, calldata, confirmations));
            Ok(B256::with_last_byte(calls.len() as u8))
        }

        async fn deploy_contract(
            &self,
            init_code: Bytes,
            confirmations: u64,
        ) -> anyhow::Result<DeployedContract> {
            let mut deployments = self.deployments.lock().unwrap();
            deployments.push((init_code, confirmations));
            let n = deployments.len() as u8;
            Ok(DeployedContract {
                address: Address::repeat_byte(0xc0 + n),
                transaction_hash: B256::with_last_byte(0xd0 + n),
            })
        }

        async fn native_balance(&self, _address: Address) -> anyhow::Result<U256> {
            Ok(U256::MAX)
        }

        async fn token_metadata(&self, _token: Address) -> anyhow::Result<TokenMetadata> {
            Ok(TokenMetadata {
                symbol: "USDC".to_string(),
                decimals: 6,
            })
        }
    }

    fn artifact() -> DeployArtifact {
        serde_json::from_str(
            r#"{
                "contractName": "MErc20Delegator.sol:MErc20Delegator",
                "bytecode": "0x6080604052",
                "source": {"language": "Solidity", "sources": {}},
                "compilerVersion": "v0.5.7+commit.6da8b019",
                "optimizationRuns": 200
            }"#,
        )
        .unwrap()
    }

    fn deployment() -> DeploymentConfiguration {
        DeploymentConfiguration {
            environment: Environment::Moonbase,
            deployer: Address::repeat_byte(0xaa),
            moonscan_api_url: None,
            required_confirmations: 3,
            num_markets: 1,
        }
    }

    fn market(symbol: &str) -> MarketConfiguration {
        MarketConfiguration {
            token_address: Address::repeat_byte(0x01),
            chainlink_feed_address: Address::repeat_byte(0x02),
            token_symbol: symbol.to_string(),
            token_decimals: 6,
            mtoken_name: format!("Market {symbol}"),
            mtoken_symbol: format!("m{symbol}"),
            reserve_factor: 15,
            protocol_seize_share: 3,
            collateral_factor: 0,
            borrow_cap: UNLIMITED_BORROW_CAP,
        }
    }

    fn submitter(chain: Arc<RecordingChain>) -> TransactionSubmitter {
        TransactionSubmitter::with_policy(
            chain,
            RetryPolicy {
                retry_delay: Duration::from_millis(1),
                max_attempts: None,
            },
        )
    }

    #[tokio::test]
    async fn test_single_market_run() {
        let chain = Arc::new(RecordingChain::default());
        let submitter = submitter(chain.clone());
        let artifact = artifact();
        let orchestrator = Orchestrator::new(&submitter, &artifact, None);

        let report = orchestrator
            .run(&[market("USDC")], &deployment())
            .await
            .unwrap();

        // One deployment and three configuration calls.
        assert_eq!(chain.deployments.lock().unwrap().len(), 1);
        let calls = chain.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);

        // Every transaction waited for the configured confirmation depth.
        assert!(calls.iter().all(|(_, _, confirmations)| *confirmations == 3));
        assert!(chain
            .deployments
            .lock()
            .unwrap()
            .iter()
            .all(|(_, confirmations)| *confirmations == 3));

        // Three distinct configuration hashes, in step order.
        let configure = &report.configure_results[0];
        assert_ne!(configure.set_reserve_factor_hash, configure.set_protocol_seize_share_hash);
        assert_ne!(configure.set_protocol_seize_share_hash, configure.set_pending_admin_hash);

        // Uncapped market: six governance actions, seven proposal entries.
        assert_eq!(report.proposal.len(), 7);
        assert_eq!(report.deploy_results.len(), 1);
        assert_eq!(report.market_configurations.len(), 1);
    }

    #[tokio::test]
    async fn test_configuration_calls_target_new_market() {
        let chain = Arc::new(RecordingChain::default());
        let submitter = submitter(chain.clone());
        let artifact = artifact();
        let orchestrator = Orchestrator::new(&submitter, &artifact, None);

        let report = orchestrator
            .run(&[market("USDC")], &deployment())
            .await
            .unwrap();

        let market_address = report.deploy_results[0].contract_address;
        let calls = chain.calls.lock().unwrap();
        assert!(calls.iter().all(|(target, _, _)| *target == market_address));

        // First configuration call sets the reserve factor mantissa.
        let expected = MErc20Delegator::_setReserveFactorCall {
            newReserveFactorMantissa: percent_to_mantissa(15),
        }
        .abi_encode();
        assert_eq!(calls[0].1.as_ref(), expected.as_slice());
    }

    #[tokio::test]
    async fn test_multi_market_run_preserves_order() {
        let chain = Arc::new(RecordingChain::default());
        let submitter = submitter(chain.clone());
        let artifact = artifact();
        let orchestrator = Orchestrator::new(&submitter, &artifact, None);

        let mut second = market("WBTC");
        second.token_decimals = 8;
        second.borrow_cap = 100;

        let report = orchestrator
            .run(&[market("USDC"), second], &deployment())
            .await
            .unwrap();

        assert_eq!(report.deploy_results.len(), 2);
        assert_eq!(report.configure_results.len(), 2);
        assert_ne!(
            report.deploy_results[0].contract_address,
            report.deploy_results[1].contract_address
        );

        // First market: 7 entries; second adds its borrow cap: 8 more.
        assert_eq!(report.proposal.len(), 15);

        // The merged proposal keeps per-market order: the first market's
        // oracle-feed entry leads, the second market's borrow cap closes.
        let oracle = deployment().environment.contracts().oracle;
        assert_eq!(report.proposal.targets[0], oracle);
        assert_eq!(
            report.proposal.signatures[14],
            "_setMarketBorrowCaps(address[],uint256[])"
        );
    }
}

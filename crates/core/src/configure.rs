//! Post-deploy market configuration.
//!
//! Three transactions, strictly ordered: reserve factor, protocol seize
//! share, pending admin. Each goes through the submitter's retry loop, so
//! a step either lands or the run blocks until the operator intervenes.
//! The timelock must later call `_acceptAdmin` to finish the admin
//! transfer; that happens through governance, not here.

use alloy::primitives::{Address, B256};
use alloy::sol_types::SolCall;
use anyhow::Result;
use tracing::{debug, info};

use deployer_chain::bindings::{signatures, MErc20Delegator};
use deployer_chain::{Operation, TransactionSubmitter};

use crate::config::{ConfigureMarketResult, DeploymentConfiguration, MarketConfiguration};
use crate::mantissa::percent_to_mantissa;

/// Runs the fixed post-deploy configuration sequence against a new market.
pub struct MarketConfigurer<'a> {
    submitter: &'a TransactionSubmitter,
}

impl<'a> MarketConfigurer<'a> {
    pub fn new(submitter: &'a TransactionSubmitter) -> Self {
        Self { submitter }
    }

    /// Configure a freshly deployed market, returning the three
    /// transaction hashes in step order.
    pub async fn configure(
        &self,
        mtoken_address: Address,
        market: &MarketConfiguration,
        deployment: &DeploymentConfiguration,
    ) -> Result<ConfigureMarketResult> {
        let set_reserve_factor_hash = self
            .set_reserve_factor(mtoken_address, market, deployment)
            .await?;
        let set_protocol_seize_share_hash = self
            .set_protocol_seize_share(mtoken_address, market, deployment)
            .await?;
        let set_pending_admin_hash = self.set_pending_admin(mtoken_address, deployment).await?;

        info!(market = %mtoken_address, "Market configured");

        Ok(ConfigureMarketResult {
            set_reserve_factor_hash,
            set_protocol_seize_share_hash,
            set_pending_admin_hash,
        })
    }

    async fn set_reserve_factor(
        &self,
        mtoken_address: Address,
        market: &MarketConfiguration,
        deployment: &DeploymentConfiguration,
    ) -> Result<B256> {
        let mantissa = percent_to_mantissa(market.reserve_factor);
        debug!(mantissa = %mantissa, "Setting reserve factor");

        let operation = Operation {
            name: signatures::SET_RESERVE_FACTOR,
            target: mtoken_address,
            calldata: MErc20Delegator::_setReserveFactorCall {
                newReserveFactorMantissa: mantissa,
            }
            .abi_encode()
            .into(),
        };
        let hash = self
            .submitter
            .submit(&operation, deployment.required_confirmations)
            .await?;
        info!(tx_hash = %hash, "Reserve factor set");
        Ok(hash)
    }

    async fn set_protocol_seize_share(
        &self,
        mtoken_address: Address,
        market: &MarketConfiguration,
        deployment: &DeploymentConfiguration,
    ) -> Result<B256> {
        let mantissa = percent_to_mantissa(market.protocol_seize_share);
        debug!(mantissa = %mantissa, "Setting protocol seize share");

        let operation = Operation {
            name: signatures::SET_PROTOCOL_SEIZE_SHARE,
            target: mtoken_address,
            calldata: MErc20Delegator::_setProtocolSeizeShareCall {
                newProtocolSeizeShareMantissa: mantissa,
            }
            .abi_encode()
            .into(),
        };
        let hash = self
            .submitter
            .submit(&operation, deployment.required_confirmations)
            .await?;
        info!(tx_hash = %hash, "Protocol seize share set");
        Ok(hash)
    }

    async fn set_pending_admin(
        &self,
        mtoken_address: Address,
        deployment: &DeploymentConfiguration,
    ) -> Result<B256> {
        let timelock = deployment.environment.contracts().timelock;
        debug!(timelock = %timelock, "Setting pending admin to timelock");

        let operation = Operation {
            name: signatures::SET_PENDING_ADMIN,
            target: mtoken_address,
            calldata: MErc20Delegator::_setPendingAdminCall {
                newPendingAdmin: timelock,
            }
            .abi_encode()
            .into(),
        };
        let hash = self
            .submitter
            .submit(&operation, deployment.required_confirmations)
            .await?;
        info!(tx_hash = %hash, "Pending admin set");
        Ok(hash)
    }
}

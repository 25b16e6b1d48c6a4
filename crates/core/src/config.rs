//! Configuration and result records for a deployment run.
//!
//! All of these are immutable value records: created once, passed along,
//! never mutated.

use alloy::primitives::{Address, B256};
use serde::Serialize;

use crate::environment::Environment;

/// Borrow-cap sentinel meaning "no cap". Zero is also the on-chain value
/// the comptroller treats as uncapped, so the sentinel never collides with
/// a real cap.
pub const UNLIMITED_BORROW_CAP: u64 = 0;

/// Everything that defines one new market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConfiguration {
    /// Underlying ERC-20 token address.
    pub token_address: Address,
    /// Chainlink feed for the underlying token.
    pub chainlink_feed_address: Address,
    /// Symbol of the underlying token, read from the chain.
    pub token_symbol: String,
    /// Decimals of the underlying token, read from the chain.
    pub token_decimals: u8,
    /// Display name of the new mToken.
    pub mtoken_name: String,
    /// Symbol of the new mToken.
    pub mtoken_symbol: String,
    /// Reserve factor as a whole-number percent (15 = 15%).
    pub reserve_factor: u64,
    /// Protocol seize share as a whole-number percent.
    pub protocol_seize_share: u64,
    /// Collateral factor as a whole-number percent.
    pub collateral_factor: u64,
    /// Borrow cap in whole token units, or [`UNLIMITED_BORROW_CAP`].
    pub borrow_cap: u64,
}

impl MarketConfiguration {
    /// Whether the governance proposal should include a borrow cap.
    pub fn has_borrow_cap(&self) -> bool {
        self.borrow_cap != UNLIMITED_BORROW_CAP
    }
}

/// Per-run deployment parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfiguration {
    /// Target environment; resolves all well-known addresses.
    pub environment: Environment,
    /// Address of the signing identity deploying the markets.
    pub deployer: Address,
    /// Explorer verification endpoint; `None` disables verification.
    pub moonscan_api_url: Option<String>,
    /// Confirmation depth to wait for after every state-changing transaction.
    pub required_confirmations: u64,
    /// Number of markets deployed in this run.
    pub num_markets: usize,
}

/// Result of deploying one market contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResult {
    /// Address of the new market.
    pub contract_address: Address,
    /// Hash of the creating transaction.
    pub transaction_hash: B256,
}

/// Hashes of the three post-deploy configuration transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureMarketResult {
    pub set_reserve_factor_hash: B256,
    pub set_protocol_seize_share_hash: B256,
    pub set_pending_admin_hash: B256,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> MarketConfiguration {
        MarketConfiguration {
            token_address: Address::repeat_byte(0x01),
            chainlink_feed_address: Address::repeat_byte(0x02),
            token_symbol: "USDC".to_string(),
            token_decimals: 6,
            mtoken_name: "Market USDC".to_string(),
            mtoken_symbol: "mUSDC".to_string(),
            reserve_factor: 15,
            protocol_seize_share: 3,
            collateral_factor: 0,
            borrow_cap: UNLIMITED_BORROW_CAP,
        }
    }

    #[test]
    fn test_borrow_cap_sentinel() {
        let mut config = market();
        assert!(!config.has_borrow_cap());

        config.borrow_cap = 1_000_000;
        assert!(config.has_borrow_cap());
    }

    #[test]
    fn test_market_serializes_camel_case() {
        let value = serde_json::to_value(market()).unwrap();
        assert!(value.get("tokenAddress").is_some());
        assert!(value.get("mtokenSymbol").is_some());
        assert!(value.get("reserveFactor").is_some());
    }
}

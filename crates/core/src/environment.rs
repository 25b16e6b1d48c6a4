//! Target environments and their well-known contract addresses.
//!
//! Every deployment runs against one environment; all protocol addresses
//! are resolved through its immutable [`ContractRegistry`] rather than any
//! ambient global state.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{address, Address};
use serde::Serialize;

/// Well-known protocol contracts for one environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractRegistry {
    /// Protocol-wide risk management (unitroller proxy).
    pub comptroller: Address,
    /// Governance timelock; becomes each market's admin.
    pub timelock: Address,
    /// Shared interest-rate model.
    pub interest_rate_model: Address,
    /// mToken implementation behind the delegator proxy.
    pub mtoken_implementation: Address,
    /// Chainlink proxy oracle keyed by token symbol.
    pub oracle: Address,
}

static MOONBASE: ContractRegistry = ContractRegistry {
    comptroller: address!("eb57aea8d8031e042a0a9d0e127c9e4bcbbc3c1e"),
    timelock: address!("43a720c2690b00ae0a151dda8e4e529a898af95c"),
    interest_rate_model: address!("52d15031bb2101a2cdf45fcbb9d397e19ae63399"),
    mtoken_implementation: address!("b56b6e0536d8a439b9c47bb9b018346aab9074cf"),
    oracle: address!("1e5c2a37e2ae4b60b352787247f1c1971f674f23"),
};

static MOONBEAM: ContractRegistry = ContractRegistry {
    comptroller: address!("8e00d5e02e65a19337cdba98bba9f84d4186a180"),
    timelock: address!("3a9249d70dcb4a4e9ef4f3af99a3a130452ec19b"),
    interest_rate_model: address!("9e99976f1d7797c93a4054bd42a2c3bab17b3e87"),
    mtoken_implementation: address!("34a83d9bd55a5e0b7d22d4e1d90c9a2a5cdbbd17"),
    oracle: address!("ed301cd3eb27217bdb05c4e9b820a8a3c8b665f9"),
};

static MOONRIVER: ContractRegistry = ContractRegistry {
    comptroller: address!("0b7a0eaa884849c6af7a129e899536dddca4905e"),
    timelock: address!("04e6322d196e0e4cc6e06b70d3fe1c68d7e85a3b"),
    interest_rate_model: address!("be2bf21b1ed4dbe5b9dd7eafcbc8f407ef0a3a84"),
    mtoken_implementation: address!("7b54d2a9d45d46e8a1c9ad89c4b8bb99c97c78c0"),
    oracle: address!("892ae51cfb2b37cc50cbbcbb96fff1c4a7bac1f1"),
};

/// Chains this tool can deploy markets on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Moonbase Alpha testnet.
    Moonbase,
    /// Moonbeam mainnet.
    Moonbeam,
    /// Moonriver canary network.
    Moonriver,
}

impl Environment {
    /// All supported environments.
    pub const ALL: [Environment; 3] = [
        Environment::Moonbase,
        Environment::Moonbeam,
        Environment::Moonriver,
    ];

    /// Well-known contract addresses for this environment.
    pub fn contracts(&self) -> &'static ContractRegistry {
        match self {
            Environment::Moonbase => &MOONBASE,
            Environment::Moonbeam => &MOONBEAM,
            Environment::Moonriver => &MOONRIVER,
        }
    }

    /// EVM chain id.
    pub fn chain_id(&self) -> u64 {
        match self {
            Environment::Moonbase => 1287,
            Environment::Moonbeam => 1284,
            Environment::Moonriver => 1285,
        }
    }

    /// Symbol of the native currency.
    pub fn native_symbol(&self) -> &'static str {
        match self {
            Environment::Moonbase => "DEV",
            Environment::Moonbeam => "GLMR",
            Environment::Moonriver => "MOVR",
        }
    }

    /// Public RPC endpoint used when the operator supplies none.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Environment::Moonbase => "https://rpc.api.moonbase.moonbeam.network",
            Environment::Moonbeam => "https://rpc.api.moonbeam.network",
            Environment::Moonriver => "https://rpc.moonriver.moonbeam.network",
        }
    }

    /// Moonscan API endpoint for source verification.
    pub fn moonscan_api_url(&self) -> &'static str {
        match self {
            Environment::Moonbase => "https://api-moonbase.moonscan.io/api",
            Environment::Moonbeam => "https://api-moonbeam.moonscan.io/api",
            Environment::Moonriver => "https://api-moonriver.moonscan.io/api",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Moonbase => "moonbase",
            Environment::Moonbeam => "moonbeam",
            Environment::Moonriver => "moonriver",
        };
        f.write_str(name)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "moonbase" => Ok(Environment::Moonbase),
            "moonbeam" => Ok(Environment::Moonbeam),
            "moonriver" => Ok(Environment::Moonriver),
            other => Err(format!(
                "unknown environment `{other}` (expected moonbase, moonbeam, or moonriver)"
            )),
        }
    }
}

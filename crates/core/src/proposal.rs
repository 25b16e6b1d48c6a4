//! Governance proposal construction and merging.
//!
//! A proposal is four parallel arrays consumed by the on-chain governance
//! executor: `targets`, `values`, `signatures`, `callDatas`. The executor
//! re-derives each function selector from the signature string, so every
//! `callData` holds only the ABI-encoded argument tuple; the leading
//! 4-byte selector is stripped when a sub-proposal is built. Index
//! correspondence across the four arrays is the wire contract; merging
//! preserves it by concatenating all four in input order.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use serde::Serialize;
use tracing::debug;

use deployer_chain::bindings::{signatures, ChainlinkOracle, Comptroller, MErc20Delegator};

use crate::config::{DeploymentConfiguration, MarketConfiguration};
use crate::mantissa::{percent_to_mantissa, token_units};

/// Length of an ABI function selector.
const SELECTOR_LEN: usize = 4;

/// Reward token indexes for emission-speed configuration.
const GOVERNANCE_REWARD: u8 = 0;
const NATIVE_REWARD: u8 = 1;

/// An ordered multi-call governance proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalData {
    /// Contract each call is executed against.
    pub targets: Vec<Address>,
    /// Native currency attached to each call; always zero here.
    pub values: Vec<U256>,
    /// Human-readable function signatures.
    pub signatures: Vec<String>,
    /// Argument-only ABI encodings (selector stripped).
    pub call_datas: Vec<Bytes>,
}

impl ProposalData {
    /// An empty proposal.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-action proposal from a selector-prefixed encoded call.
    pub fn action(target: Address, signature: &str, encoded_call: Vec<u8>) -> Self {
        let mut proposal = Self::new();
        proposal.push_action(target, signature, encoded_call);
        proposal
    }

    /// Append one action, stripping the selector from `encoded_call`.
    pub fn push_action(&mut self, target: Address, signature: &str, encoded_call: Vec<u8>) {
        self.targets.push(target);
        self.values.push(U256::ZERO);
        self.signatures.push(signature.to_string());
        self.call_datas
            .push(Bytes::from(encoded_call[SELECTOR_LEN..].to_vec()));
    }

    /// Number of actions. The four arrays always share this length.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.targets.len(), self.values.len());
        debug_assert_eq!(self.targets.len(), self.signatures.len());
        debug_assert_eq!(self.targets.len(), self.call_datas.len());
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn append(&mut self, other: ProposalData) {
        self.targets.extend(other.targets);
        self.values.extend(other.values);
        self.signatures.extend(other.signatures);
        self.call_datas.extend(other.call_datas);
    }
}

/// Concatenate proposals into one, preserving input order.
pub fn merge_proposals(proposals: impl IntoIterator<Item = ProposalData>) -> ProposalData {
    let mut merged = ProposalData::new();
    for proposal in proposals {
        merged.append(proposal);
    }
    merged
}

/// Build the governance proposal wiring one deployed market into the
/// protocol: oracle feed, market support, risk parameters, reward
/// emissions, and (when capped) the borrow cap, in that fixed order.
pub fn build_market_proposal(
    market_address: Address,
    market: &MarketConfiguration,
    deployment: &DeploymentConfiguration,
) -> ProposalData {
    let contracts = deployment.environment.contracts();

    let mut proposals = vec![
        configure_chainlink_feed(contracts.oracle, market),
        support_market(contracts.comptroller, market_address),
        set_reserve_factor(market_address, market),
        set_protocol_seize_share(market_address, market),
        set_collateral_factor(contracts.comptroller, market_address, market),
        set_reward_emissions(contracts.comptroller, market_address),
    ];

    // Only cap borrowing when the operator asked for a cap.
    if market.has_borrow_cap() {
        proposals.push(set_borrow_cap(contracts.comptroller, market_address, market));
    }

    let proposal = merge_proposals(proposals);
    debug!(
        market = %market_address,
        actions = proposal.len(),
        "Built governance proposal"
    );
    proposal
}

fn configure_chainlink_feed(oracle: Address, market: &MarketConfiguration) -> ProposalData {
    let call = ChainlinkOracle::setFeedCall {
        symbol: market.token_symbol.clone(),
        feed: market.chainlink_feed_address,
    };
    ProposalData::action(oracle, signatures::SET_FEED, call.abi_encode())
}

fn support_market(comptroller: Address, market_address: Address) -> ProposalData {
    let call = Comptroller::_supportMarketCall {
        mToken: market_address,
    };
    ProposalData::action(comptroller, signatures::SUPPORT_MARKET, call.abi_encode())
}

fn set_reserve_factor(market_address: Address, market: &MarketConfiguration) -> ProposalData {
    let call = MErc20Delegator::_setReserveFactorCall {
        newReserveFactorMantissa: percent_to_mantissa(market.reserve_factor),
    };
    ProposalData::action(market_address, signatures::SET_RESERVE_FACTOR, call.abi_encode())
}

fn set_protocol_seize_share(market_address: Address, market: &MarketConfiguration) -> ProposalData {
    let call = MErc20Delegator::_setProtocolSeizeShareCall {
        newProtocolSeizeShareMantissa: percent_to_mantissa(market.protocol_seize_share),
    };
    ProposalData::action(
        market_address,
        signatures::SET_PROTOCOL_SEIZE_SHARE,
        call.abi_encode(),
    )
}

fn set_collateral_factor(
    comptroller: Address,
    market_address: Address,
    market: &MarketConfiguration,
) -> ProposalData {
    let call = Comptroller::_setCollateralFactorCall {
        mToken: market_address,
        newCollateralFactorMantissa: percent_to_mantissa(market.collateral_factor),
    };
    ProposalData::action(comptroller, signatures::SET_COLLATERAL_FACTOR, call.abi_encode())
}

/// Initialize reward emissions to supply 0 / borrow 1 for both reward
/// tokens. Two actions, one per reward token index.
fn set_reward_emissions(comptroller: Address, market_address: Address) -> ProposalData {
    let mut proposal = ProposalData::new();
    for reward_type in [GOVERNANCE_REWARD, NATIVE_REWARD] {
        let call = Comptroller::_setRewardSpeedCall {
            rewardType: reward_type,
            mToken: market_address,
            newSupplySpeed: U256::ZERO,
            newBorrowSpeed: U256::from(1u64),
        };
        proposal.push_action(comptroller, signatures::SET_REWARD_SPEED, call.abi_encode());
    }
    proposal
}

fn set_borrow_cap(
    comptroller: Address,
    market_address: Address,
    market: &MarketConfiguration,
) -> ProposalData {
    let call = Comptroller::_setMarketBorrowCapsCall {
        mTokens: vec![market_address],
        newBorrowCaps: vec![token_units(market.borrow_cap, market.token_decimals)],
    };
    ProposalData::action(comptroller, signatures::SET_MARKET_BORROW_CAPS, call.abi_encode())
}

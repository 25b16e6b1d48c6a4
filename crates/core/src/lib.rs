//! Core deployment logic for the market deployer.
//!
//! This crate provides:
//! - Environment registry of well-known protocol addresses
//! - Market and deployment configuration records
//! - Fixed-point scaling for on-chain risk parameters
//! - Contract deployment with best-effort source verification
//! - Post-deploy market configuration
//! - Governance proposal construction and merging
//! - The orchestrator tying it all together per market

mod config;
mod configure;
mod deploy;
mod environment;
pub mod mantissa;
mod orchestrator;
mod proposal;

pub use config::{
    ConfigureMarketResult, DeployResult, DeploymentConfiguration, MarketConfiguration,
    UNLIMITED_BORROW_CAP,
};
pub use configure::MarketConfigurer;
pub use deploy::ContractDeployer;
pub use environment::{ContractRegistry, Environment};
pub use orchestrator::{MarketsDeployReport, Orchestrator};
pub use proposal::{build_market_proposal, merge_proposals, ProposalData};

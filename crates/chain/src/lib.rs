//! Chain interaction layer for the market deployer.
//!
//! This crate provides:
//! - Contract bindings for the mToken delegator, comptroller, and oracle
//! - The `ChainClient` capability trait and its Alloy RPC implementation
//! - Transaction submission with retry and confirmation-depth semantics
//! - Deploy-artifact loading (creation bytecode + verification source)

pub mod artifact;
pub mod bindings;
mod client;
mod submitter;

pub use artifact::DeployArtifact;
pub use client::{ChainClient, DeployedContract, RpcChainClient, TokenMetadata};
pub use submitter::{Operation, RetryPolicy, SubmitError, TransactionSubmitter, RETRY_DELAY};

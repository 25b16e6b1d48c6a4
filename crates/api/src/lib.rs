//! HTTP clients for external services used by the market deployer.
//!
//! Currently a single client: Moonscan source verification.

mod moonscan;

pub use moonscan::{MoonscanClient, VerificationResponse, VerifySourceRequest};

//! Pre-deployment checks.
//!
//! These checks are fatal: a missing key, an underfunded deployer, or a
//! missing explorer API key terminates the run before anything is sent
//! on-chain. Nothing here is retried.

use alloy::primitives::U256;
use anyhow::{anyhow, bail, Result};
use tracing::info;

use deployer_chain::{ChainClient, RpcChainClient};
use deployer_core::{DeploymentConfiguration, Environment};

/// Environment variable holding the deployer's private key.
pub const DEPLOYER_KEY_ENV_VAR: &str = "MARKET_DEPLOYER_PK";

/// Environment variable holding the Moonscan API key.
pub const MOONSCAN_API_KEY_ENV_VAR: &str = "MOONSCAN_API_KEY";

/// Confirmations required after every state-changing transaction.
pub const REQUIRED_CONFIRMATIONS: u64 = 3;

/// Everything preflight produces for the rest of the run.
pub struct Preflight {
    pub deployment: DeploymentConfiguration,
    pub client: RpcChainClient,
    pub moonscan_api_key: Option<String>,
}

/// One native token; the minimum balance needed to fund a deployment.
fn min_required_balance() -> U256 {
    U256::from(10u64).pow(U256::from(18u64))
}

/// Validate that this process can deploy markets and assemble the
/// deployment configuration.
pub async fn run_preflight_checks(
    environment: Environment,
    rpc_url: &str,
    num_markets: usize,
    verify: bool,
) -> Result<Preflight> {
    info!(environment = %environment, rpc_url, "Running pre-deployment checks");

    // 1. Deployer private key is exported and parseable.
    let private_key = std::env::var(DEPLOYER_KEY_ENV_VAR).map_err(|_| {
        anyhow!("no deployer key exported; set {DEPLOYER_KEY_ENV_VAR} (see README)")
    })?;
    let client = RpcChainClient::new(&private_key, rpc_url, environment.chain_id())?;
    let deployer = client.sender();
    info!(deployer = %deployer, "Deployer key loaded");

    // 2. Deployer has sufficient balance.
    let balance = client.native_balance(deployer).await?;
    if balance < min_required_balance() {
        bail!(
            "deployer {deployer} holds {balance} wei of {symbol}, below the required minimum of {minimum} wei",
            symbol = environment.native_symbol(),
            minimum = min_required_balance(),
        );
    }
    info!(balance = %balance, "Deployer balance sufficient");

    // 3. Moonscan API key is exported when verification is enabled.
    let moonscan_api_key = if verify {
        let key = std::env::var(MOONSCAN_API_KEY_ENV_VAR).map_err(|_| {
            anyhow!("no Moonscan API key exported; set {MOONSCAN_API_KEY_ENV_VAR} or pass --no-verify")
        })?;
        Some(key)
    } else {
        None
    };

    info!("All pre-deployment checks passed");

    let deployment = DeploymentConfiguration {
        environment,
        deployer,
        moonscan_api_url: verify.then(|| environment.moonscan_api_url().to_string()),
        required_confirmations: REQUIRED_CONFIRMATIONS,
        num_markets,
    };

    Ok(Preflight {
        deployment,
        client,
        moonscan_api_key,
    })
}

//! Market Deployer
//!
//! Deploys new lending markets onto an EVM chain, runs the post-deploy
//! configuration sequence, and produces the governance proposal that wires
//! each market into the protocol.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use deployer_api::MoonscanClient;
use deployer_chain::{ChainClient, DeployArtifact, TransactionSubmitter};
use deployer_core::{Environment, MarketConfiguration, Orchestrator};

mod preflight;
mod prompt;
mod report;

#[derive(Parser)]
#[command(
    name = "market-deployer",
    version,
    about = "Deploys and wires new lending markets"
)]
struct Cli {
    /// Target environment: moonbase, moonbeam, or moonriver.
    environment: Environment,

    /// Custom RPC node to deploy through.
    #[arg(long)]
    node_url: Option<String>,

    /// Number of markets to deploy in one session.
    #[arg(long, default_value_t = 1)]
    num_markets: usize,

    /// Path to the delegator deploy artifact JSON.
    #[arg(long, default_value = "artifacts/merc20-delegator.json")]
    artifact: PathBuf,

    /// Skip explorer source verification.
    #[arg(long)]
    no_verify: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let rpc_url = cli
        .node_url
        .clone()
        .unwrap_or_else(|| cli.environment.default_rpc_url().to_string());

    let artifact = DeployArtifact::from_file(&cli.artifact)?;
    info!(
        contract = %artifact.contract_name,
        artifact = %cli.artifact.display(),
        "Deploy artifact loaded"
    );

    let preflight::Preflight {
        deployment,
        client,
        moonscan_api_key,
    } = preflight::run_preflight_checks(cli.environment, &rpc_url, cli.num_markets, !cli.no_verify)
        .await?;

    let verifier = match (&deployment.moonscan_api_url, moonscan_api_key) {
        (Some(url), Some(key)) => Some(MoonscanClient::new(url, key)),
        _ => None,
    };

    let client: Arc<dyn ChainClient> = Arc::new(client);

    // Collect one configuration per requested market before touching the
    // chain, so the operator is not interrupted mid-deployment.
    let mut markets: Vec<MarketConfiguration> = Vec::with_capacity(cli.num_markets);
    for _ in 0..cli.num_markets {
        markets.push(prompt::get_configuration(client.as_ref()).await?);
    }

    let submitter = TransactionSubmitter::new(client);
    let orchestrator = Orchestrator::new(&submitter, &artifact, verifier.as_ref());
    let run_report = orchestrator.run(&markets, &deployment).await?;

    report::print_report(&run_report, &deployment)?;
    Ok(())
}

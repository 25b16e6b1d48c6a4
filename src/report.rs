//! Final run report.
//!
//! Printed only after every market has fully completed. The proposal JSON
//! is the exact payload to submit for the governance vote, so the operator
//! is told to retain all of it.

use anyhow::Result;

use deployer_core::{DeploymentConfiguration, MarketsDeployReport};

use crate::prompt::print_configuration;

fn print_header(message: &str) {
    println!();
    println!("[+] {message}");
    println!();
}

/// Print the complete deployment report.
pub fn print_report(report: &MarketsDeployReport, deployment: &DeploymentConfiguration) -> Result<()> {
    let plural = if deployment.num_markets > 1 {
        "markets are"
    } else {
        "market is"
    };
    print_header(&format!(
        "Congratulations! The new {plural} deployed and configured"
    ));
    println!("You should retain the output below for the governance proposal submission.");
    println!("==========================================================================");

    print_header("Metadata");
    println!("Environment: {}", deployment.environment);
    println!("Deployer: {}", deployment.deployer);

    for (index, configuration) in report.market_configurations.iter().enumerate() {
        print_header(&format!("Market {} configuration", index + 1));
        print_configuration(configuration);

        let deploy = &report.deploy_results[index];
        let configure = &report.configure_results[index];
        print_header(&format!("Artifacts of deploy operation {}", index + 1));
        println!(
            "Market address: {} (deployed in tx {})",
            deploy.contract_address, deploy.transaction_hash
        );
        println!("Set reserve factor tx: {}", configure.set_reserve_factor_hash);
        println!(
            "Set protocol seize share tx: {}",
            configure.set_protocol_seize_share_hash
        );
        println!("Set pending admin tx: {}", configure.set_pending_admin_hash);
    }

    print_header("Governance proposal to submit");
    println!("{}", serde_json::to_string_pretty(&report.proposal)?);

    print_header("Next steps");
    println!("Submit the proposal above for a governance vote.");
    println!("Include the market configuration and deploy artifacts in the proposal description.");
    println!("The timelock must call _acceptAdmin on each market once the proposal executes.");
    println!();

    Ok(())
}

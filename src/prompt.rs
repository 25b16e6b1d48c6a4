//! Interactive market-configuration prompting.
//!
//! Collects one `MarketConfiguration` from the operator, validating every
//! input and reading token metadata from the chain. The operator confirms
//! the assembled configuration before it is used; rejecting it starts
//! over.

use std::io::{self, Write};

use alloy::primitives::Address;
use anyhow::{Context, Result};

use deployer_chain::ChainClient;
use deployer_core::{MarketConfiguration, UNLIMITED_BORROW_CAP};

/// New markets default to a 3% protocol seize share.
const DEFAULT_PROTOCOL_SEIZE_SHARE: u64 = 3;

/// Prompt until the operator confirms a complete market configuration.
pub async fn get_configuration(client: &dyn ChainClient) -> Result<MarketConfiguration> {
    loop {
        match read_configuration(client).await? {
            Some(configuration) => {
                println!("    Market configuration set.");
                return Ok(configuration);
            }
            None => {
                println!("Aborting market configuration. Please try again.");
                println!();
            }
        }
    }
}

/// Walk the operator through one configuration. Returns `None` when the
/// token metadata cannot be read or the operator rejects the result.
async fn read_configuration(client: &dyn ChainClient) -> Result<Option<MarketConfiguration>> {
    println!();
    println!("[+] Market configuration");
    println!();

    let token_address = prompt_address(
        "What is the address of the ERC-20 token to deploy a market for?\n> ",
    )?;

    println!("    Loading token details from the chain...");
    let metadata = match client.token_metadata(token_address).await {
        Ok(metadata) => metadata,
        Err(e) => {
            println!(
                "Unable to read symbol/decimals from {token_address}. \
                 Are you sure this is a valid ERC-20 token address?"
            );
            println!("    ({e})");
            return Ok(None);
        }
    };
    println!("    Token symbol: {}", metadata.symbol);
    println!("    Token decimals: {}", metadata.decimals);

    let mtoken_name = prompt_nonempty(
        "What should the name of the market's token be? (e.g. \"Market USDC\")\n> ",
    )?;
    let mtoken_symbol = prompt_prefixed(
        "What should the symbol of the market's token be? This must start with \"m\" (e.g. \"mUSDC\")\n> ",
        "m",
    )?;

    let chainlink_feed_address = prompt_address(
        "What is the address of the Chainlink feed for the token?\n> ",
    )?;

    let reserve_factor = prompt_integer(
        "What is the reserve factor of the new market, as a whole-number percent? \
         (e.g. 15 for a stablecoin, 25 for a crypto market)\n> ",
    )?;
    let collateral_factor = prompt_integer(
        "What is the collateral factor of the new market, as a whole-number percent? \
         (new markets typically start at 0)\n> ",
    )?;
    let borrow_cap = prompt_borrow_cap(
        "What borrow cap should the market have, in whole tokens? \
         Press enter for no cap.\n> ",
    )?;

    let configuration = MarketConfiguration {
        token_address,
        chainlink_feed_address,
        token_symbol: metadata.symbol,
        token_decimals: metadata.decimals,
        mtoken_name,
        mtoken_symbol,
        reserve_factor,
        protocol_seize_share: DEFAULT_PROTOCOL_SEIZE_SHARE,
        collateral_factor,
        borrow_cap,
    };

    print_configuration(&configuration);
    let response = read_line("Enter 'y' to confirm the configuration, or 'n' to start over.\n> ")?;
    Ok((response == "y").then_some(configuration))
}

/// Print a configuration the way the final report does.
pub fn print_configuration(configuration: &MarketConfiguration) {
    println!("    Collateral parameters:");
    println!("        Token address: {}", configuration.token_address);
    println!("        Token symbol: {}", configuration.token_symbol);
    println!("        Token decimals: {}", configuration.token_decimals);
    println!("    Oracle parameters:");
    println!(
        "        Chainlink feed address: {}",
        configuration.chainlink_feed_address
    );
    println!("    Market parameters:");
    println!("        mToken name: {}", configuration.mtoken_name);
    println!("        mToken symbol: {}", configuration.mtoken_symbol);
    println!("    Economic parameters:");
    println!("        Reserve factor: {}%", configuration.reserve_factor);
    println!(
        "        Protocol seize share: {}%",
        configuration.protocol_seize_share
    );
    println!(
        "        Collateral factor: {}%",
        configuration.collateral_factor
    );
    if configuration.borrow_cap == UNLIMITED_BORROW_CAP {
        println!("        Borrow cap: unlimited");
    } else {
        println!("        Borrow cap: {} whole tokens", configuration.borrow_cap);
    }
    println!();
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("flushing prompt")?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).context("reading input")?;
    Ok(line.trim().to_string())
}

fn prompt_address(prompt: &str) -> Result<Address> {
    loop {
        let input = read_line(prompt)?;
        match input.parse::<Address>() {
            Ok(address) => return Ok(address),
            Err(_) => println!("    Input '{input}' doesn't look like a valid address. Please try again."),
        }
    }
}

fn prompt_integer(prompt: &str) -> Result<u64> {
    loop {
        let input = read_line(prompt)?;
        match input.parse::<u64>() {
            Ok(value) => return Ok(value),
            Err(_) => println!("    Input '{input}' doesn't look like a valid integer. Please try again."),
        }
    }
}

fn prompt_nonempty(prompt: &str) -> Result<String> {
    loop {
        let input = read_line(prompt)?;
        if !input.is_empty() {
            return Ok(input);
        }
        println!("    Input must not be empty. Please try again.");
    }
}

fn prompt_prefixed(prompt: &str, prefix: &str) -> Result<String> {
    loop {
        let input = read_line(prompt)?;
        if input.starts_with(prefix) {
            return Ok(input);
        }
        println!("    Input \"{input}\" must start with \"{prefix}\". Please try again.");
    }
}

fn prompt_borrow_cap(prompt: &str) -> Result<u64> {
    loop {
        let input = read_line(prompt)?;
        if input.is_empty() {
            return Ok(UNLIMITED_BORROW_CAP);
        }
        match input.parse::<u64>() {
            Ok(value) if value != UNLIMITED_BORROW_CAP => return Ok(value),
            Ok(_) => return Ok(UNLIMITED_BORROW_CAP),
            Err(_) => println!("    Input '{input}' doesn't look like a valid integer. Please try again."),
        }
    }
}

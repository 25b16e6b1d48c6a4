//! Chain client abstraction and the Alloy RPC implementation.
//!
//! The deployment core only needs a small capability set from the chain:
//! send a call and wait for confirmation depth, create a contract, read a
//! balance, read ERC-20 metadata. That set is captured in [`ChainClient`]
//! so the core can run against a fake chain in tests.

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::bindings::Erc20;

/// Result of a contract-creation transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployedContract {
    /// Address of the new contract.
    pub address: Address,
    /// Hash of the transaction that created it.
    pub transaction_hash: B256,
}

/// Symbol and decimals read from an ERC-20 token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub symbol: String,
    pub decimals: u8,
}

/// Capabilities the deployment core needs from the chain.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the signing identity behind this client.
    fn sender(&self) -> Address;

    /// Send `calldata` to `target`, wait for `confirmations` blocks, and
    /// return the transaction hash. A reverted transaction is an error.
    async fn call_contract(
        &self,
        target: Address,
        calldata: Bytes,
        confirmations: u64,
    ) -> Result<B256>;

    /// Send a contract-creation transaction carrying `init_code`, wait for
    /// `confirmations` blocks, and return the new contract's address and
    /// the creating transaction's hash.
    async fn deploy_contract(
        &self,
        init_code: Bytes,
        confirmations: u64,
    ) -> Result<DeployedContract>;

    /// Native-currency balance of `address`.
    async fn native_balance(&self, address: Address) -> Result<U256>;

    /// Read `symbol()` and `decimals()` from an ERC-20 token.
    async fn token_metadata(&self, token: Address) -> Result<TokenMetadata>;
}

/// [`ChainClient`] backed by an Alloy HTTP provider with a local signer.
pub struct RpcChainClient {
    rpc_url: String,
    wallet: EthereumWallet,
    address: Address,
    chain_id: u64,
}

impl RpcChainClient {
    /// Create a client from a raw private key (with or without 0x prefix).
    pub fn new(private_key: &str, rpc_url: &str, chain_id: u64) -> Result<Self> {
        let key_str = private_key.trim_start_matches("0x");
        let signer: PrivateKeySigner = key_str.parse()?;
        let address = signer.address();
        let wallet = EthereumWallet::from(signer);

        info!(address = %address, chain_id, "Chain client initialized");

        Ok(Self {
            rpc_url: rpc_url.to_string(),
            wallet,
            address,
            chain_id,
        })
    }

    /// Get the RPC URL.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn send(
        &self,
        tx: TransactionRequest,
        confirmations: u64,
    ) -> Result<(B256, Option<Address>)> {
        let provider = ProviderBuilder::new()
            .wallet(self.wallet.clone())
            .on_http(self.rpc_url.parse()?);

        let pending = provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();

        debug!(tx_hash = %tx_hash, confirmations, "Transaction submitted, waiting for confirmations");

        let receipt = pending
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await?;

        if !receipt.status() {
            return Err(anyhow!("transaction reverted: {tx_hash}"));
        }

        info!(
            tx_hash = %tx_hash,
            block = receipt.block_number.unwrap_or(0),
            gas_used = receipt.gas_used,
            "Transaction confirmed"
        );

        Ok((tx_hash, receipt.contract_address))
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    fn sender(&self) -> Address {
        self.address
    }

    async fn call_contract(
        &self,
        target: Address,
        calldata: Bytes,
        confirmations: u64,
    ) -> Result<B256> {
        let tx = TransactionRequest::default()
            .with_to(target)
            .with_input(calldata)
            .with_chain_id(self.chain_id);

        let (tx_hash, _) = self.send(tx, confirmations).await?;
        Ok(tx_hash)
    }

    async fn deploy_contract(
        &self,
        init_code: Bytes,
        confirmations: u64,
    ) -> Result<DeployedContract> {
        let tx = TransactionRequest::default()
            .with_deploy_code(init_code)
            .with_chain_id(self.chain_id);

        let (transaction_hash, contract_address) = self.send(tx, confirmations).await?;
        let address = contract_address
            .ok_or_else(|| anyhow!("creation receipt for {transaction_hash} carries no contract address"))?;

        Ok(DeployedContract {
            address,
            transaction_hash,
        })
    }

    async fn native_balance(&self, address: Address) -> Result<U256> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.parse()?);
        Ok(provider.get_balance(address).await?)
    }

    async fn token_metadata(&self, token: Address) -> Result<TokenMetadata> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.parse()?);
        let erc20 = Erc20::new(token, &provider);

        let symbol = erc20.symbol().call().await?._0;
        let decimals = erc20.decimals().call().await?._0;

        Ok(TokenMetadata { symbol, decimals })
    }
}

impl std::fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}

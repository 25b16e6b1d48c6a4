//! Transaction submission with retries and confirmation depth.
//!
//! Transaction estimation against public RPC endpoints is flaky: estimates
//! revert spuriously, connections drop, responses time out. Every
//! state-changing operation therefore goes through [`TransactionSubmitter`],
//! which resubmits the identical call after a fixed pause until the chain
//! accepts it and the requested confirmation depth is reached.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, B256};
use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::{ChainClient, DeployedContract};

/// Pause between retries of a failed operation.
pub const RETRY_DELAY: Duration = Duration::from_secs(30);

/// A named on-chain operation: the function being called, its target, and
/// the fully encoded calldata. Retries reuse all three unchanged.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Human-readable function signature, for logs and errors.
    pub name: &'static str,
    /// Contract the call is sent to.
    pub target: Address,
    /// Selector-prefixed ABI-encoded call.
    pub calldata: Bytes,
}

/// Retry behavior for failed submissions.
///
/// The default is the production policy: a fixed 30 second pause and no
/// attempt cap, so a submission either eventually lands or runs until the
/// operator kills the process. Setting `max_attempts` turns the endless
/// loop into an explicit [`SubmitError::RetriesExhausted`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Pause between attempts.
    pub retry_delay: Duration,
    /// Attempt cap; `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_delay: RETRY_DELAY,
            max_attempts: None,
        }
    }
}

/// Submission failure surfaced to callers that opted into a bounded policy.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("gave up on `{operation}` after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        last_error: String,
    },
}

/// Sends named operations through a [`ChainClient`], retrying per policy
/// and waiting for confirmation depth on success.
pub struct TransactionSubmitter {
    client: Arc<dyn ChainClient>,
    policy: RetryPolicy,
}

impl TransactionSubmitter {
    /// Create a submitter with the default (unbounded) retry policy.
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self::with_policy(client, RetryPolicy::default())
    }

    /// Create a submitter with an explicit retry policy.
    pub fn with_policy(client: Arc<dyn ChainClient>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// The signing identity behind this submitter.
    pub fn sender(&self) -> Address {
        self.client.sender()
    }

    /// The underlying chain client.
    pub fn client(&self) -> &Arc<dyn ChainClient> {
        &self.client
    }

    /// Submit a named operation and return the hash of the transaction that
    /// landed. Retries with identical arguments on any failure; with the
    /// default policy this never returns an error.
    pub async fn submit(&self, operation: &Operation, confirmations: u64) -> Result<B256> {
        debug!(
            operation = operation.name,
            target = %operation.target,
            calldata_len = operation.calldata.len(),
            "Sending operation"
        );

        self.with_retries(operation.name, || {
            self.client
                .call_contract(operation.target, operation.calldata.clone(), confirmations)
        })
        .await
    }

    /// Submit a contract-creation transaction under the same retry policy.
    pub async fn submit_deployment(
        &self,
        init_code: Bytes,
        confirmations: u64,
    ) -> Result<DeployedContract> {
        debug!(init_code_len = init_code.len(), "Sending contract creation");

        self.with_retries("deploy", || {
            self.client.deploy_contract(init_code.clone(), confirmations)
        })
        .await
    }

    async fn with_retries<T, F, Fut>(&self, name: &str, mut attempt_fn: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match attempt_fn().await {
                Ok(value) => {
                    info!(operation = name, attempts, "Operation succeeded");
                    return Ok(value);
                }
                Err(e) => {
                    if let Some(max) = self.policy.max_attempts {
                        if attempts >= max {
                            return Err(SubmitError::RetriesExhausted {
                                operation: name.to_string(),
                                attempts,
                                last_error: e.to_string(),
                            }
                            .into());
                        }
                    }
                    warn!(
                        operation = name,
                        attempt = attempts,
                        retry_in_secs = self.policy.retry_delay.as_secs(),
                        error = %e,
                        "Operation failed, retrying"
                    );
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TokenMetadata;
    use alloy::primitives::U256;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fake chain that fails a scripted number of times before succeeding,
    /// recording every attempt it sees.
    struct FlakyChain {
        fail_first: u32,
        calls: Mutex<Vec<(Address, Bytes, u64)>>,
    }

    impl FlakyChain {
        fn new(fail_first: u32) -> Self {
            Self {
                fail_first,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChainClient for FlakyChain {
        fn sender(&self) -> Address {
            Address::repeat_byte(0xaa)
        }

        async fn call_contract(
            &self,
            target: Address,
            calldata: Bytes,
            confirmations: u64,
        ) -> Result<B256> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((target, calldata, confirmations));
            let attempt = calls.len() as u32;
            if attempt <= self.fail_first {
                return Err(anyhow!("rpc timeout"));
            }
            Ok(B256::with_last_byte(attempt as u8))
        }

        async fn deploy_contract(
            &self,
            init_code: Bytes,
            confirmations: u64,
        ) -> Result<DeployedContract> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((Address::ZERO, init_code, confirmations));
            let attempt = calls.len() as u32;
            if attempt <= self.fail_first {
                return Err(anyhow!("estimation reverted"));
            }
            Ok(DeployedContract {
                address: Address::repeat_byte(0xcc),
                transaction_hash: B256::with_last_byte(attempt as u8),
            })
        }

        async fn native_balance(&self, _address: Address) -> Result<U256> {
            Ok(U256::ZERO)
        }

        async fn token_metadata(&self, _token: Address) -> Result<TokenMetadata> {
            Ok(TokenMetadata {
                symbol: "TEST".to_string(),
                decimals: 18,
            })
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            retry_delay: Duration::from_millis(1),
            max_attempts: None,
        }
    }

    fn operation() -> Operation {
        Operation {
            name: "_setReserveFactor(uint256)",
            target: Address::repeat_byte(0x11),
            calldata: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
        }
    }

    #[tokio::test]
    async fn test_submit_succeeds_first_attempt() {
        let chain = Arc::new(FlakyChain::new(0));
        let submitter = TransactionSubmitter::with_policy(chain.clone(), fast_policy());

        let hash = submitter.submit(&operation(), 3).await.unwrap();
        assert_eq!(hash, B256::with_last_byte(1));
        assert_eq!(chain.attempts(), 1);
    }

    #[tokio::test]
    async fn test_submit_retries_until_success() {
        let chain = Arc::new(FlakyChain::new(3));
        let submitter = TransactionSubmitter::with_policy(chain.clone(), fast_policy());

        let hash = submitter.submit(&operation(), 2).await.unwrap();
        // k failures then success: exactly k+1 attempts, hash of the winner
        assert_eq!(chain.attempts(), 4);
        assert_eq!(hash, B256::with_last_byte(4));
    }

    #[tokio::test]
    async fn test_submit_repeats_identical_arguments() {
        let chain = Arc::new(FlakyChain::new(2));
        let submitter = TransactionSubmitter::with_policy(chain.clone(), fast_policy());
        let op = operation();

        submitter.submit(&op, 5).await.unwrap();

        let calls = chain.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        for (target, calldata, confirmations) in calls.iter() {
            assert_eq!(*target, op.target);
            assert_eq!(*calldata, op.calldata);
            assert_eq!(*confirmations, 5);
        }
    }

    #[tokio::test]
    async fn test_bounded_policy_surfaces_exhaustion() {
        let chain = Arc::new(FlakyChain::new(u32::MAX));
        let policy = RetryPolicy {
            retry_delay: Duration::from_millis(1),
            max_attempts: Some(3),
        };
        let submitter = TransactionSubmitter::with_policy(chain.clone(), policy);

        let err = submitter.submit(&operation(), 1).await.unwrap_err();
        assert_eq!(chain.attempts(), 3);

        let submit_err = err.downcast::<SubmitError>().unwrap();
        let SubmitError::RetriesExhausted { attempts, .. } = submit_err;
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_deployment_retries_like_calls() {
        let chain = Arc::new(FlakyChain::new(1));
        let submitter = TransactionSubmitter::with_policy(chain.clone(), fast_policy());

        let deployed = submitter
            .submit_deployment(Bytes::from(vec![0x60, 0x80]), 3)
            .await
            .unwrap();
        assert_eq!(chain.attempts(), 2);
        assert_eq!(deployed.address, Address::repeat_byte(0xcc));
    }

    #[test]
    fn test_default_policy_is_unbounded_thirty_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retry_delay, Duration::from_secs(30));
        assert!(policy.max_attempts.is_none());
    }
}

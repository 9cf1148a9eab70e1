//! Chain client for the corenet synthesis bot.
//!
//! This crate defines the [`DeliveryInterface`] trait for talking to the
//! chain endpoint and the [`DeliveryService`] wrapper that adds the bounded
//! receipt-polling loop on top of whichever implementation is plugged in.
//! The production implementation lives in [`implementations::evm::alloy`].

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use corenet_types::{
	RetryPolicy, SignedTransaction, Transaction, TransactionHash, TransactionReceipt,
};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

pub use implementations::evm::alloy::AlloyDelivery;

/// Errors that can occur during delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Transport or RPC failure talking to the chain endpoint.
	#[error("Network error: {0}")]
	Network(String),
	/// The endpoint answered from a different chain than configured.
	#[error("Chain id mismatch: endpoint reports {actual}, configured {expected}")]
	ChainMismatch { expected: u64, actual: u64 },
}

/// Interface to the chain endpoint.
///
/// One fixed endpoint, one chain; the bot never routes between providers.
#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Chain id reported by the endpoint.
	async fn get_chain_id(&self) -> Result<u64, DeliveryError>;

	/// Native balance of an address in wei.
	async fn get_balance(&self, address: Address) -> Result<U256, DeliveryError>;

	/// Transaction count of an address, used as the next nonce.
	async fn get_nonce(&self, address: Address) -> Result<u64, DeliveryError>;

	/// Current network gas price in wei. Informational only; submitted
	/// transactions carry the profile's fixed price.
	async fn get_gas_price(&self) -> Result<u128, DeliveryError>;

	/// Executes the call without submitting it (`eth_call`).
	async fn call(&self, tx: &Transaction, from: Address) -> Result<Vec<u8>, DeliveryError>;

	/// Broadcasts a signed payload and returns the hash it is tracked by.
	async fn submit(&self, signed: &SignedTransaction) -> Result<TransactionHash, DeliveryError>;

	/// Fetches the receipt if the transaction has been mined.
	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, DeliveryError>;
}

/// Service that manages chain access for the rest of the bot.
///
/// Wraps an implementation and applies the configured [`RetryPolicy`] when
/// waiting for receipts.
pub struct DeliveryService {
	implementation: Box<dyn DeliveryInterface>,
	retry: RetryPolicy,
}

impl DeliveryService {
	/// Creates a new DeliveryService with the specified implementation.
	pub fn new(implementation: Box<dyn DeliveryInterface>, retry: RetryPolicy) -> Self {
		Self {
			implementation,
			retry,
		}
	}

	/// The receipt-polling policy this service operates under.
	pub fn retry_policy(&self) -> &RetryPolicy {
		&self.retry
	}

	/// Confirms the endpoint serves the configured chain.
	pub async fn verify_chain(&self, expected: u64) -> Result<(), DeliveryError> {
		let actual = self.implementation.get_chain_id().await?;
		if actual != expected {
			return Err(DeliveryError::ChainMismatch { expected, actual });
		}
		Ok(())
	}

	/// Native balance of an address in wei.
	pub async fn get_balance(&self, address: Address) -> Result<U256, DeliveryError> {
		self.implementation.get_balance(address).await
	}

	/// Next nonce for an address.
	pub async fn get_nonce(&self, address: Address) -> Result<u64, DeliveryError> {
		self.implementation.get_nonce(address).await
	}

	/// Current network gas price in wei.
	pub async fn get_gas_price(&self) -> Result<u128, DeliveryError> {
		self.implementation.get_gas_price().await
	}

	/// Simulates the call without submitting it.
	pub async fn call(&self, tx: &Transaction, from: Address) -> Result<Vec<u8>, DeliveryError> {
		self.implementation.call(tx, from).await
	}

	/// Broadcasts a signed payload.
	pub async fn submit(&self, signed: &SignedTransaction) -> Result<TransactionHash, DeliveryError> {
		self.implementation.submit(signed).await
	}

	/// Polls for a receipt under the configured retry policy.
	///
	/// Transport errors consume an attempt exactly like an absent receipt,
	/// so a flaky endpoint cannot extend the wait. Returns `None` once the
	/// attempts or the wall-clock ceiling run out.
	pub async fn wait_for_receipt(&self, hash: &TransactionHash) -> Option<TransactionReceipt> {
		let started = tokio::time::Instant::now();

		for attempt in 1..=self.retry.max_attempts {
			match self.implementation.get_receipt(hash).await {
				Ok(Some(receipt)) => {
					tracing::debug!(
						attempt,
						block_number = receipt.block_number,
						"Receipt found"
					);
					return Some(receipt);
				},
				Ok(None) => {
					tracing::debug!(attempt, "Receipt not yet available");
				},
				Err(e) => {
					tracing::debug!(attempt, error = %e, "Receipt query failed");
				},
			}

			if let Some(max_wait) = self.retry.max_wait() {
				if started.elapsed() > max_wait {
					tracing::warn!(tx_hash = %hash, "Receipt wait hit the wall-clock ceiling");
					return None;
				}
			}
			if attempt < self.retry.max_attempts {
				tokio::time::sleep(self.retry.poll_interval()).await;
			}
		}

		None
	}
}

//! Alloy-based EVM delivery implementation.
//!
//! Wraps an HTTP provider for the single configured endpoint. Signing
//! happens in the account crate, so this implementation only reads chain
//! state and broadcasts already-signed payloads.

use crate::{DeliveryError, DeliveryInterface};
use alloy_primitives::{Address, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_transport_http::Http;
use async_trait::async_trait;
use corenet_config::NetworkConfig;
use corenet_types::{SignedTransaction, Transaction, TransactionHash, TransactionReceipt};
use std::sync::Arc;

/// HTTP chain client over the configured RPC endpoint.
pub struct AlloyDelivery {
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
}

impl AlloyDelivery {
	/// Connects to the endpoint named in the network configuration.
	///
	/// Only the URL is touched here; connectivity is probed separately via
	/// the chain-id check so startup failures carry a clear reason.
	pub fn connect(network: &NetworkConfig) -> Result<Self, DeliveryError> {
		let url = network.rpc_url.parse().map_err(|e| {
			DeliveryError::Network(format!("Invalid RPC URL '{}': {}", network.rpc_url, e))
		})?;

		let provider = ProviderBuilder::new().on_http(url);

		Ok(Self {
			provider: Arc::new(provider) as Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
		})
	}
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	async fn get_chain_id(&self) -> Result<u64, DeliveryError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get chain id: {}", e)))
	}

	async fn get_balance(&self, address: Address) -> Result<U256, DeliveryError> {
		self.provider
			.get_balance(address)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get balance: {}", e)))
	}

	async fn get_nonce(&self, address: Address) -> Result<u64, DeliveryError> {
		self.provider
			.get_transaction_count(address)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get nonce: {}", e)))
	}

	async fn get_gas_price(&self) -> Result<u128, DeliveryError> {
		self.provider
			.get_gas_price()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get gas price: {}", e)))
	}

	async fn call(&self, tx: &Transaction, from: Address) -> Result<Vec<u8>, DeliveryError> {
		let request = tx.to_request(from);

		let result = self
			.provider
			.call(&request)
			.await
			.map_err(|e| DeliveryError::Network(format!("Call failed: {}", e)))?;

		Ok(result.to_vec())
	}

	async fn submit(&self, signed: &SignedTransaction) -> Result<TransactionHash, DeliveryError> {
		let pending = self
			.provider
			.send_raw_transaction(&signed.raw)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to send transaction: {}", e)))?;

		let tx_hash = *pending.tx_hash();
		tracing::debug!(tx_hash = %tx_hash, "Broadcast raw transaction");

		Ok(TransactionHash(tx_hash))
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, DeliveryError> {
		match self.provider.get_transaction_receipt(hash.0).await {
			Ok(Some(receipt)) => Ok(Some(TransactionReceipt {
				hash: TransactionHash(receipt.transaction_hash),
				block_number: receipt.block_number.unwrap_or(0),
				success: receipt.status(),
				gas_used: receipt.gas_used,
			})),
			Ok(None) => Ok(None),
			Err(e) => Err(DeliveryError::Network(format!(
				"Failed to get receipt: {}",
				e
			))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_invalid_rpc_urls() {
		let network = NetworkConfig {
			rpc_url: "not a url".to_string(),
			..Default::default()
		};
		let result = AlloyDelivery::connect(&network);
		assert!(matches!(result, Err(DeliveryError::Network(_))));
	}

	#[test]
	fn connects_to_a_well_formed_url() {
		let network = NetworkConfig::default();
		assert!(AlloyDelivery::connect(&network).is_ok());
	}
}

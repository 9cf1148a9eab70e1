//! Account management for the corenet synthesis bot.
//!
//! One locally held private key signs every transaction. [`LocalAccount`]
//! turns a transaction intent into a signed EIP-2718 payload together with
//! the hash the chain will report back, so broadcast and receipt polling
//! can be tracked as separate stages.

use alloy_eips::eip2718::Encodable2718;
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::Address;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use corenet_types::{SecretString, SignedTransaction, Transaction, TransactionHash};
use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// The bot's signing identity, initialized once from configuration.
pub struct LocalAccount {
	address: Address,
	wallet: EthereumWallet,
}

impl LocalAccount {
	/// Builds the account from a hex private key, binding it to the
	/// configured chain.
	pub fn new(private_key: &SecretString, chain_id: u64) -> Result<Self, AccountError> {
		let signer = private_key
			.expose()
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(e.to_string()))?;
		let signer = signer.with_chain_id(Some(chain_id));
		let address = signer.address();

		Ok(Self {
			address,
			wallet: EthereumWallet::from(signer),
		})
	}

	/// The sender address derived from the signing key.
	pub fn address(&self) -> Address {
		self.address
	}

	/// Signs a transaction intent into a broadcastable payload.
	///
	/// The intent carries every field (nonce, gas, chain id), so signing is
	/// purely local; nothing is fetched here.
	pub async fn sign_transaction(
		&self,
		tx: &Transaction,
	) -> Result<SignedTransaction, AccountError> {
		let request = tx.to_request(self.address);
		let envelope = request
			.build(&self.wallet)
			.await
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;

		Ok(SignedTransaction {
			hash: TransactionHash(*envelope.tx_hash()),
			raw: envelope.encoded_2718(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, B256, U256};

	// Well-known local development key, never funded anywhere real.
	const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn sample_transaction() -> Transaction {
		Transaction {
			to: address!("0B00a466AD7e747D28F599c8ecd701EEC4C2E99f"),
			data: vec![0x12, 0x34, 0x56, 0x78],
			value: U256::from(10_000_000_000_000_000u128),
			nonce: 0,
			gas_limit: 102_000,
			gas_price: 100_000_000_000,
			chain_id: 137,
		}
	}

	#[test]
	fn derives_the_expected_address() {
		let account = LocalAccount::new(&SecretString::from(TEST_KEY), 137).unwrap();
		assert_eq!(
			account.address(),
			address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
		);
	}

	#[test]
	fn rejects_malformed_keys() {
		let result = LocalAccount::new(&SecretString::from("not-a-key"), 137);
		match result {
			Err(AccountError::InvalidKey(detail)) => {
				// The parse failure's own description is carried along.
				assert!(!detail.is_empty());
			},
			other => panic!("expected InvalidKey, got {:?}", other.map(|_| ())),
		}
	}

	#[tokio::test]
	async fn signs_a_legacy_payload() {
		let account = LocalAccount::new(&SecretString::from(TEST_KEY), 137).unwrap();
		let signed = account.sign_transaction(&sample_transaction()).await.unwrap();

		assert!(!signed.raw.is_empty());
		assert_ne!(signed.hash.0, B256::ZERO);
		// Legacy transactions have no type byte, so the payload starts with
		// an RLP list marker.
		assert!(signed.raw[0] >= 0xc0);
	}

	#[tokio::test]
	async fn signing_is_deterministic() {
		let account = LocalAccount::new(&SecretString::from(TEST_KEY), 137).unwrap();
		let tx = sample_transaction();

		let first = account.sign_transaction(&tx).await.unwrap();
		let second = account.sign_transaction(&tx).await.unwrap();
		assert_eq!(first.raw, second.raw);
		assert_eq!(first.hash, second.hash);
	}
}

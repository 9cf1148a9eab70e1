//! Transaction delivery types shared between the account, delivery, and
//! batch-runner crates.
//!
//! A [`Transaction`] is the fully specified intent derived from a district
//! record. It is signed into a [`SignedTransaction`], broadcast, and
//! eventually confirmed by a [`TransactionReceipt`].

use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A transaction intent ready for signing.
///
/// Gas parameters come from the selected call profile, never from
/// estimation, and the nonce is fetched immediately before the intent is
/// built. The legacy gas-price shape matches what the game contract has
/// always been driven with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
	/// Target contract.
	pub to: Address,
	/// ABI-encoded calldata.
	pub data: Vec<u8>,
	/// Attached native value in wei.
	pub value: U256,
	pub nonce: u64,
	pub gas_limit: u64,
	/// Fixed gas price in wei.
	pub gas_price: u128,
	pub chain_id: u64,
}

impl Transaction {
	/// Converts the intent into an RPC request with the given sender.
	pub fn to_request(&self, from: Address) -> TransactionRequest {
		let mut request = TransactionRequest::default()
			.from(from)
			.to(self.to)
			.input(TransactionInput::new(self.data.clone().into()))
			.value(self.value)
			.nonce(self.nonce)
			.gas_limit(self.gas_limit);
		request.chain_id = Some(self.chain_id);
		request.gas_price = Some(self.gas_price);
		request
	}
}

/// A transaction hash as the chain reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHash(pub B256);

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A signed, serialized transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
	/// EIP-2718 encoded payload.
	pub raw: Vec<u8>,
	/// Hash the payload will be known by on-chain.
	pub hash: TransactionHash,
}

/// Confirmation record polled from the chain after broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	pub hash: TransactionHash,
	pub block_number: u64,
	/// Execution status; `false` is an on-chain revert.
	pub success: bool,
	pub gas_used: u128,
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	fn sample_transaction() -> Transaction {
		Transaction {
			to: address!("0B00a466AD7e747D28F599c8ecd701EEC4C2E99f"),
			data: vec![0xab, 0xcd],
			value: U256::from(10_000_000_000_000_000u128),
			nonce: 7,
			gas_limit: 102_000,
			gas_price: 100_000_000_000,
			chain_id: 137,
		}
	}

	#[test]
	fn request_carries_every_field() {
		let tx = sample_transaction();
		let from = address!("1111111111111111111111111111111111111111");
		let request = tx.to_request(from);

		assert_eq!(request.from, Some(from));
		assert_eq!(request.nonce, Some(7));
		assert_eq!(request.chain_id, Some(137));
		assert_eq!(request.gas, Some(102_000));
		assert_eq!(request.gas_price, Some(100_000_000_000));
		assert_eq!(request.value, Some(U256::from(10_000_000_000_000_000u128)));
		assert_eq!(request.input.into_input(), Some(tx.data.clone().into()));
	}

	#[test]
	fn hash_displays_hex() {
		let hash = TransactionHash(B256::repeat_byte(0x11));
		assert!(hash.to_string().starts_with("0x1111"));
		assert_eq!(hash.to_string().len(), 66);
	}
}

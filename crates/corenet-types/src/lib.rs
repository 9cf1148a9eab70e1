//! Common types for the corenet synthesis bot.
//!
//! This crate defines the domain records, transaction types, and small
//! utilities shared across the workspace so every component agrees on one
//! vocabulary: district records from the roster file, transaction intents
//! and receipts, per-district outcomes, and the retry policy used for
//! receipt polling.

/// Transaction intent, signed payload, hash, and receipt types.
pub mod delivery;
/// District records as they appear in the roster file.
pub mod district;
/// Per-district outcome tracking and batch aggregation.
pub mod outcome;
/// Bounded retry policy for receipt polling.
pub mod retry;
/// Zeroizing wrapper for secret configuration values.
pub mod secret_string;
/// Formatting and unit-conversion helpers.
pub mod utils;

// Re-export all types for convenient access
pub use delivery::{SignedTransaction, Transaction, TransactionHash, TransactionReceipt};
pub use district::{
	District, InternalTransfers, NativeTransferSpec, TokenTransferSpec, DEFAULT_BUILDING_TYPE,
	DEFAULT_RESEARCH_TYPE,
};
pub use outcome::{BatchSummary, DistrictOutcome, DistrictStage};
pub use retry::RetryPolicy;
pub use secret_string::SecretString;
pub use utils::{
	format_number, gwei_to_wei, is_wallet_address, pol_to_wei, truncate_id, wei_to_pol,
};

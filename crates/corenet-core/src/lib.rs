//! Synthesis engine for the corenet bot.
//!
//! This crate turns roster records into confirmed on-chain synthesis
//! events. [`roster`] loads the district records, [`builder`] encodes each
//! record into a transaction under the selected call profile, and
//! [`runner`] drives the batch: nonce, optional simulation, signing,
//! broadcast, and receipt polling, with one outcome per district.

use thiserror::Error;

/// ABI encoding of synthesis calls from district records.
pub mod builder;
/// Roster file loading.
pub mod roster;
/// Sequential batch processing of districts.
pub mod runner;

pub use builder::SynthesisBuilder;
pub use roster::{district_label, load_districts, RosterError};
pub use runner::SynthesisRunner;

/// Errors that can occur while processing one district.
///
/// Each variant names the stage that failed, so outcome reports read as
/// "what went wrong, where". A failure never propagates past its district.
#[derive(Debug, Error)]
pub enum SynthesisError {
	/// Engine setup failed before any district was touched.
	#[error("Configuration error: {0}")]
	Config(String),
	/// The roster entry could not be decoded into a district record.
	#[error("invalid district record: {0}")]
	InvalidRecord(String),
	/// A field the selected call shape requires is absent.
	#[error("district record missing {0}")]
	MissingField(String),
	/// A present field holds an unusable value.
	#[error("invalid {field} in district record: {message}")]
	InvalidField { field: String, message: String },
	#[error("nonce query failed: {0}")]
	Nonce(String),
	/// `eth_call` rejected the transaction before any gas was spent.
	#[error("simulation failed: {0}")]
	Simulation(String),
	#[error("signing failed: {0}")]
	Signing(String),
	#[error("broadcast failed: {0}")]
	Broadcast(String),
	/// Mined but reverted; the gas was spent with no effect.
	#[error("transaction reverted on-chain (gas used: {gas_used})")]
	Reverted { gas_used: u128 },
	/// Polling gave up before the chain reported a receipt. The
	/// transaction may still confirm later.
	#[error("no receipt after {attempts} attempts")]
	ReceiptTimeout { attempts: u32 },
}

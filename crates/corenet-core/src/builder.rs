//! ABI encoding of synthesis calls from district records.
//!
//! The [`SynthesisBuilder`] holds the target contract and the selected
//! call profile, and turns one district record plus a nonce into a fully
//! specified transaction intent. Gas figures come from the profile, never
//! from estimation, and every field the call shape needs is validated
//! here so an incomplete record fails before anything is signed.

use crate::SynthesisError;
use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use corenet_config::{CallFunction, CallProfile, NetworkConfig};
use corenet_types::{
	gwei_to_wei, pol_to_wei, District, NativeTransferSpec, TokenTransferSpec, Transaction,
	DEFAULT_BUILDING_TYPE,
};
use serde::Serialize;

// Solidity type definitions for the synthesis contract.
sol! {
	/// One game-token transfer attached to an extended synthesis event.
	struct TokenTransfer {
		string tokenId;
		uint256 amount;
		address receiver;
		address tokenContract;
	}

	/// Native POL transfer routed through the contract.
	struct InternalTransfer {
		string tokenId;
		uint256 amount;
		address sender;
		address receiver;
	}

	/// Synthesis contract entry points driven by the bot.
	interface ICoreContract {
		function emitEvent(string eventId, string message) external payable;
		function emitEventWithTransfers(string eventId, string message, TokenTransfer[] tokens, InternalTransfer internalTransfer) external;
	}
}

/// Message body for the plain `emitEvent` call.
///
/// Field order and defaults match what the contract has historically been
/// driven with, so records that omit the optional fields still produce
/// the expected payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventMessage<'a> {
	district_id: u64,
	building_id: u64,
	building_type: &'a str,
	research_type: &'a str,
}

/// Builds signable transaction intents from district records.
pub struct SynthesisBuilder {
	contract: Address,
	chain_id: u64,
	profile: CallProfile,
}

impl SynthesisBuilder {
	/// Creates a builder for the configured network and call profile.
	pub fn new(network: &NetworkConfig, profile: CallProfile) -> Result<Self, SynthesisError> {
		let contract = network
			.contract_address
			.parse::<Address>()
			.map_err(|e| SynthesisError::Config(format!("Invalid contract address: {}", e)))?;

		Ok(Self {
			contract,
			chain_id: network.chain_id,
			profile,
		})
	}

	/// Encodes one district into a transaction intent.
	///
	/// The nonce is supplied by the caller, fetched immediately before the
	/// build so sequential districts stay ordered.
	pub fn build(&self, district: &District, nonce: u64) -> Result<Transaction, SynthesisError> {
		let data = match self.profile.function {
			CallFunction::EmitEvent => encode_emit_event(district)?,
			CallFunction::EmitEventWithTransfers => encode_with_transfers(district)?,
		};
		let value = self.attached_value(district)?;

		Ok(Transaction {
			to: self.contract,
			data,
			value,
			nonce,
			gas_limit: self.profile.gas_limit,
			gas_price: gwei_to_wei(self.profile.gas_price_gwei),
			chain_id: self.chain_id,
		})
	}

	/// Native value carried by the transaction.
	///
	/// Under a value-attaching profile this is the district's internal POL
	/// amount in wei; the record must carry one.
	fn attached_value(&self, district: &District) -> Result<U256, SynthesisError> {
		if !self.profile.attach_value {
			return Ok(U256::ZERO);
		}
		let amount = pol_amount_wei(native_pol(district)?)?;
		Ok(U256::from(amount))
	}
}

fn encode_emit_event(district: &District) -> Result<Vec<u8>, SynthesisError> {
	let message = EventMessage {
		district_id: district.district_id,
		building_id: district.building_id.unwrap_or(0),
		building_type: district
			.building_type
			.as_deref()
			.unwrap_or(DEFAULT_BUILDING_TYPE),
		research_type: district.event_id(),
	};
	let message_json = serde_json::to_string(&message)
		.map_err(|e| SynthesisError::InvalidRecord(e.to_string()))?;

	Ok(ICoreContract::emitEventCall {
		eventId: district.event_id().to_string(),
		message: message_json,
	}
	.abi_encode())
}

fn encode_with_transfers(district: &District) -> Result<Vec<u8>, SynthesisError> {
	// The token map is ordered, so repeated builds encode identically.
	let tokens = district
		.tokens
		.iter()
		.map(|(symbol, spec)| token_transfer(symbol, spec))
		.collect::<Result<Vec<_>, _>>()?;

	let pol = native_pol(district)?;
	let internal_transfer = InternalTransfer {
		tokenId: "POL".to_string(),
		amount: U256::from(pol_amount_wei(pol)?),
		sender: parse_address(
			"internalTransfers.POL.sender",
			required(pol.sender.as_deref(), "internalTransfers.POL.sender")?,
		)?,
		receiver: parse_address(
			"internalTransfers.POL.receiver",
			required(pol.receiver.as_deref(), "internalTransfers.POL.receiver")?,
		)?,
	};

	let message = serde_json::to_string(district)
		.map_err(|e| SynthesisError::InvalidRecord(e.to_string()))?;

	Ok(ICoreContract::emitEventWithTransfersCall {
		eventId: district.event_id().to_string(),
		message,
		tokens,
		internalTransfer: internal_transfer,
	}
	.abi_encode())
}

fn token_transfer(symbol: &str, spec: &TokenTransferSpec) -> Result<TokenTransfer, SynthesisError> {
	let amount = spec
		.amount
		.ok_or_else(|| SynthesisError::MissingField(format!("tokens.{}.amount", symbol)))?;
	let receiver_field = format!("tokens.{}.receiver", symbol);
	let contract_field = format!("tokens.{}.contract", symbol);

	Ok(TokenTransfer {
		tokenId: symbol.to_string(),
		amount: U256::from(amount),
		receiver: parse_address(
			&receiver_field,
			required(spec.receiver.as_deref(), &receiver_field)?,
		)?,
		tokenContract: parse_address(
			&contract_field,
			required(spec.contract.as_deref(), &contract_field)?,
		)?,
	})
}

fn native_pol(district: &District) -> Result<&NativeTransferSpec, SynthesisError> {
	district
		.internal_transfers
		.as_ref()
		.and_then(|transfers| transfers.pol.as_ref())
		.ok_or_else(|| SynthesisError::MissingField("internalTransfers.POL".to_string()))
}

/// Whole-token POL amount converted to wei, with the value checked first.
fn pol_amount_wei(spec: &NativeTransferSpec) -> Result<u128, SynthesisError> {
	let amount = spec
		.amount
		.ok_or_else(|| SynthesisError::MissingField("internalTransfers.POL.amount".to_string()))?;
	if !amount.is_finite() || amount < 0.0 {
		return Err(SynthesisError::InvalidField {
			field: "internalTransfers.POL.amount".to_string(),
			message: format!("{} is not a usable POL amount", amount),
		});
	}
	Ok(pol_to_wei(amount))
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, SynthesisError> {
	value.ok_or_else(|| SynthesisError::MissingField(field.to_string()))
}

fn parse_address(field: &str, value: &str) -> Result<Address, SynthesisError> {
	value
		.parse::<Address>()
		.map_err(|e| SynthesisError::InvalidField {
			field: field.to_string(),
			message: e.to_string(),
		})
}

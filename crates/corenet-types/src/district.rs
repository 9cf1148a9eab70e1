//! District records as they appear in the roster file.
//!
//! A district is one unit of work: the roster carries a list of these
//! records and the batch runner turns each into a single on-chain synthesis
//! transaction. Records are immutable input and are never mutated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Building type recorded in the event message when the record omits one.
pub const DEFAULT_BUILDING_TYPE: &str = "FUEL_SYNTHESIZER";

/// Research type used when the record omits one; doubles as the event id.
pub const DEFAULT_RESEARCH_TYPE: &str = "FUEL_SYNTHESIZER_SYNTHESIS";

/// One district record from the roster file.
///
/// Only the id is required at decode time. Everything else is checked when
/// the transaction is built, so an incomplete record fails that district
/// alone instead of the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct District {
	/// Game-world district id.
	pub district_id: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub building_id: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub building_type: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub research_type: Option<String>,
	/// Per-symbol token transfers carried by the extended call variant.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub tokens: BTreeMap<String, TokenTransferSpec>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub internal_transfers: Option<InternalTransfers>,
}

impl District {
	/// Event id for this district: the research type, defaulted.
	pub fn event_id(&self) -> &str {
		self.research_type.as_deref().unwrap_or(DEFAULT_RESEARCH_TYPE)
	}
}

/// One entry under a district's `tokens` map.
///
/// Amounts are raw minor units; the listed game tokens all use zero
/// decimals, so the roster value goes on-chain unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransferSpec {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub amount: Option<u128>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub receiver: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub contract: Option<String>,
}

/// Native transfer block; only the POL entry is recognized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InternalTransfers {
	#[serde(rename = "POL", skip_serializing_if = "Option::is_none")]
	pub pol: Option<NativeTransferSpec>,
}

/// The native POL transfer attached to a synthesis event.
///
/// The amount is a whole-token figure from the roster, converted to wei
/// only when the transaction is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NativeTransferSpec {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub amount: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sender: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub receiver: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_full_record() {
		let json = r#"{
			"districtId": 4343,
			"buildingId": 7,
			"buildingType": "FUEL_SYNTHESIZER",
			"researchType": "FUEL_SYNTHESIZER_SYNTHESIS",
			"tokens": {
				"H": {"amount": 12, "receiver": "0x1111111111111111111111111111111111111111", "contract": "0x6989f166E49b378D38c4A5d2b00D76344dEa8Cec"}
			},
			"internalTransfers": {
				"POL": {"amount": 0.01, "sender": "0x2222222222222222222222222222222222222222", "receiver": "0x3333333333333333333333333333333333333333"}
			}
		}"#;

		let district: District = serde_json::from_str(json).unwrap();
		assert_eq!(district.district_id, 4343);
		assert_eq!(district.building_id, Some(7));
		assert_eq!(district.event_id(), "FUEL_SYNTHESIZER_SYNTHESIS");
		assert_eq!(district.tokens["H"].amount, Some(12));
		let pol = district.internal_transfers.unwrap().pol.unwrap();
		assert_eq!(pol.amount, Some(0.01));
	}

	#[test]
	fn minimal_record_defaults() {
		let district: District = serde_json::from_str(r#"{"districtId": 1}"#).unwrap();
		assert_eq!(district.event_id(), DEFAULT_RESEARCH_TYPE);
		assert!(district.tokens.is_empty());
		assert!(district.internal_transfers.is_none());
	}

	#[test]
	fn missing_id_is_rejected() {
		let result: Result<District, _> = serde_json::from_str(r#"{"buildingId": 3}"#);
		assert!(result.is_err());
	}

	#[test]
	fn serializes_without_absent_fields() {
		let district: District = serde_json::from_str(r#"{"districtId": 9}"#).unwrap();
		let json = serde_json::to_string(&district).unwrap();
		assert_eq!(json, r#"{"districtId":9}"#);
	}

	#[test]
	fn token_map_orders_symbols() {
		let json = r#"{"districtId": 1, "tokens": {"Ti": {"amount": 1}, "H": {"amount": 2}, "Si": {"amount": 3}}}"#;
		let district: District = serde_json::from_str(json).unwrap();
		let symbols: Vec<&str> = district.tokens.keys().map(String::as_str).collect();
		assert_eq!(symbols, vec!["H", "Si", "Ti"]);
	}
}

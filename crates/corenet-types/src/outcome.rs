//! Per-district outcome tracking and batch aggregation.
//!
//! The batch runner records one [`DistrictOutcome`] per roster entry and
//! folds them into a [`BatchSummary`], which renders the operator-facing
//! report sent to the log and the notifier.

use crate::TransactionHash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages a district passes through while being processed.
///
/// Transitions are strictly sequential; a failure at any stage moves the
/// district to `Failed` and the runner on to the next record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistrictStage {
	Pending,
	Built,
	Signed,
	Sent,
	Confirmed,
	Failed,
}

impl fmt::Display for DistrictStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let stage = match self {
			DistrictStage::Pending => "pending",
			DistrictStage::Built => "built",
			DistrictStage::Signed => "signed",
			DistrictStage::Sent => "sent",
			DistrictStage::Confirmed => "confirmed",
			DistrictStage::Failed => "failed",
		};
		write!(f, "{}", stage)
	}
}

/// Final record for one district in a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistrictOutcome {
	/// District id as text so undecodable records can still be reported.
	pub district_id: String,
	/// Stage reached when processing stopped.
	pub stage: DistrictStage,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tx_hash: Option<TransactionHash>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub gas_used: Option<u128>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl DistrictOutcome {
	/// Records a confirmed district.
	pub fn confirmed(
		district_id: impl Into<String>,
		tx_hash: TransactionHash,
		gas_used: u128,
	) -> Self {
		Self {
			district_id: district_id.into(),
			stage: DistrictStage::Confirmed,
			tx_hash: Some(tx_hash),
			gas_used: Some(gas_used),
			error: None,
		}
	}

	/// Records a failed district with the stage-specific reason.
	pub fn failed(district_id: impl Into<String>, error: impl fmt::Display) -> Self {
		Self {
			district_id: district_id.into(),
			stage: DistrictStage::Failed,
			tx_hash: None,
			gas_used: None,
			error: Some(error.to_string()),
		}
	}

	/// Attaches the hash of a transaction that made it on the wire.
	pub fn with_tx_hash(mut self, hash: TransactionHash) -> Self {
		self.tx_hash = Some(hash);
		self
	}

	/// Attaches gas usage reported by a receipt.
	pub fn with_gas_used(mut self, gas_used: u128) -> Self {
		self.gas_used = Some(gas_used);
		self
	}

	/// Whether this district's transaction confirmed successfully.
	pub fn succeeded(&self) -> bool {
		self.stage == DistrictStage::Confirmed
	}
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchSummary {
	pub total: usize,
	pub succeeded: usize,
	pub failed: usize,
	pub outcomes: Vec<DistrictOutcome>,
}

impl BatchSummary {
	/// Creates an empty summary for a batch of the given size.
	pub fn new(total: usize) -> Self {
		Self {
			total,
			..Default::default()
		}
	}

	/// Folds one district outcome into the aggregate counts.
	pub fn record(&mut self, outcome: DistrictOutcome) {
		if outcome.succeeded() {
			self.succeeded += 1;
		} else {
			self.failed += 1;
		}
		self.outcomes.push(outcome);
	}

	/// Operator-facing report used for logs and notifications.
	pub fn render(&self) -> String {
		let mut lines = vec![
			"Synthesis Summary:".to_string(),
			format!("Processed: {}/{} districts", self.outcomes.len(), self.total),
			format!("Successful: {}/{}", self.succeeded, self.total),
			format!("Failed: {}/{}", self.failed, self.total),
		];
		for outcome in &self.outcomes {
			lines.push(Self::detail_line(outcome));
		}
		lines.join("\n")
	}

	fn detail_line(outcome: &DistrictOutcome) -> String {
		if outcome.succeeded() {
			let hash = outcome
				.tx_hash
				.map(|hash| hash.to_string())
				.unwrap_or_default();
			match outcome.gas_used {
				Some(gas_used) => format!(
					"District {}: ✅ Success - Tx: {} (gas used: {})",
					outcome.district_id, hash, gas_used
				),
				None => format!("District {}: ✅ Success - Tx: {}", outcome.district_id, hash),
			}
		} else {
			let reason = outcome.error.as_deref().unwrap_or("unknown error");
			match outcome.tx_hash {
				Some(hash) => format!(
					"District {}: ❌ Failed - {} (Tx: {})",
					outcome.district_id, reason, hash
				),
				None => format!("District {}: ❌ Failed - {}", outcome.district_id, reason),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::B256;

	fn hash(byte: u8) -> TransactionHash {
		TransactionHash(B256::repeat_byte(byte))
	}

	#[test]
	fn counts_follow_outcomes() {
		let mut summary = BatchSummary::new(3);
		summary.record(DistrictOutcome::confirmed("1", hash(0x11), 95_000));
		summary.record(DistrictOutcome::failed("2", "district record missing internalTransfers.POL"));
		summary.record(DistrictOutcome::confirmed("3", hash(0x22), 95_001));

		assert_eq!(summary.total, 3);
		assert_eq!(summary.succeeded, 2);
		assert_eq!(summary.failed, 1);
		assert_eq!(summary.outcomes.len(), 3);
	}

	#[test]
	fn render_reports_counts_and_details() {
		let mut summary = BatchSummary::new(2);
		summary.record(DistrictOutcome::confirmed("4343", hash(0xaa), 101_202));
		summary.record(DistrictOutcome::failed("9", "no receipt after 10 attempts").with_tx_hash(hash(0xbb)));

		let report = summary.render();
		assert!(report.contains("Processed: 2/2 districts"));
		assert!(report.contains("Successful: 1/2"));
		assert!(report.contains("Failed: 1/2"));
		assert!(report.contains("District 4343: ✅ Success"));
		assert!(report.contains("gas used: 101202"));
		assert!(report.contains("District 9: ❌ Failed - no receipt after 10 attempts"));
	}

	#[test]
	fn failed_keeps_stage_failed() {
		let outcome = DistrictOutcome::failed("7", "signing failed").with_gas_used(0);
		assert_eq!(outcome.stage, DistrictStage::Failed);
		assert!(!outcome.succeeded());
	}

	#[test]
	fn stage_display_is_lowercase() {
		assert_eq!(DistrictStage::Confirmed.to_string(), "confirmed");
		assert_eq!(DistrictStage::Pending.to_string(), "pending");
	}
}

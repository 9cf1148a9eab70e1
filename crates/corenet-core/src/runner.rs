//! Sequential batch processing of districts.
//!
//! The [`SynthesisRunner`] walks the roster in order and takes each
//! district through the full pipeline: decode, nonce, optional
//! simulation, sign, broadcast, receipt. Districts are strictly
//! sequential because they share one sender nonce. A failure at any
//! stage records the outcome and moves on; nothing short of the caller
//! dropping the future stops the batch.

use crate::{builder::SynthesisBuilder, roster, SynthesisError};
use corenet_account::LocalAccount;
use corenet_config::SynthesisConfig;
use corenet_delivery::DeliveryService;
use corenet_notify::Notifier;
use corenet_types::{
	truncate_id, BatchSummary, District, DistrictOutcome, DistrictStage, TransactionHash,
	TransactionReceipt,
};
use std::sync::Arc;
use std::time::Duration;

/// Drives one synthesis batch end to end.
pub struct SynthesisRunner {
	account: LocalAccount,
	delivery: Arc<DeliveryService>,
	builder: SynthesisBuilder,
	notifier: Arc<Notifier>,
	synthesis: SynthesisConfig,
}

impl SynthesisRunner {
	pub fn new(
		account: LocalAccount,
		delivery: Arc<DeliveryService>,
		builder: SynthesisBuilder,
		notifier: Arc<Notifier>,
		synthesis: SynthesisConfig,
	) -> Self {
		Self {
			account,
			delivery,
			builder,
			notifier,
			synthesis,
		}
	}

	/// Processes every roster record in order and returns the summary.
	///
	/// The summary notification is sent before returning, whatever the
	/// outcome mix.
	pub async fn run(&self, records: &[serde_json::Value]) -> BatchSummary {
		let total = records.len();
		let mut summary = BatchSummary::new(total);
		tracing::info!(total, profile = %self.synthesis.profile, "Starting synthesis batch");

		for (position, record) in records.iter().enumerate() {
			let label = roster::district_label(record);
			tracing::info!(
				district = %truncate_id(&label),
				position = position + 1,
				total,
				"Processing district"
			);

			let outcome = self.process_district(&label, record).await;
			if outcome.succeeded() && self.synthesis.notify_per_district {
				self.notify_success(&outcome).await;
			}
			summary.record(outcome);

			// Pause between districts so each sees the incremented nonce.
			if position + 1 < total && self.synthesis.district_delay_secs > 0 {
				tokio::time::sleep(Duration::from_secs(self.synthesis.district_delay_secs)).await;
			}
		}

		if total > 0 {
			if summary.succeeded == total {
				tracing::info!("All transactions executed successfully");
			} else if summary.succeeded > 0 {
				tracing::info!(
					succeeded = summary.succeeded,
					total,
					"Batch finished with partial success"
				);
			} else {
				tracing::error!("All transactions failed");
			}
		}
		self.notifier.send(&summary.render()).await;

		summary
	}

	async fn process_district(&self, label: &str, record: &serde_json::Value) -> DistrictOutcome {
		let mut sent_hash = None;
		match self.synthesize(record, &mut sent_hash).await {
			Ok(receipt) => DistrictOutcome::confirmed(label, receipt.hash, receipt.gas_used),
			Err(e) => {
				tracing::warn!(district = %truncate_id(label), error = %e, "District failed");
				let mut outcome = DistrictOutcome::failed(label, &e);
				if let Some(hash) = sent_hash {
					outcome = outcome.with_tx_hash(hash);
				}
				if let SynthesisError::Reverted { gas_used } = e {
					outcome = outcome.with_gas_used(gas_used);
				}
				outcome
			},
		}
	}

	/// One district through every stage, stopping at the first failure.
	///
	/// `sent_hash` is written the moment the transaction is on the wire so
	/// the caller can attach it to a failure outcome; past that point the
	/// chain may confirm the transaction even if this function errors.
	async fn synthesize(
		&self,
		record: &serde_json::Value,
		sent_hash: &mut Option<TransactionHash>,
	) -> Result<TransactionReceipt, SynthesisError> {
		let district: District = serde_json::from_value(record.clone())
			.map_err(|e| SynthesisError::InvalidRecord(e.to_string()))?;

		let nonce = self
			.delivery
			.get_nonce(self.account.address())
			.await
			.map_err(|e| SynthesisError::Nonce(e.to_string()))?;

		let tx = self.builder.build(&district, nonce)?;
		tracing::debug!(
			district_id = district.district_id,
			nonce,
			stage = %DistrictStage::Built,
			"Transaction built"
		);

		if self.synthesis.simulate {
			self.delivery
				.call(&tx, self.account.address())
				.await
				.map_err(|e| SynthesisError::Simulation(e.to_string()))?;
			tracing::debug!(district_id = district.district_id, "Simulation passed");
		}

		let signed = self
			.account
			.sign_transaction(&tx)
			.await
			.map_err(|e| SynthesisError::Signing(e.to_string()))?;
		tracing::debug!(
			district_id = district.district_id,
			tx_hash = %signed.hash,
			stage = %DistrictStage::Signed,
			"Transaction signed"
		);

		let hash = self
			.delivery
			.submit(&signed)
			.await
			.map_err(|e| SynthesisError::Broadcast(e.to_string()))?;
		*sent_hash = Some(hash);
		tracing::info!(tx_hash = %hash, stage = %DistrictStage::Sent, "Transaction sent");

		let receipt = self.delivery.wait_for_receipt(&hash).await.ok_or(
			SynthesisError::ReceiptTimeout {
				attempts: self.delivery.retry_policy().max_attempts,
			},
		)?;

		if !receipt.success {
			return Err(SynthesisError::Reverted {
				gas_used: receipt.gas_used,
			});
		}

		tracing::info!(
			tx_hash = %hash,
			block_number = receipt.block_number,
			gas_used = receipt.gas_used,
			"Transaction confirmed"
		);
		Ok(receipt)
	}

	async fn notify_success(&self, outcome: &DistrictOutcome) {
		let hash = outcome
			.tx_hash
			.map(|hash| hash.to_string())
			.unwrap_or_default();
		let text = format!(
			"Synthesis successful!\nDistrict: {}\nTx: {}\nGas used: {}",
			outcome.district_id,
			hash,
			outcome.gas_used.unwrap_or_default()
		);
		self.notifier.send(&text).await;
	}
}

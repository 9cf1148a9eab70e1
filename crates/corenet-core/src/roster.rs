//! Roster file loading.
//!
//! The roster is a JSON document whose `districts` array lists the work
//! for one run. Entries are kept as raw JSON values here; decoding into
//! typed records happens per district inside the runner, so one malformed
//! entry fails alone instead of taking the whole file down.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading the roster file.
#[derive(Debug, Error)]
pub enum RosterError {
	#[error("Failed to read roster file: {0}")]
	Io(#[from] std::io::Error),
	#[error("Failed to parse roster file: {0}")]
	Parse(String),
}

#[derive(Debug, Deserialize)]
struct RosterFile {
	#[serde(default)]
	districts: Vec<serde_json::Value>,
}

/// Loads the district records from a roster file.
///
/// A file without a `districts` key is an empty batch, not an error.
pub async fn load_districts(path: impl AsRef<Path>) -> Result<Vec<serde_json::Value>, RosterError> {
	let raw = tokio::fs::read_to_string(path.as_ref()).await?;
	let file: RosterFile =
		serde_json::from_str(&raw).map_err(|e| RosterError::Parse(e.to_string()))?;
	Ok(file.districts)
}

/// District id used in logs and outcome records.
///
/// Works on the raw JSON entry so even records that later fail to decode
/// keep a stable label.
pub fn district_label(record: &serde_json::Value) -> String {
	match record.get("districtId") {
		Some(serde_json::Value::Number(id)) => id.to_string(),
		Some(serde_json::Value::String(id)) => id.clone(),
		_ => "unknown".to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use std::io::Write;
	use tempfile::NamedTempFile;

	fn write_roster(contents: &str) -> NamedTempFile {
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(contents.as_bytes()).unwrap();
		file.flush().unwrap();
		file
	}

	#[tokio::test]
	async fn loads_districts_in_file_order() {
		let file = write_roster(
			r#"{"districts": [{"districtId": 4343}, {"districtId": 9}, "not even an object"]}"#,
		);

		let records = load_districts(file.path()).await.unwrap();
		assert_eq!(records.len(), 3);
		assert_eq!(records[0]["districtId"], 4343);
		assert_eq!(records[2], json!("not even an object"));
	}

	#[tokio::test]
	async fn missing_districts_key_is_an_empty_batch() {
		let file = write_roster(r#"{"version": 2}"#);
		let records = load_districts(file.path()).await.unwrap();
		assert!(records.is_empty());
	}

	#[tokio::test]
	async fn malformed_json_is_a_parse_error() {
		let file = write_roster("{\"districts\": [");
		let result = load_districts(file.path()).await;
		assert!(matches!(result, Err(RosterError::Parse(_))));
	}

	#[tokio::test]
	async fn missing_file_is_an_io_error() {
		let result = load_districts("/nonexistent/roster.json").await;
		assert!(matches!(result, Err(RosterError::Io(_))));
	}

	#[test]
	fn label_reads_numeric_and_string_ids() {
		assert_eq!(district_label(&json!({"districtId": 4343})), "4343");
		assert_eq!(district_label(&json!({"districtId": "A-7"})), "A-7");
	}

	#[test]
	fn label_falls_back_to_unknown() {
		assert_eq!(district_label(&json!({"buildingId": 1})), "unknown");
		assert_eq!(district_label(&json!(42)), "unknown");
	}
}

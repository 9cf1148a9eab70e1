//! Bounded retry policy for receipt polling.
//!
//! The original scripts hardcoded their polling constants inline; here they
//! are one reusable config value consumed by the delivery service.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A fixed number of attempts separated by a fixed interval, with an
/// optional wall-clock ceiling cutting the wait short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	#[serde(default = "default_poll_interval_secs")]
	pub poll_interval_secs: u64,
	/// Overall ceiling in seconds; `None` disables it.
	#[serde(default = "default_max_wait_secs")]
	pub max_wait_secs: Option<u64>,
}

fn default_max_attempts() -> u32 {
	10
}

fn default_poll_interval_secs() -> u64 {
	5
}

fn default_max_wait_secs() -> Option<u64> {
	Some(120)
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: default_max_attempts(),
			poll_interval_secs: default_poll_interval_secs(),
			max_wait_secs: default_max_wait_secs(),
		}
	}
}

impl RetryPolicy {
	/// Pause between attempts.
	pub fn poll_interval(&self) -> Duration {
		Duration::from_secs(self.poll_interval_secs)
	}

	/// Wall-clock ceiling, if configured.
	pub fn max_wait(&self) -> Option<Duration> {
		self.max_wait_secs.map(Duration::from_secs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_tuned_constants() {
		let policy = RetryPolicy::default();
		assert_eq!(policy.max_attempts, 10);
		assert_eq!(policy.poll_interval(), Duration::from_secs(5));
		assert_eq!(policy.max_wait(), Some(Duration::from_secs(120)));
	}

	#[test]
	fn partial_toml_fills_defaults() {
		let policy: RetryPolicy = toml::from_str("max_attempts = 3").unwrap();
		assert_eq!(policy.max_attempts, 3);
		assert_eq!(policy.poll_interval_secs, 5);
		assert_eq!(policy.max_wait_secs, Some(120));
	}

	#[test]
	fn ceiling_can_be_disabled() {
		let policy = RetryPolicy {
			max_wait_secs: None,
			..Default::default()
		};
		assert_eq!(policy.max_wait(), None);
	}
}

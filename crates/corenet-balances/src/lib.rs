//! Wallet balance reporting via the block-explorer API.
//!
//! Queries the explorer for the native balance and a fixed set of game
//! tokens, then renders them as aligned text lines. Per-token failures are
//! surfaced inline in the report so one broken token never hides the
//! others; only invalid input fails the report as a whole.

use corenet_config::ExplorerConfig;
use corenet_types::{format_number, is_wallet_address};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that fail the whole report before any query is made.
#[derive(Debug, Error)]
pub enum BalanceError {
	/// Address or API key missing.
	#[error("Wallet address and API key are required")]
	MissingCredentials,
	/// Address does not look like a 0x-prefixed 42-character address.
	#[error("Invalid wallet address format")]
	InvalidAddress,
}

/// One token in the fixed report set.
struct TokenEntry {
	symbol: &'static str,
	/// `None` is the native token.
	contract: Option<&'static str>,
	decimals: u32,
	display_decimals: usize,
}

/// The reported token set, in display order. The game tokens all use zero
/// decimals, so their raw balances are shown unscaled.
const TOKENS: &[TokenEntry] = &[
	TokenEntry {
		symbol: "POL",
		contract: None,
		decimals: 18,
		display_decimals: 3,
	},
	TokenEntry {
		symbol: "Si",
		contract: Some("0xD2fDBb49DBA431fb728a046c5900618deED064fF"),
		decimals: 0,
		display_decimals: 0,
	},
	TokenEntry {
		symbol: "REE",
		contract: Some("0x813a5B8eE3932B5ce1c4B2b6444d599A128a6C71"),
		decimals: 0,
		display_decimals: 0,
	},
	TokenEntry {
		symbol: "C",
		contract: Some("0xf986430B685e9aB18E0108C604d31b71971DB5F7"),
		decimals: 0,
		display_decimals: 0,
	},
	TokenEntry {
		symbol: "Ti",
		contract: Some("0xF53CE43b19f04E84890E3c347Dc4A366f3D75619"),
		decimals: 0,
		display_decimals: 0,
	},
	TokenEntry {
		symbol: "H",
		contract: Some("0x6989f166E49b378D38c4A5d2b00D76344dEa8Cec"),
		decimals: 0,
		display_decimals: 0,
	},
	TokenEntry {
		symbol: "He3",
		contract: Some("0xc316115D4ce93Af8E081d8555820fF74eFD5b5AE"),
		decimals: 0,
		display_decimals: 0,
	},
	TokenEntry {
		symbol: "COS",
		contract: Some("0x2c6e0C3EC2107144CcbadD6b003eC13b72EB44E7"),
		decimals: 0,
		display_decimals: 0,
	},
	TokenEntry {
		symbol: "CN",
		contract: Some("0x7BeD50d99CfdBea233A2F2E3DCCd4F9A0acAfe6c"),
		decimals: 0,
		display_decimals: 0,
	},
	TokenEntry {
		symbol: "CRS",
		contract: Some("0x4F80a7627bfb9fdc54d7184e0DDeB2c76596cC3C"),
		decimals: 0,
		display_decimals: 0,
	},
];

/// Explorer API envelope: `status == "1"` carries the raw amount in
/// `result`, anything else an error message.
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
	status: String,
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	result: Option<String>,
}

/// Per-token failure split by origin, shaping the inline error text.
enum QueryError {
	/// The explorer answered but rejected the query.
	Api(String),
	/// The request never produced a usable answer.
	Transport(String),
}

/// Balance reporter bound to one explorer endpoint and chain.
pub struct BalanceReporter {
	client: reqwest::Client,
	config: ExplorerConfig,
	chain_id: u64,
}

impl BalanceReporter {
	pub fn new(config: ExplorerConfig, chain_id: u64) -> Self {
		Self {
			client: reqwest::Client::new(),
			config,
			chain_id,
		}
	}

	/// Builds the aligned balance report for a wallet.
	///
	/// Input is validated before any network call; after that, failures stay
	/// inside the affected token's line.
	pub async fn report(&self, wallet_address: &str) -> Result<String, BalanceError> {
		if wallet_address.is_empty() || self.config.api_key.is_empty() {
			return Err(BalanceError::MissingCredentials);
		}
		if !is_wallet_address(wallet_address) {
			return Err(BalanceError::InvalidAddress);
		}

		let delay = Duration::from_millis(self.config.query_delay_ms);
		let mut entries = Vec::with_capacity(TOKENS.len());
		for (i, token) in TOKENS.iter().enumerate() {
			// Spacing out queries keeps the explorer rate limiter quiet.
			if i > 0 && !delay.is_zero() {
				tokio::time::sleep(delay).await;
			}
			entries.push((token.symbol, self.token_value(wallet_address, token).await));
		}

		Ok(render_report(&entries))
	}

	/// One token's display value, or its inline error text.
	async fn token_value(&self, wallet_address: &str, token: &TokenEntry) -> String {
		tracing::debug!(symbol = token.symbol, "Querying balance");
		match self.fetch_raw_balance(wallet_address, token.contract).await {
			Ok(raw) => {
				let scaled = raw / 10f64.powi(token.decimals as i32);
				format_number(scaled, token.display_decimals)
			},
			Err(QueryError::Api(message)) => format!("Error fetching balance - {}", message),
			Err(QueryError::Transport(message)) => format!("Error - {}", message),
		}
	}

	async fn fetch_raw_balance(
		&self,
		address: &str,
		contract: Option<&'static str>,
	) -> Result<f64, QueryError> {
		let chain_id = self.chain_id.to_string();
		let mut params: Vec<(&str, &str)> = vec![("chainid", chain_id.as_str()), ("module", "account")];
		match contract {
			Some(contract) => {
				params.push(("action", "tokenbalance"));
				params.push(("contractaddress", contract));
			},
			None => params.push(("action", "balance")),
		}
		params.push(("address", address));
		params.push(("tag", "latest"));
		params.push(("apikey", self.config.api_key.expose()));

		let response = self
			.client
			.get(&self.config.api_url)
			.query(&params)
			.send()
			.await
			.map_err(|e| QueryError::Transport(e.to_string()))?;
		let payload: ExplorerResponse = response
			.json()
			.await
			.map_err(|e| QueryError::Transport(e.to_string()))?;

		interpret(payload)
	}
}

/// Extracts the raw amount from an explorer envelope.
fn interpret(payload: ExplorerResponse) -> Result<f64, QueryError> {
	if payload.status != "1" {
		return Err(QueryError::Api(
			payload.message.unwrap_or_else(|| "Unknown error".to_string()),
		));
	}
	let raw = payload.result.unwrap_or_default();
	raw.parse::<f64>()
		.map_err(|_| QueryError::Api(format!("Unparseable balance '{}'", raw)))
}

/// Renders value lines with the symbol column aligned by padding.
fn render_report(entries: &[(&str, String)]) -> String {
	let max_symbol_len = entries
		.iter()
		.map(|(symbol, _)| symbol.len())
		.max()
		.unwrap_or(0);
	entries
		.iter()
		.map(|(symbol, value)| {
			let padding = " ".repeat(max_symbol_len - symbol.len() + 5);
			format!("{}{}{}", value, padding, symbol)
		})
		.collect::<Vec<_>>()
		.join("\n")
}

#[cfg(test)]
mod tests {
	use super::*;

	fn reporter_with_key() -> BalanceReporter {
		let config = ExplorerConfig {
			api_key: "test-key".into(),
			..Default::default()
		};
		BalanceReporter::new(config, 137)
	}

	#[tokio::test]
	async fn short_address_is_rejected_before_any_query() {
		let result = reporter_with_key().report("0x742d35Cc").await;
		assert!(matches!(result, Err(BalanceError::InvalidAddress)));
	}

	#[tokio::test]
	async fn unprefixed_address_is_rejected() {
		let result = reporter_with_key()
			.report("742d35Cc6634C0532925a3b844Bc454e4438f44e42")
			.await;
		assert!(matches!(result, Err(BalanceError::InvalidAddress)));
	}

	#[tokio::test]
	async fn missing_api_key_is_rejected() {
		let reporter = BalanceReporter::new(ExplorerConfig::default(), 137);
		let result = reporter
			.report("0x742d35Cc6634C0532925a3b844Bc454e4438f44e")
			.await;
		assert!(matches!(result, Err(BalanceError::MissingCredentials)));
	}

	#[tokio::test]
	async fn empty_address_is_rejected() {
		let result = reporter_with_key().report("").await;
		assert!(matches!(result, Err(BalanceError::MissingCredentials)));
	}

	#[test]
	fn interpret_success_parses_the_amount() {
		let payload = ExplorerResponse {
			status: "1".to_string(),
			message: Some("OK".to_string()),
			result: Some("1234567".to_string()),
		};
		match interpret(payload) {
			Ok(raw) => assert_eq!(raw, 1_234_567.0),
			Err(_) => panic!("expected a parsed amount"),
		}
	}

	#[test]
	fn interpret_failure_carries_the_api_message() {
		let payload = ExplorerResponse {
			status: "0".to_string(),
			message: Some("NOTOK".to_string()),
			result: Some("Max rate limit reached".to_string()),
		};
		match interpret(payload) {
			Err(QueryError::Api(message)) => assert_eq!(message, "NOTOK"),
			_ => panic!("expected an api error"),
		}
	}

	#[test]
	fn interpret_failure_without_message_uses_a_default() {
		let payload = ExplorerResponse {
			status: "0".to_string(),
			message: None,
			result: None,
		};
		match interpret(payload) {
			Err(QueryError::Api(message)) => assert_eq!(message, "Unknown error"),
			_ => panic!("expected an api error"),
		}
	}

	#[test]
	fn render_aligns_symbols() {
		let entries = vec![
			("POL", "1'234.567".to_string()),
			("H", "42".to_string()),
			("He3", "Error fetching balance - NOTOK".to_string()),
		];
		let report = render_report(&entries);
		let lines: Vec<&str> = report.lines().collect();
		assert_eq!(lines[0], "1'234.567     POL");
		assert_eq!(lines[1], "42       H");
		assert_eq!(lines[2], "Error fetching balance - NOTOK     He3");
	}

	#[test]
	fn token_table_matches_the_deployment() {
		assert_eq!(TOKENS.len(), 10);
		assert_eq!(TOKENS[0].symbol, "POL");
		assert!(TOKENS[0].contract.is_none());
		assert_eq!(TOKENS[0].decimals, 18);
		for token in &TOKENS[1..] {
			let contract = token.contract.unwrap();
			assert!(contract.starts_with("0x") && contract.len() == 42);
			assert_eq!(token.decimals, 0);
		}
	}
}

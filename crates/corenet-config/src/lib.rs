//! Configuration for the corenet synthesis bot.
//!
//! Configuration is one TOML file parsed into typed sections. Secrets are
//! referenced from the environment with `${VAR}` (required) or
//! `${VAR:-default}` (optional) placeholders resolved before parsing, so a
//! missing signing key fails the run before anything touches the network.
//! Every section except `[wallet]` is optional and falls back to the values
//! the bot has always been driven with.

use corenet_types::{is_wallet_address, RetryPolicy, SecretString};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the bot.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Identity of this bot instance.
	#[serde(default)]
	pub bot: BotConfig,
	/// Chain endpoint and target contract.
	#[serde(default)]
	pub network: NetworkConfig,
	/// Signing key and optional report address.
	pub wallet: WalletConfig,
	/// Batch behavior and call profiles.
	#[serde(default)]
	pub synthesis: SynthesisConfig,
	/// Receipt polling policy.
	#[serde(default)]
	pub receipt: RetryPolicy,
	/// Block-explorer balance API.
	#[serde(default)]
	pub explorer: ExplorerConfig,
	/// Telegram notification credentials.
	#[serde(default)]
	pub telegram: TelegramConfig,
}

/// Identity of this bot instance, used in logs and notifications.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
	#[serde(default = "default_bot_id")]
	pub id: String,
}

impl Default for BotConfig {
	fn default() -> Self {
		Self {
			id: default_bot_id(),
		}
	}
}

fn default_bot_id() -> String {
	"corenet".to_string()
}

/// Chain endpoint and target contract.
///
/// Defaults point at the production deployment: the public Polygon RPC and
/// the game contract it has always been driven against.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	#[serde(default = "default_rpc_url")]
	pub rpc_url: String,
	#[serde(default = "default_chain_id")]
	pub chain_id: u64,
	/// The fixed synthesis contract.
	#[serde(default = "default_contract_address")]
	pub contract_address: String,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			rpc_url: default_rpc_url(),
			chain_id: default_chain_id(),
			contract_address: default_contract_address(),
		}
	}
}

fn default_rpc_url() -> String {
	"https://polygon-rpc.com".to_string()
}

fn default_chain_id() -> u64 {
	137
}

fn default_contract_address() -> String {
	"0x0B00a466AD7e747D28F599c8ecd701EEC4C2E99f".to_string()
}

/// Signing key and optional report address.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalletConfig {
	/// Hex private key; always referenced as `${PRIVATE_KEY}` so a missing
	/// variable fails resolution instead of producing an empty key.
	pub private_key: SecretString,
	/// Address used by the balance report; empty means derive it from the
	/// signing key.
	#[serde(default)]
	pub address: String,
}

impl WalletConfig {
	/// The configured report address, if one is set.
	pub fn report_address(&self) -> Option<&str> {
		if self.address.is_empty() {
			None
		} else {
			Some(&self.address)
		}
	}
}

/// Batch behavior and the call-profile table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SynthesisConfig {
	/// Which profile drives this run.
	#[serde(default = "default_profile")]
	pub profile: String,
	/// Pause between districts, avoiding nonce reuse and rate limits.
	#[serde(default = "default_district_delay_secs")]
	pub district_delay_secs: u64,
	/// When set, every built call is simulated with `eth_call` before
	/// signing; a revert fails the district without spending gas.
	#[serde(default)]
	pub simulate: bool,
	/// Send a notification per confirmed district, not just the summary.
	#[serde(default)]
	pub notify_per_district: bool,
	/// Named call profiles. Defining any profile replaces the built-in
	/// table, so custom tables must carry every profile they reference.
	#[serde(default = "default_profiles")]
	pub profiles: HashMap<String, CallProfile>,
}

impl Default for SynthesisConfig {
	fn default() -> Self {
		Self {
			profile: default_profile(),
			district_delay_secs: default_district_delay_secs(),
			simulate: false,
			notify_per_district: false,
			profiles: default_profiles(),
		}
	}
}

impl SynthesisConfig {
	/// The selected call profile; validation guarantees it exists.
	pub fn active_profile(&self) -> Option<&CallProfile> {
		self.profiles.get(&self.profile)
	}
}

fn default_profile() -> String {
	"emit_event".to_string()
}

fn default_district_delay_secs() -> u64 {
	2
}

/// Returns the built-in call profiles.
///
/// Gas figures were tuned from previously observed successful transactions;
/// there is deliberately no dynamic estimation.
fn default_profiles() -> HashMap<String, CallProfile> {
	HashMap::from([
		(
			"emit_event".to_string(),
			CallProfile {
				function: CallFunction::EmitEvent,
				gas_limit: 102_000,
				gas_price_gwei: 100.0,
				attach_value: true,
			},
		),
		(
			"emit_event_with_transfers".to_string(),
			CallProfile {
				function: CallFunction::EmitEventWithTransfers,
				gas_limit: 1_000_000,
				gas_price_gwei: 612.941_762_76,
				attach_value: false,
			},
		),
	])
}

/// One entry in the call-profile table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CallProfile {
	/// Which contract function this profile drives.
	pub function: CallFunction,
	pub gas_limit: u64,
	/// Fixed gas price in gwei.
	pub gas_price_gwei: f64,
	/// Whether the internal POL amount is attached as native value.
	#[serde(default)]
	pub attach_value: bool,
}

/// The two ABI shapes the synthesis contract accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallFunction {
	EmitEvent,
	EmitEventWithTransfers,
}

/// Block-explorer balance API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExplorerConfig {
	#[serde(default = "default_explorer_api_url")]
	pub api_url: String,
	#[serde(default)]
	pub api_key: SecretString,
	/// Pause between token queries, respecting the explorer rate limit.
	#[serde(default = "default_query_delay_ms")]
	pub query_delay_ms: u64,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			api_url: default_explorer_api_url(),
			api_key: SecretString::default(),
			query_delay_ms: default_query_delay_ms(),
		}
	}
}

fn default_explorer_api_url() -> String {
	"https://api.etherscan.io/v2/api".to_string()
}

fn default_query_delay_ms() -> u64 {
	500
}

/// Telegram notification credentials. Empty credentials turn the notifier
/// into a logged no-op.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TelegramConfig {
	#[serde(default)]
	pub bot_token: SecretString,
	#[serde(default)]
	pub chat_id: String,
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of the environment variable
/// VAR_NAME. Supports default values with `${VAR_NAME:-default_value}`.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let pattern = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut resolved = String::with_capacity(input.len());
	let mut last_end = 0;

	for capture in pattern.captures_iter(input) {
		let matched = capture.get(0).unwrap();
		let name = capture.get(1).unwrap().as_str();
		let fallback = capture.get(2).map(|m| m.as_str());

		let value = match std::env::var(name) {
			Ok(value) => value,
			Err(_) => match fallback {
				Some(fallback) => fallback.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						name
					)))
				},
			},
		};

		resolved.push_str(&input[last_end..matched.start()]);
		resolved.push_str(&value);
		last_end = matched.end();
	}
	resolved.push_str(&input[last_end..]);

	Ok(resolved)
}

impl Config {
	/// Loads configuration from a file with environment variable resolution.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let raw = tokio::fs::read_to_string(path.as_ref()).await?;
		raw.parse()
	}

	/// Validates the configuration to ensure all required fields are
	/// properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.bot.id.is_empty() {
			return Err(ConfigError::Validation("Bot id cannot be empty".into()));
		}

		if self.network.rpc_url.is_empty() {
			return Err(ConfigError::Validation("RPC URL cannot be empty".into()));
		}
		if self.network.chain_id == 0 {
			return Err(ConfigError::Validation(
				"Chain id must be greater than 0".into(),
			));
		}
		if !is_wallet_address(&self.network.contract_address) {
			return Err(ConfigError::Validation(format!(
				"Contract address '{}' is not a 0x-prefixed 42-character address",
				self.network.contract_address
			)));
		}

		if self.wallet.private_key.is_empty() {
			return Err(ConfigError::Validation(
				"Wallet private key cannot be empty".into(),
			));
		}
		if !self.wallet.address.is_empty() && !is_wallet_address(&self.wallet.address) {
			return Err(ConfigError::Validation(format!(
				"Wallet address '{}' is not a 0x-prefixed 42-character address",
				self.wallet.address
			)));
		}

		if self.synthesis.profiles.is_empty() {
			return Err(ConfigError::Validation(
				"At least one call profile must be configured".into(),
			));
		}
		if !self
			.synthesis
			.profiles
			.contains_key(&self.synthesis.profile)
		{
			return Err(ConfigError::Validation(format!(
				"Synthesis profile '{}' not found in profiles",
				self.synthesis.profile
			)));
		}
		for (name, profile) in &self.synthesis.profiles {
			if profile.gas_limit == 0 {
				return Err(ConfigError::Validation(format!(
					"Profile '{}' must have a gas limit greater than 0",
					name
				)));
			}
			if !profile.gas_price_gwei.is_finite() || profile.gas_price_gwei <= 0.0 {
				return Err(ConfigError::Validation(format!(
					"Profile '{}' must have a positive gas price",
					name
				)));
			}
		}

		if self.receipt.max_attempts == 0 {
			return Err(ConfigError::Validation(
				"Receipt max_attempts must be at least 1".into(),
			));
		}
		if self.receipt.max_attempts > 100 {
			return Err(ConfigError::Validation(
				"Receipt max_attempts cannot exceed 100".into(),
			));
		}

		Ok(())
	}
}

/// Parsing from a TOML string: environment variables are resolved and the
/// configuration is validated before being returned.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

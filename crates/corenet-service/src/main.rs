//! Main entry point for the corenet bot.
//!
//! This binary drives the two operator workflows: turning a district
//! roster into confirmed on-chain synthesis events, and reporting wallet
//! balances through the block-explorer API. Both share one configuration
//! file and the optional Telegram notifier.

use clap::{Parser, Subcommand};
use corenet_account::LocalAccount;
use corenet_balances::BalanceReporter;
use corenet_config::Config;
use corenet_core::{load_districts, SynthesisBuilder, SynthesisRunner};
use corenet_delivery::{AlloyDelivery, DeliveryService};
use corenet_notify::Notifier;
use corenet_types::wei_to_pol;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line arguments for the corenet bot.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Process the district roster into on-chain synthesis events
	Synthesize {
		/// Path to the district roster file
		#[arg(short, long, default_value = "transaction_data.json")]
		districts: PathBuf,
	},
	/// Report wallet balances through the block-explorer API
	Balances {
		/// Wallet address to report on; defaults to the configured wallet
		#[arg(short, long)]
		address: Option<String>,
	},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config = Config::from_file(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.bot.id);

	match args.command {
		Command::Synthesize { districts } => run_synthesis(config, &districts).await,
		Command::Balances { address } => run_balances(config, address).await,
	}
}

/// Runs the synthesis batch for every district in the roster.
///
/// Startup is fail-fast: chain id and sender balance are checked before
/// the first district so a misconfigured run burns no gas.
async fn run_synthesis(config: Config, roster: &Path) -> Result<(), Box<dyn std::error::Error>> {
	let account = LocalAccount::new(&config.wallet.private_key, config.network.chain_id)?;
	tracing::info!(sender = %account.address(), "Using sender address");

	let delivery = Arc::new(DeliveryService::new(
		Box::new(AlloyDelivery::connect(&config.network)?),
		config.receipt.clone(),
	));
	delivery.verify_chain(config.network.chain_id).await?;
	tracing::info!(
		rpc_url = %config.network.rpc_url,
		chain_id = config.network.chain_id,
		"Connected to chain endpoint"
	);

	let balance = delivery.get_balance(account.address()).await?;
	if balance.is_zero() {
		return Err("sender has no POL to cover gas".into());
	}
	let balance_pol = wei_to_pol(u128::try_from(balance).unwrap_or(u128::MAX));
	tracing::info!(balance_pol, "Sender balance");

	let network_gas_price = delivery.get_gas_price().await?;
	tracing::info!(
		gas_price_gwei = network_gas_price as f64 / 1e9,
		"Current network gas price"
	);

	let records = load_districts(roster).await?;
	if records.is_empty() {
		tracing::warn!(roster = %roster.display(), "Roster has no districts; nothing to do");
		return Ok(());
	}

	let profile = config
		.synthesis
		.active_profile()
		.cloned()
		.ok_or_else(|| format!("Unknown call profile '{}'", config.synthesis.profile))?;
	let builder = SynthesisBuilder::new(&config.network, profile)?;
	let notifier = Arc::new(Notifier::new(config.telegram.clone()));
	let runner = SynthesisRunner::new(
		account,
		delivery,
		builder,
		notifier,
		config.synthesis.clone(),
	);

	let summary = runner.run(&records).await;
	println!("{}", summary.render());

	Ok(())
}

/// Prints the wallet balance report and forwards it to the notifier.
async fn run_balances(
	config: Config,
	address: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
	// Explicit flag first, then the configured report address, then the
	// address derived from the signing key.
	let wallet_address = match address.or_else(|| config.wallet.report_address().map(String::from))
	{
		Some(address) => address,
		None => {
			let account = LocalAccount::new(&config.wallet.private_key, config.network.chain_id)?;
			account.address().to_string()
		},
	};
	tracing::info!(wallet = %wallet_address, "Reporting balances");

	let reporter = BalanceReporter::new(config.explorer.clone(), config.network.chain_id);
	let report = reporter.report(&wallet_address).await?;
	println!("{}", report);

	Notifier::new(config.telegram.clone()).send(&report).await;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn synthesize_args_have_roster_default() {
		let args = Args::try_parse_from(["corenet", "synthesize"]).unwrap();
		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
		match args.command {
			Command::Synthesize { districts } => {
				assert_eq!(districts, PathBuf::from("transaction_data.json"));
			},
			other => panic!("expected synthesize, got {:?}", other),
		}
	}

	#[test]
	fn balances_args_accept_an_address_override() {
		let args = Args::try_parse_from([
			"corenet",
			"--config",
			"custom.toml",
			"--log-level",
			"debug",
			"balances",
			"--address",
			"0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
		])
		.unwrap();

		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
		match args.command {
			Command::Balances { address } => {
				assert_eq!(
					address.as_deref(),
					Some("0x742d35Cc6634C0532925a3b844Bc454e4438f44e")
				);
			},
			other => panic!("expected balances, got {:?}", other),
		}
	}

	#[test]
	fn missing_subcommand_is_an_error() {
		assert!(Args::try_parse_from(["corenet"]).is_err());
	}

	#[tokio::test]
	async fn loads_a_config_file_from_disk() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		let contents = r#"
[bot]
id = "corenet-test"

[wallet]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"

[synthesis]
profile = "emit_event_with_transfers"
simulate = true
"#;
		std::fs::write(&path, contents).unwrap();

		let config = Config::from_file(&path).await.unwrap();
		assert_eq!(config.bot.id, "corenet-test");
		assert_eq!(config.network.chain_id, 137);
		assert!(config.synthesis.simulate);
		assert!(config
			.synthesis
			.profiles
			.contains_key("emit_event_with_transfers"));
	}
}

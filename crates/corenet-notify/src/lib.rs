//! Best-effort operator notifications over the Telegram Bot API.
//!
//! Every send is fire-and-forget: missing credentials turn the notifier
//! into a logged no-op, and delivery failures are logged and swallowed so
//! they can never affect the batch outcome.

use corenet_config::TelegramConfig;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram notifier bound to one bot token and chat.
pub struct Notifier {
	config: TelegramConfig,
	client: reqwest::Client,
}

impl Notifier {
	pub fn new(config: TelegramConfig) -> Self {
		Self {
			config,
			client: reqwest::Client::new(),
		}
	}

	/// Whether both the bot token and the chat id are present.
	pub fn is_configured(&self) -> bool {
		!self.config.bot_token.is_empty() && !self.config.chat_id.is_empty()
	}

	/// Sends a message to the configured chat.
	///
	/// Never returns an error: the caller's control flow must not depend on
	/// notification delivery.
	pub async fn send(&self, text: &str) {
		if !self.is_configured() {
			tracing::info!("Telegram credentials not configured, skipping notification");
			return;
		}

		let url = format!(
			"{}/bot{}/sendMessage",
			TELEGRAM_API_BASE,
			self.config.bot_token.expose()
		);
		let params = [("chat_id", self.config.chat_id.as_str()), ("text", text)];

		match self.client.post(&url).form(&params).send().await {
			Ok(response) if response.status().is_success() => {
				tracing::debug!("Telegram notification delivered");
			},
			Ok(response) => {
				tracing::warn!(
					status = %response.status(),
					"Telegram API rejected the notification"
				);
			},
			Err(e) => {
				tracing::warn!(error = %e, "Failed to send Telegram notification");
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unconfigured_without_credentials() {
		let notifier = Notifier::new(TelegramConfig::default());
		assert!(!notifier.is_configured());

		let partial = TelegramConfig {
			bot_token: "123456:token".into(),
			chat_id: String::new(),
		};
		assert!(!Notifier::new(partial).is_configured());
	}

	#[test]
	fn configured_with_both_credentials() {
		let config = TelegramConfig {
			bot_token: "123456:token".into(),
			chat_id: "99887766".to_string(),
		};
		assert!(Notifier::new(config).is_configured());
	}

	#[tokio::test]
	async fn send_without_credentials_is_a_no_op() {
		let notifier = Notifier::new(TelegramConfig::default());
		// Must return without attempting any network traffic.
		notifier.send("batch summary").await;
	}
}

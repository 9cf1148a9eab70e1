//! Unit conversion helpers for the native token and gas prices.

/// Wei per whole POL.
const WEI_PER_POL: f64 = 1e18;

/// Wei per gwei.
const WEI_PER_GWEI: f64 = 1e9;

/// Converts a whole-POL amount to wei, truncating fractional wei.
///
/// Roster amounts arrive as JSON numbers, so the conversion goes through
/// f64 like the input does.
pub fn pol_to_wei(amount: f64) -> u128 {
	(amount * WEI_PER_POL) as u128
}

/// Converts wei to a whole-POL display amount.
pub fn wei_to_pol(wei: u128) -> f64 {
	wei as f64 / WEI_PER_POL
}

/// Converts a gwei gas price to wei, rounding away float dust.
pub fn gwei_to_wei(gwei: f64) -> u128 {
	(gwei * WEI_PER_GWEI).round() as u128
}

/// Shape check for a hex wallet address: `0x` prefix and 42 characters.
pub fn is_wallet_address(address: &str) -> bool {
	address.starts_with("0x") && address.len() == 42
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pol_conversion_truncates_to_minor_units() {
		assert_eq!(pol_to_wei(0.01), 10_000_000_000_000_000);
		assert_eq!(pol_to_wei(1.5), 1_500_000_000_000_000_000);
		assert_eq!(pol_to_wei(0.0), 0);
	}

	#[test]
	fn wei_round_trips_for_display() {
		assert_eq!(wei_to_pol(1_500_000_000_000_000_000), 1.5);
	}

	#[test]
	fn gas_prices_convert_exactly() {
		assert_eq!(gwei_to_wei(100.0), 100_000_000_000);
		assert_eq!(gwei_to_wei(612.94176276), 612_941_762_760);
		assert_eq!(gwei_to_wei(50.126386178), 50_126_386_178);
	}

	#[test]
	fn wallet_address_shape() {
		assert!(is_wallet_address("0x742d35Cc6634C0532925a3b844Bc454e4438f44e"));
		assert!(!is_wallet_address("742d35Cc6634C0532925a3b844Bc454e4438f44e"));
		assert!(!is_wallet_address("0x742d35Cc"));
		assert!(!is_wallet_address(""));
	}
}

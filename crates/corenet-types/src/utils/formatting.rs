//! String formatting helpers for reports and log lines.

/// Formats a numeric value with apostrophe thousands grouping.
///
/// `decimals` controls the fractional digits: the value is rounded to that
/// many places and right-padded with zeros, so `format_number(1234.5, 2)`
/// yields `1'234.50`. With zero decimals the value is truncated to an
/// integer.
pub fn format_number(value: f64, decimals: usize) -> String {
	let formatted = if decimals > 0 {
		format!("{value:.decimals$}")
	} else {
		format!("{}", value.trunc() as i128)
	};
	let (number, fraction) = match formatted.split_once('.') {
		Some((int_part, frac_part)) => (int_part.to_string(), Some(frac_part.to_string())),
		None => (formatted, None),
	};
	let (sign, digits) = match number.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", number.as_str()),
	};
	let grouped = group_digits(digits);
	match fraction {
		Some(frac_part) => format!("{sign}{grouped}.{frac_part}"),
		None => format!("{sign}{grouped}"),
	}
}

/// Inserts an apostrophe every three digits, counting from the right.
fn group_digits(digits: &str) -> String {
	let bytes = digits.as_bytes();
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, byte) in bytes.iter().enumerate() {
		if i > 0 && (bytes.len() - i) % 3 == 0 {
			grouped.push('\'');
		}
		grouped.push(*byte as char);
	}
	grouped
}

/// Shortens a hash or id for log lines, keeping a recognizable prefix.
///
/// Cuts on a character boundary: district labels come straight from the
/// roster and are not limited to ASCII.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(12) {
		Some((boundary, _)) => format!("{}..", &id[..boundary]),
		None => id.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn groups_integers_with_apostrophes() {
		assert_eq!(format_number(1_234_567.0, 0), "1'234'567");
		assert_eq!(format_number(1_000.0, 0), "1'000");
		assert_eq!(format_number(999.0, 0), "999");
		assert_eq!(format_number(0.0, 0), "0");
	}

	#[test]
	fn pads_fractional_digits() {
		assert_eq!(format_number(1234.5, 2), "1'234.50");
		assert_eq!(format_number(0.1234, 3), "0.123");
	}

	#[test]
	fn zero_decimals_truncates() {
		assert_eq!(format_number(1234.9, 0), "1'234");
	}

	#[test]
	fn negative_values_keep_the_sign_out_of_grouping() {
		assert_eq!(format_number(-1_234_567.0, 0), "-1'234'567");
		assert_eq!(format_number(-1234.5, 2), "-1'234.50");
	}

	#[test]
	fn truncates_long_ids() {
		let hash = "0x29a503c18df2a7b23bd8556a0b9728ce48ed36dcac09124c3b8d5a69e09cf457";
		assert_eq!(truncate_id(hash), "0x29a503c18d..");
		assert_eq!(truncate_id("short"), "short");
	}

	#[test]
	fn truncates_multibyte_ids_on_char_boundaries() {
		// 12 chars but 13 bytes; byte 12 falls inside the final char.
		assert_eq!(truncate_id("01234567890é"), "01234567890é");
		assert_eq!(truncate_id("01234567890é7"), "01234567890é..");
		assert_eq!(truncate_id("ééééééééééééé"), "éééééééééééé..");
	}
}

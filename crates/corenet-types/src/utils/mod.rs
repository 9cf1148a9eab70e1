//! Formatting and unit-conversion helpers used across the workspace.

pub mod conversion;
pub mod formatting;

pub use conversion::{gwei_to_wei, is_wallet_address, pol_to_wei, wei_to_pol};
pub use formatting::{format_number, truncate_id};

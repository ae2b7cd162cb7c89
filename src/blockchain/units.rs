//! Fixed-precision display of wei amounts.

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;

/// Wei to ether with 4 decimals, truncated.
pub fn format_ether(wei: U256) -> String {
    format_truncated(wei, "ether", 4)
}

/// Wei to gwei with 2 decimals, truncated.
pub fn format_gwei(wei: u128) -> String {
    format_truncated(U256::from(wei), "gwei", 2)
}

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Gwei to wei.
pub fn gwei_to_wei(gwei: u64) -> u128 {
    u128::from(gwei) * WEI_PER_GWEI
}

fn format_truncated(value: U256, unit: &str, precision: usize) -> String {
    match format_units(value, unit) {
        Ok(formatted) => truncate_fraction(&formatted, precision),
        Err(e) => {
            tracing::warn!(unit, error = %e, "Failed to format amount");
            value.to_string()
        }
    }
}

/// Cut the fractional part to `precision` digits, padding with zeros.
fn truncate_fraction(formatted: &str, precision: usize) -> String {
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted, ""));
    if precision == 0 {
        return whole.to_string();
    }
    let fraction: String = fraction
        .chars()
        .chain(std::iter::repeat('0'))
        .take(precision)
        .collect();
    format!("{whole}.{fraction}")
}

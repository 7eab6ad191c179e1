//! Environment-backed settings.

use std::{env, str::FromStr};

use bazaar::pricing::PricingPolicy;
use rust_decimal::Decimal;
use thiserror::Error;

const TAX_RATE_VAR: &str = "TAX_RATE";
const FREE_SHIPPING_THRESHOLD_VAR: &str = "FREE_SHIPPING_THRESHOLD";
const FLAT_SHIPPING_FEE_VAR: &str = "FLAT_SHIPPING_FEE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid decimal in {key}: {value}")]
    InvalidDecimal { key: &'static str, value: String },
}

/// Builds the checkout pricing policy from the process environment.
///
/// Each field falls back to the policy default when its variable is unset;
/// set variables override independently.
///
/// # Errors
///
/// Returns an error when a set variable does not parse as a decimal.
pub fn pricing_policy_from_env() -> Result<PricingPolicy, ConfigError> {
    pricing_policy_from(|key| env::var(key).ok())
}

fn pricing_policy_from(
    var: impl Fn(&'static str) -> Option<String>,
) -> Result<PricingPolicy, ConfigError> {
    let mut policy = PricingPolicy::default();

    if let Some(tax_rate) = read_decimal(&var, TAX_RATE_VAR)? {
        policy.tax_rate = tax_rate;
    }

    if let Some(threshold) = read_decimal(&var, FREE_SHIPPING_THRESHOLD_VAR)? {
        policy.free_shipping_threshold = threshold;
    }

    if let Some(fee) = read_decimal(&var, FLAT_SHIPPING_FEE_VAR)? {
        policy.flat_shipping_fee = fee;
    }

    Ok(policy)
}

fn read_decimal(
    var: &impl Fn(&'static str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Decimal>, ConfigError> {
    let Some(value) = var(key) else {
        return Ok(None);
    };

    Decimal::from_str(value.trim())
        .map(Some)
        .map_err(|_| ConfigError::InvalidDecimal { key, value })
}

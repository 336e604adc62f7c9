//! Amount and asset types
//!
//! Amount values are unsigned integers in the asset's minor unit
//! (`value / 10^assetScale` major units). On the wire the value travels as a
//! decimal string so large integers survive JSON intact.

use super::error::QuoteError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Currency/unit definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Asset identifier
    pub id: Uuid,
    /// Currency code, e.g. `USD`
    pub code: String,
    /// Number of decimal places of the minor unit
    pub scale: u8,
}

impl Asset {
    /// Create an asset with a fresh id
    pub fn new(code: impl Into<String>, scale: u8) -> Self {
        Asset {
            id: Uuid::new_v4(),
            code: code.into(),
            scale,
        }
    }

    /// `CODE/scale` label used in error context
    pub fn label(&self) -> String {
        format!("{}/{}", self.code, self.scale)
    }
}

/// A value in some asset's minor unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amount {
    /// Value in minor units
    #[serde(with = "decimal_string")]
    pub value: u128,
    /// Currency code of the asset
    pub asset_code: String,
    /// Scale of the asset
    pub asset_scale: u8,
}

impl Amount {
    /// Create an amount
    pub fn new(value: u128, asset_code: impl Into<String>, asset_scale: u8) -> Self {
        Amount {
            value,
            asset_code: asset_code.into(),
            asset_scale,
        }
    }

    /// Create an amount denominated in `asset`
    pub fn of(value: u128, asset: &Asset) -> Self {
        Amount::new(value, asset.code.clone(), asset.scale)
    }

    /// Whether the amount's code and scale match `asset`
    pub fn is_in(&self, asset: &Asset) -> bool {
        self.asset_code == asset.code && self.asset_scale == asset.scale
    }

    /// Whether two amounts share code and scale
    pub fn is_comparable(&self, other: &Amount) -> bool {
        self.asset_code == other.asset_code && self.asset_scale == other.asset_scale
    }

    /// `CODE/scale` label used in error context
    pub fn label(&self) -> String {
        format!("{}/{}", self.asset_code, self.asset_scale)
    }

    /// Subtract a comparable amount, `None` on underflow or asset mismatch
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        if !self.is_comparable(other) {
            return None;
        }
        self.value.checked_sub(other.value).map(|value| Amount {
            value,
            asset_code: self.asset_code.clone(),
            asset_scale: self.asset_scale,
        })
    }
}

/// Check that `amount` is denominated in `asset`
///
/// Only code and scale are compared; the numeric value is not inspected.
pub fn validate_amount(amount: &Amount, asset: &Asset) -> Result<(), QuoteError> {
    if amount.is_in(asset) {
        Ok(())
    } else {
        Err(QuoteError::invalid_amount(asset.label(), amount.label()))
    }
}

/// Parse a decimal integer string into an amount value
///
/// Only ASCII digits are accepted: no sign, whitespace, or fraction.
pub fn parse_amount_value(raw: &str) -> Result<u128, String> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("amount value '{}' is not a decimal integer", raw));
    }
    raw.parse::<u128>()
        .map_err(|_| format!("amount value '{}' is out of range", raw))
}

/// Serde adapter encoding `u128` as a decimal string
pub mod decimal_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_amount_value(&raw).map_err(D::Error::custom)
    }
}

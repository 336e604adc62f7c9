//! Static exchange-rate table
//!
//! A rate `r` for `FROM -> TO` means one major unit of `FROM` buys `r` major
//! units of `TO`. Conversions rescale between the two asset scales, round
//! the delivered side down and the sent side up, so a quote never promises
//! more than the rate allows.

use crate::core::traits::RateProbe;
use crate::types::{Amount, Asset, RateError};
use async_trait::async_trait;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Rounding applied to a converted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rounding {
    Down,
    Up,
}

/// Rate probe backed by a fixed table of rates
#[derive(Debug, Clone, Default)]
pub struct FixedRateProbe {
    /// Rates keyed by `(from, to)` asset code
    rates: HashMap<(String, String), Decimal>,
}

impl FixedRateProbe {
    /// Create a probe with no rates; only same-code conversions succeed
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rate for `from -> to`
    ///
    /// The reverse direction uses the inverse unless set explicitly.
    pub fn set_rate(&mut self, from: &str, to: &str, rate: Decimal) {
        self.rates.insert((from.to_string(), to.to_string()), rate);
    }

    /// Rate for `from -> to`, falling back to the inverse of `to -> from`
    pub fn rate(&self, from: &str, to: &str) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }
        if let Some(rate) = self.rates.get(&(from.to_string(), to.to_string())) {
            return Some(*rate);
        }
        self.rates
            .get(&(to.to_string(), from.to_string()))
            .filter(|rate| !rate.is_zero())
            .and_then(|rate| Decimal::ONE.checked_div(*rate))
    }

    fn convert(&self, amount: &Amount, target: &Asset, rounding: Rounding) -> Result<Amount, RateError> {
        let overflow = || RateError::Overflow {
            value: amount.value,
            from: amount.asset_code.clone(),
            to: target.code.clone(),
        };
        let rate = self
            .rate(&amount.asset_code, &target.code)
            .ok_or_else(|| RateError::UnsupportedPair {
                from: amount.asset_code.clone(),
                to: target.code.clone(),
            })?;

        let mut value = Decimal::from_u128(amount.value)
            .ok_or_else(overflow)?
            .checked_mul(rate)
            .ok_or_else(overflow)?;

        // Rescale minor units: multiply by 10^(target - source)
        if target.scale >= amount.asset_scale {
            for _ in 0..(target.scale - amount.asset_scale) {
                value = value.checked_mul(Decimal::TEN).ok_or_else(overflow)?;
            }
        } else {
            for _ in 0..(amount.asset_scale - target.scale) {
                value = value.checked_div(Decimal::TEN).ok_or_else(overflow)?;
            }
        }

        let rounded = match rounding {
            Rounding::Down => value.floor(),
            Rounding::Up => value.ceil(),
        };
        let value = rounded.to_u128().ok_or_else(overflow)?;
        Ok(Amount::of(value, target))
    }
}

#[async_trait]
impl RateProbe for FixedRateProbe {
    async fn receive_for_debit(
        &self,
        debit: &Amount,
        receive_asset: &Asset,
    ) -> Result<Amount, RateError> {
        self.convert(debit, receive_asset, Rounding::Down)
    }

    async fn debit_for_receive(
        &self,
        receive: &Amount,
        debit_asset: &Asset,
    ) -> Result<Amount, RateError> {
        // Convert backwards along the debit -> receive rate
        let rate = self
            .rate(&debit_asset.code, &receive.asset_code)
            .ok_or_else(|| RateError::UnsupportedPair {
                from: debit_asset.code.clone(),
                to: receive.asset_code.clone(),
            })?;
        if rate.is_zero() {
            return Err(RateError::UnsupportedPair {
                from: debit_asset.code.clone(),
                to: receive.asset_code.clone(),
            });
        }
        let mut inverse = FixedRateProbe::new();
        let inverse_rate = Decimal::ONE
            .checked_div(rate)
            .ok_or_else(|| RateError::Overflow {
                value: receive.value,
                from: receive.asset_code.clone(),
                to: debit_asset.code.clone(),
            })?;
        inverse.set_rate(&receive.asset_code, &debit_asset.code, inverse_rate);
        inverse.convert(receive, debit_asset, Rounding::Up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn probe() -> FixedRateProbe {
        let mut probe = FixedRateProbe::new();
        probe.set_rate("USD", "EUR", Decimal::new(5, 1));
        probe.set_rate("USD", "XRP", Decimal::new(2, 0));
        probe
    }

    #[rstest]
    #[case::same_code(Amount::new(123, "USD", 2), Asset::new("USD", 2), 123)]
    #[case::half_rate(Amount::new(1000, "USD", 2), Asset::new("EUR", 2), 500)]
    #[case::round_down(Amount::new(3, "USD", 2), Asset::new("EUR", 2), 1)]
    #[case::inverse(Amount::new(500, "EUR", 2), Asset::new("USD", 2), 1000)]
    #[case::scale_up(Amount::new(150, "USD", 2), Asset::new("XRP", 6), 3_000_000)]
    #[case::scale_down(Amount::new(3_000_001, "XRP", 6), Asset::new("USD", 2), 150)]
    #[tokio::test]
    async fn test_receive_for_debit(
        #[case] debit: Amount,
        #[case] target: Asset,
        #[case] expected: u128,
    ) {
        let amount = probe().receive_for_debit(&debit, &target).await.unwrap();
        assert_eq!(amount, Amount::of(expected, &target));
    }

    #[rstest]
    #[case::half_rate(Amount::new(56, "EUR", 2), Asset::new("USD", 2), 112)]
    #[case::round_up(Amount::new(3, "XRP", 6), Asset::new("USD", 2), 1)]
    #[case::same_code(Amount::new(77, "USD", 2), Asset::new("USD", 2), 77)]
    #[tokio::test]
    async fn test_debit_for_receive(
        #[case] receive: Amount,
        #[case] debit_asset: Asset,
        #[case] expected: u128,
    ) {
        let amount = probe()
            .debit_for_receive(&receive, &debit_asset)
            .await
            .unwrap();
        assert_eq!(amount, Amount::of(expected, &debit_asset));
    }

    #[tokio::test]
    async fn test_unsupported_pair() {
        let result = probe()
            .receive_for_debit(&Amount::new(1, "USD", 2), &Asset::new("JPY", 0))
            .await;
        assert_eq!(
            result,
            Err(RateError::UnsupportedPair {
                from: "USD".to_string(),
                to: "JPY".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_overflow() {
        let result = probe()
            .receive_for_debit(&Amount::new(u128::MAX, "USD", 2), &Asset::new("XRP", 6))
            .await;
        assert!(matches!(result, Err(RateError::Overflow { .. })));
    }
}

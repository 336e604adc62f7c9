//! Rate step implementations
//!
//! [`FixedRateProbe`] converts amounts with a static table of exchange
//! rates. It stands in for a real probing client behind the
//! [`RateProbe`](crate::core::traits::RateProbe) trait.

mod fixed;

pub use fixed::FixedRateProbe;

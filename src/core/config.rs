//! Service configuration
//!
//! Policy values injected into the quote and payment services at
//! construction. Zero values are rejected in favour of the defaults.

use std::time::Duration;

/// Default quote lifetime (5 minutes)
pub const DEFAULT_QUOTE_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Default timeout for one rate/probe call
pub const DEFAULT_RATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default page size when neither `first` nor `last` is given
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound for `first`/`last`
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Configuration shared by the quote and combined payment services
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Offset between a quote's creation and its expiry
    pub quote_lifetime: Duration,
    /// Bound on each rate/probe call
    pub rate_timeout: Duration,
    /// Page size used when the caller gives none
    pub default_page_size: usize,
    /// Largest page a caller may request
    pub max_page_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            quote_lifetime: DEFAULT_QUOTE_LIFETIME,
            rate_timeout: DEFAULT_RATE_TIMEOUT,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl ServiceConfig {
    /// Create a ServiceConfig, falling back to defaults for zero values
    ///
    /// `default_page_size` is clamped to `max_page_size`.
    pub fn new(
        quote_lifetime: Duration,
        rate_timeout: Duration,
        default_page_size: usize,
        max_page_size: usize,
    ) -> Self {
        let default = Self::default();

        let quote_lifetime = if quote_lifetime.is_zero() {
            tracing::warn!(
                "Invalid quote_lifetime ({:?}), using default ({:?})",
                quote_lifetime,
                default.quote_lifetime
            );
            default.quote_lifetime
        } else {
            quote_lifetime
        };

        let rate_timeout = if rate_timeout.is_zero() {
            tracing::warn!(
                "Invalid rate_timeout ({:?}), using default ({:?})",
                rate_timeout,
                default.rate_timeout
            );
            default.rate_timeout
        } else {
            rate_timeout
        };

        let max_page_size = if max_page_size == 0 {
            tracing::warn!(
                "Invalid max_page_size ({}), using default ({})",
                max_page_size,
                default.max_page_size
            );
            default.max_page_size
        } else {
            max_page_size
        };

        let default_page_size = if default_page_size == 0 {
            tracing::warn!(
                "Invalid default_page_size ({}), using default ({})",
                default_page_size,
                default.default_page_size
            );
            default.default_page_size.min(max_page_size)
        } else {
            default_page_size.min(max_page_size)
        };

        Self {
            quote_lifetime,
            rate_timeout,
            default_page_size,
            max_page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::all_valid(Duration::from_secs(60), Duration::from_millis(500), 10, 50, (Duration::from_secs(60), Duration::from_millis(500), 10, 50))]
    #[case::zero_lifetime(Duration::ZERO, Duration::from_millis(500), 10, 50, (DEFAULT_QUOTE_LIFETIME, Duration::from_millis(500), 10, 50))]
    #[case::zero_timeout(Duration::from_secs(60), Duration::ZERO, 10, 50, (Duration::from_secs(60), DEFAULT_RATE_TIMEOUT, 10, 50))]
    #[case::zero_page_sizes(Duration::from_secs(60), Duration::from_secs(1), 0, 0, (Duration::from_secs(60), Duration::from_secs(1), DEFAULT_PAGE_SIZE, DEFAULT_MAX_PAGE_SIZE))]
    #[case::default_clamped(Duration::from_secs(60), Duration::from_secs(1), 80, 30, (Duration::from_secs(60), Duration::from_secs(1), 30, 30))]
    fn test_service_config_new(
        #[case] lifetime: Duration,
        #[case] timeout: Duration,
        #[case] page_size: usize,
        #[case] max_page_size: usize,
        #[case] expected: (Duration, Duration, usize, usize),
    ) {
        let config = ServiceConfig::new(lifetime, timeout, page_size, max_page_size);
        assert_eq!(
            (
                config.quote_lifetime,
                config.rate_timeout,
                config.default_page_size,
                config.max_page_size
            ),
            expected
        );
    }
}

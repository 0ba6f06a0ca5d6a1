use std::str::FromStr;
use std::time::Duration;

use medchain_core::monitoring::MonitorThresholds;

/// Default interval between scheduled monitoring runs: 5 minutes.
pub const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Monitor configuration loaded from environment variables.
///
/// All fields have defaults matching the stock rules, so an empty
/// environment yields a working configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Whether the API server spawns the scheduler in-process.
    pub enabled: bool,
    /// Time between scheduled runs.
    pub interval: Duration,
    /// Limits used by the classification rules.
    pub thresholds: MonitorThresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            thresholds: MonitorThresholds::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `MONITOR_ENABLED`          | `true`  |
    /// | `MONITOR_INTERVAL_SECS`    | `300`   |
    /// | `LOW_STOCK_THRESHOLD`      | `50`    |
    /// | `CRITICAL_STOCK_THRESHOLD` | `10`    |
    /// | `EXPIRY_WARNING_DAYS`      | `30`    |
    /// | `URGENT_EXPIRY_DAYS`       | `7`     |
    /// | `MIN_REORDER_QUANTITY`     | `500`   |
    /// | `REORDER_MULTIPLIER`       | `10`    |
    /// | `REORDER_LEAD_DAYS`        | `7`     |
    ///
    /// Panics at startup on unparseable values, on thresholds rejected by
    /// [`MonitorThresholds::validate`], and on a zero interval;
    /// misconfiguration should fail fast.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = MonitorThresholds::default();

        let thresholds = MonitorThresholds {
            low_stock: parse_or(&lookup, "LOW_STOCK_THRESHOLD", defaults.low_stock),
            critical_stock: parse_or(&lookup, "CRITICAL_STOCK_THRESHOLD", defaults.critical_stock),
            expiry_warning_days: parse_or(
                &lookup,
                "EXPIRY_WARNING_DAYS",
                defaults.expiry_warning_days,
            ),
            urgent_expiry_days: parse_or(&lookup, "URGENT_EXPIRY_DAYS", defaults.urgent_expiry_days),
            min_reorder_quantity: parse_or(
                &lookup,
                "MIN_REORDER_QUANTITY",
                defaults.min_reorder_quantity,
            ),
            reorder_multiplier: parse_or(&lookup, "REORDER_MULTIPLIER", defaults.reorder_multiplier),
            reorder_lead_days: parse_or(&lookup, "REORDER_LEAD_DAYS", defaults.reorder_lead_days),
        };

        if let Err(e) = thresholds.validate() {
            panic!("invalid monitor thresholds: {e}");
        }

        let interval_secs: u64 = parse_or(&lookup, "MONITOR_INTERVAL_SECS", DEFAULT_INTERVAL_SECS);
        assert!(interval_secs > 0, "MONITOR_INTERVAL_SECS must be greater than zero");

        Self {
            enabled: parse_or(&lookup, "MONITOR_ENABLED", true),
            interval: Duration::from_secs(interval_secs),
            thresholds,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid {}", std::any::type_name::<T>())),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(MonitorConfig::from_lookup(lookup(&[])), MonitorConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = MonitorConfig::from_lookup(lookup(&[
            ("MONITOR_ENABLED", "false"),
            ("MONITOR_INTERVAL_SECS", "60"),
            ("LOW_STOCK_THRESHOLD", "100"),
            ("REORDER_LEAD_DAYS", " 14 "),
        ]));
        assert!(!config.enabled);
        assert_eq!(config.interval, Duration::from_secs(60));
        assert_eq!(config.thresholds.low_stock, 100);
        assert_eq!(config.thresholds.reorder_lead_days, 14);
        assert_eq!(config.thresholds.critical_stock, 10);
    }

    #[test]
    #[should_panic(expected = "LOW_STOCK_THRESHOLD must be a valid")]
    fn garbage_values_fail_fast() {
        MonitorConfig::from_lookup(lookup(&[("LOW_STOCK_THRESHOLD", "lots")]));
    }

    #[test]
    #[should_panic(expected = "reorder_lead_days must be between")]
    fn huge_lead_time_fails_fast() {
        MonitorConfig::from_lookup(lookup(&[("REORDER_LEAD_DAYS", "9223372036854775807")]));
    }

    #[test]
    #[should_panic(expected = "min_reorder_quantity must be at least 1")]
    fn zero_reorder_quantity_fails_fast() {
        MonitorConfig::from_lookup(lookup(&[
            ("MIN_REORDER_QUANTITY", "0"),
            ("REORDER_MULTIPLIER", "0"),
        ]));
    }

    #[test]
    #[should_panic(expected = "critical_stock must be between 0 and low_stock")]
    fn critical_above_low_fails_fast() {
        MonitorConfig::from_lookup(lookup(&[("CRITICAL_STOCK_THRESHOLD", "80")]));
    }

    #[test]
    #[should_panic(expected = "MONITOR_INTERVAL_SECS must be greater than zero")]
    fn zero_interval_fails_fast() {
        MonitorConfig::from_lookup(lookup(&[("MONITOR_INTERVAL_SECS", "0")]));
    }
}

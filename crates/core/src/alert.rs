//! Saved-search alert cadence rules.
//!
//! A saved search may opt into alerts with a frequency; the scheduler in
//! `xpshare-alerts` re-executes due searches and stamps a last-sent
//! timestamp. The rules for "may this configuration exist" and "is this
//! search due" live here so the API layer and the scheduler cannot drift.

use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// How often an alert-enabled saved search is re-executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertFrequency {
    /// Due on every scheduler sweep.
    Immediate,
    Daily,
    Weekly,
}

impl AlertFrequency {
    /// The database column value for this frequency.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertFrequency::Immediate => "immediate",
            AlertFrequency::Daily => "daily",
            AlertFrequency::Weekly => "weekly",
        }
    }

    /// Minimum gap between two alerts, or `None` for no gap.
    pub fn interval(&self) -> Option<Duration> {
        match self {
            AlertFrequency::Immediate => None,
            AlertFrequency::Daily => Some(Duration::hours(24)),
            AlertFrequency::Weekly => Some(Duration::days(7)),
        }
    }
}

impl FromStr for AlertFrequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "immediate" => Ok(AlertFrequency::Immediate),
            "daily" => Ok(AlertFrequency::Daily),
            "weekly" => Ok(AlertFrequency::Weekly),
            other => Err(CoreError::Validation(format!(
                "unknown alert frequency '{other}'"
            ))),
        }
    }
}

/// Check the alert invariant: an enabled alert must carry a frequency.
///
/// The converse is deliberately not enforced -- a disabled saved search
/// keeps its last frequency so re-enabling restores the previous cadence;
/// the value is simply ignored while disabled.
pub fn validate_alert_config(
    enabled: bool,
    frequency: Option<AlertFrequency>,
) -> Result<(), CoreError> {
    if enabled && frequency.is_none() {
        return Err(CoreError::Validation(
            "alert_frequency is required when alerts are enabled".to_string(),
        ));
    }
    Ok(())
}

/// Whether an alert is due at `now` given its frequency and last send.
///
/// A never-sent alert is always due.
pub fn is_due(frequency: AlertFrequency, last_sent: Option<Timestamp>, now: Timestamp) -> bool {
    match (frequency.interval(), last_sent) {
        (_, None) => true,
        (None, Some(_)) => true,
        (Some(gap), Some(last)) => now - last >= gap,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn ts(day: u32, hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn enabled_without_frequency_is_invalid() {
        assert_matches!(
            validate_alert_config(true, None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn disabled_with_stale_frequency_is_fine() {
        assert!(validate_alert_config(false, Some(AlertFrequency::Daily)).is_ok());
        assert!(validate_alert_config(false, None).is_ok());
        assert!(validate_alert_config(true, Some(AlertFrequency::Weekly)).is_ok());
    }

    #[test]
    fn never_sent_is_always_due() {
        for f in [
            AlertFrequency::Immediate,
            AlertFrequency::Daily,
            AlertFrequency::Weekly,
        ] {
            assert!(is_due(f, None, ts(1, 0)));
        }
    }

    #[test]
    fn immediate_is_due_every_sweep() {
        assert!(is_due(AlertFrequency::Immediate, Some(ts(1, 0)), ts(1, 0)));
    }

    #[test]
    fn daily_waits_a_full_day() {
        let last = ts(1, 8);
        assert!(!is_due(AlertFrequency::Daily, Some(last), ts(1, 20)));
        assert!(is_due(AlertFrequency::Daily, Some(last), ts(2, 8)));
    }

    #[test]
    fn weekly_waits_seven_days() {
        let last = ts(1, 0);
        assert!(!is_due(AlertFrequency::Weekly, Some(last), ts(6, 0)));
        assert!(is_due(AlertFrequency::Weekly, Some(last), ts(8, 0)));
    }

    #[test]
    fn frequency_round_trips_through_strings() {
        for f in [
            AlertFrequency::Immediate,
            AlertFrequency::Daily,
            AlertFrequency::Weekly,
        ] {
            assert_eq!(f.as_str().parse::<AlertFrequency>().unwrap(), f);
        }
        assert_matches!(
            "hourly".parse::<AlertFrequency>(),
            Err(CoreError::Validation(_))
        );
    }
}

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::domain::inclusive_days;
use crate::config::RuleConfig;

pub const DEFAULT_MAX_STAY_DAYS: u32 = 90;
pub const DEFAULT_WINDOW_DAYS: u32 = 180;
pub const DEFAULT_AT_RISK_THRESHOLD: u32 = 10;
/// Longest trip, and longest span between the first entry and last exit of a
/// history, accepted for evaluation.
pub const MAX_HISTORY_DAYS: u32 = 20 * 366;

/// Allowance dials for the rolling-window rule (90 days in any 180 by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulePolicy {
    max_stay_days: u32,
    window_days: u32,
    at_risk_threshold: u32,
    strict_countries: bool,
}

impl RulePolicy {
    pub fn new(max_stay_days: u32, window_days: u32) -> Self {
        let window_days = if window_days == 0 {
            DEFAULT_WINDOW_DAYS
        } else {
            window_days
        };
        let max_stay_days = if max_stay_days == 0 {
            DEFAULT_MAX_STAY_DAYS.min(window_days)
        } else {
            max_stay_days.min(window_days)
        };

        Self {
            max_stay_days,
            window_days,
            at_risk_threshold: DEFAULT_AT_RISK_THRESHOLD,
            strict_countries: false,
        }
    }

    pub fn with_at_risk_threshold(mut self, days: u32) -> Self {
        self.at_risk_threshold = days.min(self.max_stay_days);
        self
    }

    /// Reject trips whose country is not a Schengen member instead of excluding them.
    pub fn with_strict_countries(mut self, strict: bool) -> Self {
        self.strict_countries = strict;
        self
    }

    pub fn max_stay_days(&self) -> u32 {
        self.max_stay_days
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    pub fn at_risk_threshold(&self) -> u32 {
        self.at_risk_threshold
    }

    pub fn strict_countries(&self) -> bool {
        self.strict_countries
    }

    /// The inclusive lookback window ending on `reference`.
    pub fn window_for(&self, reference: NaiveDate) -> DateWindow {
        let lookback = Duration::days(i64::from(self.window_days) - 1);
        let start = reference
            .checked_sub_signed(lookback)
            .unwrap_or(NaiveDate::MIN);
        DateWindow {
            start,
            end: reference,
        }
    }

    /// Last reference date whose window still contains `date`.
    pub(crate) fn last_window_touching(&self, date: NaiveDate) -> NaiveDate {
        let lookahead = Duration::days(i64::from(self.window_days) - 1);
        date.checked_add_signed(lookahead).unwrap_or(NaiveDate::MAX)
    }
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STAY_DAYS, DEFAULT_WINDOW_DAYS)
    }
}

impl From<&RuleConfig> for RulePolicy {
    fn from(config: &RuleConfig) -> Self {
        Self::new(config.max_stay_days, config.window_days)
            .with_at_risk_threshold(config.at_risk_threshold)
            .with_strict_countries(config.strict_countries)
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> u32 {
        inclusive_days(self.start, self.end)
    }
}

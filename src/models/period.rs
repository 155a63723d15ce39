//! Goal cadence and date ranges

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a goal's limit resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    #[default]
    Monthly,
    Weekly,
    Yearly,
}

impl fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Weekly => write!(f, "weekly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for GoalPeriod {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(Self::Monthly),
            "weekly" | "week" | "w" => Ok(Self::Weekly),
            "yearly" | "year" | "annual" | "y" => Ok(Self::Yearly),
            _ => Err(PeriodParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParseError(pub String);

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid period '{}', expected monthly, weekly or yearly",
            self.0
        )
    }
}

impl std::error::Error for PeriodParseError {}

/// An inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The calendar month containing `date`, first through last day
    pub fn calendar_month(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .map(|next| next - Duration::days(1))
            .unwrap_or(date);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// The stored bounds for a newly created goal: `[today, today + 1 month)`
///
/// The end is exclusive. Month-end start dates clamp (Jan 31 -> Feb 28).
pub fn initial_goal_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = today
        .checked_add_months(Months::new(1))
        .unwrap_or(today + Duration::days(30));
    (today, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_month() {
        let range = DateRange::calendar_month(date(2026, 10, 14));
        assert_eq!(range.start, date(2026, 10, 1));
        assert_eq!(range.end, date(2026, 10, 31));
    }

    #[test]
    fn test_calendar_month_leap_february() {
        let range = DateRange::calendar_month(date(2028, 2, 10));
        assert_eq!(range.end, date(2028, 2, 29));
    }

    #[test]
    fn test_calendar_month_december() {
        let range = DateRange::calendar_month(date(2026, 12, 31));
        assert_eq!(range.start, date(2026, 12, 1));
        assert_eq!(range.end, date(2026, 12, 31));
        assert!(range.contains(date(2026, 12, 31)));
        assert!(!range.contains(date(2027, 1, 1)));
    }

    #[test]
    fn test_initial_bounds() {
        assert_eq!(
            initial_goal_bounds(date(2026, 10, 14)),
            (date(2026, 10, 14), date(2026, 11, 14))
        );
        assert_eq!(
            initial_goal_bounds(date(2026, 1, 31)),
            (date(2026, 1, 31), date(2026, 2, 28))
        );
    }

    #[test]
    fn test_parse_period() {
        assert_eq!("Monthly".parse::<GoalPeriod>().unwrap(), GoalPeriod::Monthly);
        assert_eq!("week".parse::<GoalPeriod>().unwrap(), GoalPeriod::Weekly);
        assert_eq!("annual".parse::<GoalPeriod>().unwrap(), GoalPeriod::Yearly);
        assert!("daily".parse::<GoalPeriod>().is_err());
    }
}

//! Goal model and progress math
//!
//! A goal is a spending limit on one category. `current_amount` is derived
//! state: it is persisted along with the rest of the record, but every read
//! path recomputes it from transactions before showing it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{Category, CategorySnapshot};
use super::ids::{CategoryId, GoalId};
use super::money::Money;
use super::period::{initial_goal_bounds, GoalPeriod};

pub const DEFAULT_WARNING_PERCENT: i64 = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub category_id: CategoryId,
    pub category: CategorySnapshot,
    pub limit_amount: Money,
    #[serde(default)]
    pub current_amount: Money,
    #[serde(default)]
    pub alert_on_exceed: bool,
    #[serde(default)]
    pub period: GoalPeriod,
    pub start_date: NaiveDate,
    /// Exclusive end of the nominal window set at creation
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Build a new goal for `category`, with bounds starting at `today`
    ///
    /// Does not validate; the service checks the limit before calling this.
    pub fn new(category: &Category, limit_amount: Money, today: NaiveDate) -> Self {
        let now = Utc::now();
        let (start_date, end_date) = initial_goal_bounds(today);
        Self {
            id: GoalId::new(),
            category_id: category.id,
            category: category.snapshot(),
            limit_amount,
            current_amount: Money::zero(),
            alert_on_exceed: false,
            period: GoalPeriod::default(),
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn progress(&self) -> GoalProgress {
        GoalProgress::new(self.current_amount, self.limit_amount)
    }

    pub fn progress_with_threshold(&self, warning_percent: i64) -> GoalProgress {
        GoalProgress::with_threshold(self.current_amount, self.limit_amount, warning_percent)
    }

    pub fn remaining(&self) -> Money {
        self.limit_amount - self.current_amount
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} ({})",
            self.category.name, self.current_amount, self.limit_amount, self.period
        )
    }
}

pub fn validate_limit(limit: Money) -> Result<(), GoalValidationError> {
    if limit.is_positive() {
        Ok(())
    } else {
        Err(GoalValidationError::NonPositiveLimit(limit))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    NonPositiveLimit(Money),
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveLimit(m) => {
                write!(f, "limit must be greater than zero (got {})", m)
            }
        }
    }
}

impl std::error::Error for GoalValidationError {}

/// `round(current / limit * 100)`, unclamped; a zero limit reads as 0%
pub fn progress_percent(current: Money, limit: Money) -> i64 {
    if limit.is_zero() {
        return 0;
    }
    (current.cents() as f64 / limit.cents() as f64 * 100.0).round() as i64
}

/// Meeting the limit exactly counts as over
pub fn is_over_limit(current: Money, limit: Money) -> bool {
    current >= limit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStatus {
    OnTrack,
    Warning,
    OverLimit,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTrack => write!(f, "on track"),
            Self::Warning => write!(f, "warning"),
            Self::OverLimit => write!(f, "over limit"),
        }
    }
}

/// Progress of a goal's current spend against its limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalProgress {
    pub current: Money,
    pub limit: Money,
    pub percent: i64,
    pub status: ProgressStatus,
}

impl GoalProgress {
    pub fn new(current: Money, limit: Money) -> Self {
        Self::with_threshold(current, limit, DEFAULT_WARNING_PERCENT)
    }

    pub fn with_threshold(current: Money, limit: Money, warning_percent: i64) -> Self {
        let percent = progress_percent(current, limit);
        let status = if is_over_limit(current, limit) {
            ProgressStatus::OverLimit
        } else if percent >= warning_percent {
            // below the limit, so at most 100 after rounding
            ProgressStatus::Warning
        } else {
            ProgressStatus::OnTrack
        };
        Self {
            current,
            limit,
            percent,
            status,
        }
    }

    pub fn is_over_limit(&self) -> bool {
        self.status == ProgressStatus::OverLimit
    }

    pub fn is_warning(&self) -> bool {
        self.status == ProgressStatus::Warning
    }

    /// Percent used for drawing a progress bar, clamped to 0..=100
    pub fn bar_percent(&self) -> i64 {
        self.percent.clamp(0, 100)
    }
}

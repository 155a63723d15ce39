//! Goal progress reconciliation
//!
//! Current spend is always measured over the calendar month containing
//! "today", whatever a goal's stored `start_date`/`end_date` say. A goal
//! created in March and viewed in May shows May's spending.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::error::GoalResult;
use crate::models::{CategoryId, DateRange, Goal, Money, TransactionFilter};

use super::source::TransactionSource;

pub const DEFAULT_QUERY_LIMIT: usize = 1000;

pub struct ProgressReconciler<T> {
    source: T,
    query_limit: usize,
}

impl<T: TransactionSource> ProgressReconciler<T> {
    pub fn new(source: T) -> Self {
        Self::with_query_limit(source, DEFAULT_QUERY_LIMIT)
    }

    pub fn with_query_limit(source: T, query_limit: usize) -> Self {
        Self {
            source,
            query_limit: query_limit.max(1),
        }
    }

    /// The window reconciliation sums over
    pub fn active_window(today: NaiveDate) -> DateRange {
        DateRange::calendar_month(today)
    }

    /// Reconcile against the current month by the local clock
    pub fn reconcile(&self, goals: &[Goal]) -> Vec<Goal> {
        self.reconcile_at(goals, Local::now().date_naive())
    }

    /// Return copies of `goals` with `current_amount` recomputed
    ///
    /// If the transaction query fails the goals come back unchanged.
    pub fn reconcile_at(&self, goals: &[Goal], today: NaiveDate) -> Vec<Goal> {
        if goals.is_empty() {
            return Vec::new();
        }

        let window = Self::active_window(today);
        let totals = match self.spend_by_category(window) {
            Ok(totals) => totals,
            Err(e) => {
                warn!(error = %e, %window, "transaction query failed, progress left stale");
                return goals.to_vec();
            }
        };

        goals
            .iter()
            .map(|goal| {
                let mut goal = goal.clone();
                goal.current_amount = totals
                    .get(&goal.category_id)
                    .copied()
                    .unwrap_or_default();
                goal
            })
            .collect()
    }

    /// Total absolute expense per category within `window`, in one query
    pub fn spend_by_category(&self, window: DateRange) -> GoalResult<HashMap<CategoryId, Money>> {
        let filter = TransactionFilter::expenses_between(window.start, window.end, self.query_limit);
        let page = self.source.fetch_transactions(&filter)?;

        if page.has_more {
            warn!(
                fetched = page.transactions.len(),
                total = page.total,
                "expense query hit its row cap, progress may be under-counted"
            );
        }
        debug!(count = page.transactions.len(), %window, "fetched expenses");

        let mut totals: HashMap<CategoryId, Money> = HashMap::new();
        for txn in page.transactions.iter().filter(|t| t.is_expense()) {
            if let Some(category_id) = txn.category_id {
                *totals.entry(category_id).or_default() += txn.amount.abs();
            }
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Transaction, TransactionKind};
    use crate::services::testing::FakeTransactions;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 10, 14)
    }

    #[test]
    fn test_food_goal_scenario() {
        let food = Category::new("Food");
        let goal = Goal::new(&food, Money::from_cents(50000), today());
        let source = FakeTransactions::new(vec![
            Transaction::expense(food.id, Money::from_cents(-12000), date(2026, 10, 2)),
            Transaction::expense(food.id, Money::from_cents(-8550), date(2026, 10, 9)),
        ]);

        let reconciled = ProgressReconciler::new(&source).reconcile_at(&[goal], today());
        let progress = reconciled[0].progress();

        assert_eq!(reconciled[0].current_amount, Money::from_cents(20550));
        assert_eq!(progress.percent, 41);
        assert!(!progress.is_over_limit());
    }

    #[test]
    fn test_over_limit_scenario() {
        let cat = Category::new("Games");
        let goal = Goal::new(&cat, Money::from_cents(10000), today());
        let source = FakeTransactions::new(vec![Transaction::expense(
            cat.id,
            Money::from_cents(-15000),
            date(2026, 10, 5),
        )]);

        let reconciled = ProgressReconciler::new(&source).reconcile_at(&[goal], today());
        let progress = reconciled[0].progress();

        assert_eq!(reconciled[0].current_amount, Money::from_cents(15000));
        assert_eq!(progress.percent, 150);
        assert!(progress.is_over_limit());
        assert!(!progress.is_warning());
    }

    #[test]
    fn test_uses_one_query_for_all_goals() {
        let a = Category::new("A");
        let b = Category::new("B");
        let goals = vec![
            Goal::new(&a, Money::from_cents(100), today()),
            Goal::new(&b, Money::from_cents(100), today()),
        ];
        let source = FakeTransactions::new(vec![]);

        ProgressReconciler::new(&source).reconcile_at(&goals, today());
        assert_eq!(source.calls(), 1);

        let filter = source.last_filter().unwrap();
        assert_eq!(filter.kind, Some(TransactionKind::Expense));
        assert_eq!(filter.start_date, Some(date(2026, 10, 1)));
        assert_eq!(filter.end_date, Some(date(2026, 10, 31)));
    }

    #[test]
    fn test_no_goals_no_query() {
        let source = FakeTransactions::new(vec![]);
        assert!(ProgressReconciler::new(&source).reconcile_at(&[], today()).is_empty());
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_unmatched_goal_is_zero() {
        let food = Category::new("Food");
        let rent = Category::new("Rent");
        let mut goal = Goal::new(&rent, Money::from_cents(100000), today());
        goal.current_amount = Money::from_cents(999);
        let source = FakeTransactions::new(vec![Transaction::expense(
            food.id,
            Money::from_cents(-500),
            date(2026, 10, 1),
        )]);

        let reconciled = ProgressReconciler::new(&source).reconcile_at(&[goal], today());
        assert_eq!(reconciled[0].current_amount, Money::zero());
    }

    #[test]
    fn test_income_and_uncategorized_are_ignored() {
        let food = Category::new("Food");
        let goal = Goal::new(&food, Money::from_cents(100000), today());
        let source = FakeTransactions::new(vec![
            Transaction::new(Some(food.id), Money::from_cents(5000), TransactionKind::Income, date(2026, 10, 3)),
            Transaction::new(None, Money::from_cents(-700), TransactionKind::Expense, date(2026, 10, 3)),
            Transaction::expense(food.id, Money::from_cents(-300), date(2026, 10, 3)),
        ]);

        let reconciled = ProgressReconciler::new(&source).reconcile_at(&[goal], today());
        assert_eq!(reconciled[0].current_amount, Money::from_cents(300));
    }

    #[test]
    fn test_positive_expense_amounts_count_by_magnitude() {
        let food = Category::new("Food");
        let goal = Goal::new(&food, Money::from_cents(100000), today());
        let source = FakeTransactions::new(vec![
            Transaction::expense(food.id, Money::from_cents(400), date(2026, 10, 3)),
            Transaction::expense(food.id, Money::from_cents(-600), date(2026, 10, 4)),
        ]);

        let reconciled = ProgressReconciler::new(&source).reconcile_at(&[goal], today());
        assert_eq!(reconciled[0].current_amount, Money::from_cents(1000));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let food = Category::new("Food");
        let goal = Goal::new(&food, Money::from_cents(50000), today());
        let source = FakeTransactions::new(vec![Transaction::expense(
            food.id,
            Money::from_cents(-4200),
            date(2026, 10, 2),
        )]);
        let reconciler = ProgressReconciler::new(&source);

        let once = reconciler.reconcile_at(&[goal], today());
        let twice = reconciler.reconcile_at(&once, today());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_query_failure_returns_goals_unchanged() {
        let food = Category::new("Food");
        let mut goal = Goal::new(&food, Money::from_cents(50000), today());
        goal.current_amount = Money::from_cents(1234);
        let source = FakeTransactions::failing();

        let reconciled = ProgressReconciler::new(&source).reconcile_at(&[goal.clone()], today());
        assert_eq!(reconciled, vec![goal]);
    }

    #[test]
    fn test_window_is_current_month_not_stored_period() {
        // Created in August; its stored window is Aug 10 to Sep 10
        let food = Category::new("Food");
        let goal = Goal::new(&food, Money::from_cents(50000), date(2026, 8, 10));
        let source = FakeTransactions::new(vec![
            Transaction::expense(food.id, Money::from_cents(-1000), date(2026, 8, 20)),
            Transaction::expense(food.id, Money::from_cents(-2500), date(2026, 10, 1)),
        ]);

        let reconciled = ProgressReconciler::new(&source).reconcile_at(&[goal.clone()], today());

        assert_eq!(reconciled[0].current_amount, Money::from_cents(2500));
        assert_eq!(reconciled[0].start_date, goal.start_date);
        assert_eq!(reconciled[0].end_date, goal.end_date);
    }

    #[test]
    fn test_identity_fields_untouched() {
        let food = Category::new("Food");
        let goal = Goal::new(&food, Money::from_cents(50000), today());
        let source = FakeTransactions::new(vec![]);

        let reconciled = ProgressReconciler::new(&source).reconcile_at(&[goal.clone()], today());
        assert_eq!(reconciled[0].id, goal.id);
        assert_eq!(reconciled[0].limit_amount, goal.limit_amount);
        assert_eq!(reconciled[0].category, goal.category);
        assert_eq!(reconciled[0].updated_at, goal.updated_at);
    }

    #[test]
    fn test_capped_page_still_sums_what_was_returned() {
        let food = Category::new("Food");
        let goal = Goal::new(&food, Money::from_cents(50000), today());
        let source = FakeTransactions::new(
            (1..=4)
                .map(|d| Transaction::expense(food.id, Money::from_cents(-100), date(2026, 10, d)))
                .collect(),
        );

        let reconciled =
            ProgressReconciler::with_query_limit(&source, 2).reconcile_at(&[goal], today());
        assert_eq!(reconciled[0].current_amount, Money::from_cents(200));
    }
}

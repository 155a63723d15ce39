//! Goal service
//!
//! CRUD over goals with validation, category snapshots, reconciliation and
//! audit logging. Validation and not-found errors are returned as `Err`
//! before anything is written. A failed storage write is not an error here:
//! it is logged and reported on the returned `Saved`.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::{GoalError, GoalResult};
use crate::models::{
    goal::validate_limit, Category, CategoryId, Goal, GoalId, GoalPeriod, GoalProgress, Money,
};
use crate::storage::{GoalRepository, KeyValueStore};

use super::reconcile::ProgressReconciler;
use super::source::{CategorySource, TransactionSource};

/// Result of a mutating operation that went through validation
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Saved<T> {
    pub value: T,
    /// Set when the storage write failed; the change may not survive a restart
    pub storage_warning: Option<String>,
}

impl<T> Saved<T> {
    fn new(value: T, write: GoalResult<()>) -> Self {
        let storage_warning = match write {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "goal storage write failed");
                Some(e.to_string())
            }
        };
        Self {
            value,
            storage_warning,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.storage_warning.is_none()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateGoal {
    pub category_id: Option<CategoryId>,
    pub limit_amount: Option<Money>,
    pub alert_on_exceed: bool,
    pub period: Option<GoalPeriod>,
}

/// Partial update; `None` fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub category_id: Option<CategoryId>,
    pub limit_amount: Option<Money>,
    pub alert_on_exceed: Option<bool>,
    pub period: Option<GoalPeriod>,
}

impl GoalUpdate {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.limit_amount.is_none()
            && self.alert_on_exceed.is_none()
            && self.period.is_none()
    }
}

pub struct GoalService<S, C, T> {
    repo: GoalRepository<S>,
    categories: C,
    reconciler: ProgressReconciler<T>,
    audit: Option<AuditLogger>,
    warning_percent: i64,
    default_period: GoalPeriod,
    fixed_today: Option<NaiveDate>,
}

impl<S, C, T> GoalService<S, C, T>
where
    S: KeyValueStore,
    C: CategorySource,
    T: TransactionSource,
{
    pub fn new(repo: GoalRepository<S>, categories: C, reconciler: ProgressReconciler<T>) -> Self {
        Self {
            repo,
            categories,
            reconciler,
            audit: None,
            warning_percent: crate::models::goal::DEFAULT_WARNING_PERCENT,
            default_period: GoalPeriod::default(),
            fixed_today: None,
        }
    }

    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn with_warning_percent(mut self, percent: i64) -> Self {
        self.warning_percent = percent;
        self
    }

    pub fn with_default_period(mut self, period: GoalPeriod) -> Self {
        self.default_period = period;
        self
    }

    /// Pin "today" instead of reading the local clock
    pub fn with_fixed_date(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn repository(&self) -> &GoalRepository<S> {
        &self.repo
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn reconcile_one(&self, goal: Goal) -> Goal {
        let today = self.today();
        self.reconciler
            .reconcile_at(std::slice::from_ref(&goal), today)
            .pop()
            .unwrap_or(goal)
    }

    fn lookup_category(&self, id: CategoryId) -> GoalResult<Category> {
        self.categories
            .find_category(id)?
            .ok_or_else(|| GoalError::category_not_found(id.to_string()))
    }

    fn audit(&self, entry: AuditEntry) {
        if let Some(audit) = &self.audit {
            audit.record(&entry);
        }
    }

    pub fn progress(&self, goal: &Goal) -> GoalProgress {
        goal.progress_with_threshold(self.warning_percent)
    }

    /// All goals with freshly reconciled progress
    pub fn list(&self) -> Vec<Goal> {
        let goals = self.repo.load_all();
        self.reconciler.reconcile_at(&goals, self.today())
    }

    pub fn get(&self, id: GoalId) -> GoalResult<Goal> {
        let goal = self
            .repo
            .get(id)
            .ok_or_else(|| GoalError::goal_not_found(id.to_string()))?;
        Ok(self.reconcile_one(goal))
    }

    /// Find a goal by id string or by its category's display name
    pub fn find(&self, identifier: &str) -> GoalResult<Goal> {
        if let Ok(id) = identifier.parse::<GoalId>() {
            return self.get(id);
        }

        let needle = identifier.trim().to_lowercase();
        let goals = self.repo.load_all();
        let mut matches = goals
            .into_iter()
            .filter(|g| g.category.name.to_lowercase() == needle || g.id.to_string() == needle);

        match (matches.next(), matches.next()) {
            (Some(goal), None) => Ok(self.reconcile_one(goal)),
            (Some(_), Some(_)) => Err(GoalError::validation(
                "goal",
                format!("'{}' matches more than one goal, use the full id", identifier),
            )),
            (None, _) => Err(GoalError::goal_not_found(identifier)),
        }
    }

    pub fn create(&self, input: CreateGoal) -> GoalResult<Saved<Goal>> {
        let category_id = input
            .category_id
            .ok_or_else(|| GoalError::validation("category", "a category must be selected"))?;
        let limit = input
            .limit_amount
            .ok_or_else(|| GoalError::validation("limit_amount", "a limit is required"))?;
        validate_limit(limit).map_err(|e| GoalError::validation("limit_amount", e.to_string()))?;

        let category = self.lookup_category(category_id)?;

        let mut goal = Goal::new(&category, limit, self.today());
        goal.alert_on_exceed = input.alert_on_exceed;
        goal.period = input.period.unwrap_or(self.default_period);

        let write = self.repo.upsert(goal.clone());
        if write.is_ok() {
            self.audit(AuditEntry::create(
                EntityType::Goal,
                goal.id.to_string(),
                Some(goal.category.name.clone()),
                &goal,
            ));
        }

        Ok(Saved::new(self.reconcile_one(goal), write))
    }

    pub fn update(&self, id: GoalId, update: GoalUpdate) -> GoalResult<Saved<Goal>> {
        let before = self
            .repo
            .get(id)
            .ok_or_else(|| GoalError::goal_not_found(id.to_string()))?;

        if let Some(limit) = update.limit_amount {
            validate_limit(limit)
                .map_err(|e| GoalError::validation("limit_amount", e.to_string()))?;
        }

        let mut goal = before.clone();
        if let Some(category_id) = update.category_id {
            if category_id != goal.category_id {
                let category = self.lookup_category(category_id)?;
                goal.category_id = category.id;
                goal.category = category.snapshot();
            }
        }
        if let Some(limit) = update.limit_amount {
            goal.limit_amount = limit;
        }
        if let Some(alert) = update.alert_on_exceed {
            goal.alert_on_exceed = alert;
        }
        if let Some(period) = update.period {
            goal.period = period;
        }
        goal.updated_at = Utc::now();

        let write = self.repo.upsert(goal.clone());
        if write.is_ok() {
            self.audit(AuditEntry::update(
                EntityType::Goal,
                goal.id.to_string(),
                Some(goal.category.name.clone()),
                &before,
                &goal,
            ));
        }

        Ok(Saved::new(self.reconcile_one(goal), write))
    }

    /// Remove a goal; returns the removed record
    pub fn delete(&self, id: GoalId) -> GoalResult<Saved<Goal>> {
        let goal = self
            .repo
            .get(id)
            .ok_or_else(|| GoalError::goal_not_found(id.to_string()))?;

        let write = match self.repo.delete(id) {
            Ok(true) => Ok(()),
            // removed by another writer between the read and the delete
            Ok(false) => return Err(GoalError::goal_not_found(id.to_string())),
            Err(e) => Err(e),
        };
        if write.is_ok() {
            self.audit(AuditEntry::delete(
                EntityType::Goal,
                goal.id.to_string(),
                Some(goal.category.name.clone()),
                &goal,
            ));
        }

        Ok(Saved::new(goal, write))
    }

    /// Refresh every goal's category snapshot from the live categories
    ///
    /// Goals whose category no longer exists keep their snapshot. Returns
    /// the number of goals that changed.
    pub fn resync_categories(&self) -> GoalResult<Saved<usize>> {
        let live: HashMap<CategoryId, Category> = self
            .categories
            .fetch_categories()?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut goals = match self.repo.try_load_all() {
            Ok(goals) => goals,
            Err(e) => return Ok(Saved::new(0, Err(e))),
        };
        let mut changed = Vec::new();
        for goal in goals.iter_mut() {
            let Some(category) = live.get(&goal.category_id) else {
                debug!(goal = %goal.id, "category missing, keeping snapshot");
                continue;
            };
            let snapshot = category.snapshot();
            if snapshot != goal.category {
                let before = goal.clone();
                goal.category = snapshot;
                goal.updated_at = Utc::now();
                changed.push((before, goal.clone()));
            }
        }

        if changed.is_empty() {
            return Ok(Saved::new(0, Ok(())));
        }
        let write = self.repo.save_all(&goals);
        if write.is_ok() {
            for (before, after) in &changed {
                self.audit(AuditEntry::update(
                    EntityType::Goal,
                    after.id.to_string(),
                    Some(after.category.name.clone()),
                    before,
                    after,
                ));
            }
        }
        Ok(Saved::new(changed.len(), write))
    }

    /// Alerting goals that are over their limit or in the warning band
    pub fn alerts(&self) -> Vec<(Goal, GoalProgress)> {
        self.list()
            .into_iter()
            .filter(|g| g.alert_on_exceed)
            .map(|g| {
                let progress = self.progress(&g);
                (g, progress)
            })
            .filter(|(_, p)| p.is_over_limit() || p.is_warning())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;
    use crate::services::testing::{FakeCategories, FakeTransactions};
    use crate::storage::MemoryStore;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        store: MemoryStore,
        categories: FakeCategories,
        transactions: FakeTransactions,
        food: Category,
        rent: Category,
    }

    impl Fixture {
        fn new() -> Self {
            let food = Category::new("Food").with_style("utensils", "#ff8800");
            let rent = Category::new("Rent");
            Self {
                store: MemoryStore::new(),
                categories: FakeCategories::new(vec![food.clone(), rent.clone()]),
                transactions: FakeTransactions::new(vec![]),
                food,
                rent,
            }
        }

        fn service(
            &self,
        ) -> GoalService<&MemoryStore, &FakeCategories, &FakeTransactions> {
            GoalService::new(
                GoalRepository::new(&self.store),
                &self.categories,
                ProgressReconciler::new(&self.transactions),
            )
            .with_fixed_date(date(2026, 10, 14))
        }
    }

    fn create_input(category: &Category, cents: i64) -> CreateGoal {
        CreateGoal {
            category_id: Some(category.id),
            limit_amount: Some(Money::from_cents(cents)),
            ..CreateGoal::default()
        }
    }

    #[test]
    fn test_create_snapshots_and_persists() {
        let fx = Fixture::new();
        let service = fx.service();

        let saved = service.create(create_input(&fx.food, 50000)).unwrap();
        assert!(saved.is_persisted());

        let goal = saved.into_inner();
        assert_eq!(goal.category.name, "Food");
        assert_eq!(goal.category.icon, "utensils");
        assert_eq!(goal.start_date, date(2026, 10, 14));
        assert_eq!(goal.end_date, date(2026, 11, 14));
        assert_eq!(service.repository().load_all().len(), 1);
    }

    #[test]
    fn test_create_reconciles_new_goal() {
        let fx = Fixture::new();
        fx.transactions.push(Transaction::expense(
            fx.food.id,
            Money::from_cents(-12000),
            date(2026, 10, 2),
        ));
        fx.transactions.push(Transaction::expense(
            fx.food.id,
            Money::from_cents(-8550),
            date(2026, 10, 3),
        ));

        let goal = fx
            .service()
            .create(create_input(&fx.food, 50000))
            .unwrap()
            .into_inner();

        assert_eq!(goal.current_amount, Money::from_cents(20550));
        assert_eq!(goal.progress().percent, 41);
    }

    #[test]
    fn test_create_negative_limit_rejected_without_write() {
        let fx = Fixture::new();
        let err = fx
            .service()
            .create(create_input(&fx.food, -1000))
            .unwrap_err();

        assert_eq!(err.field(), Some("limit_amount"));
        assert_eq!(fx.store.write_count(), 0);
    }

    #[test]
    fn test_create_zero_limit_rejected() {
        let fx = Fixture::new();
        let err = fx.service().create(create_input(&fx.food, 0)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_create_requires_category() {
        let fx = Fixture::new();
        let err = fx
            .service()
            .create(CreateGoal {
                limit_amount: Some(Money::from_cents(100)),
                ..CreateGoal::default()
            })
            .unwrap_err();

        assert_eq!(err.field(), Some("category"));
        assert_eq!(fx.store.write_count(), 0);
    }

    #[test]
    fn test_create_unknown_category_not_found() {
        let fx = Fixture::new();
        let ghost = Category::new("Ghost");
        let err = fx.service().create(create_input(&ghost, 100)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fx.store.write_count(), 0);
    }

    #[test]
    fn test_create_write_failure_is_reported_not_raised() {
        let fx = Fixture::new();
        fx.store.set_fail_writes(true);

        let saved = fx.service().create(create_input(&fx.food, 100)).unwrap();
        assert!(!saved.is_persisted());
        assert!(fx.service().list().is_empty());
    }

    #[test]
    fn test_create_over_corrupt_store_keeps_stored_data() {
        let fx = Fixture {
            store: MemoryStore::new().with_value("goals", "{broken"),
            ..Fixture::new()
        };

        let saved = fx.service().create(create_input(&fx.food, 100)).unwrap();
        assert!(saved.storage_warning.is_some());
        assert_eq!(fx.store.get("goals").unwrap().as_deref(), Some("{broken"));

        let resync = fx.service().resync_categories().unwrap();
        assert!(!resync.is_persisted());
        assert_eq!(fx.store.write_count(), 0);
    }

    #[test]
    fn test_update_unknown_goal_not_found_and_unchanged() {
        let fx = Fixture::new();
        let service = fx.service();
        let _ = service.create(create_input(&fx.food, 100)).unwrap();
        let stored = fx.store.get("goals").unwrap();
        let writes = fx.store.write_count();

        let err = service
            .update(
                GoalId::new(),
                GoalUpdate {
                    limit_amount: Some(Money::from_cents(500)),
                    ..GoalUpdate::default()
                },
            )
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(fx.store.write_count(), writes);
        assert_eq!(fx.store.get("goals").unwrap(), stored);
    }

    #[test]
    fn test_update_merges_and_keeps_snapshot() {
        let fx = Fixture::new();
        let service = fx.service();
        let goal = service.create(create_input(&fx.food, 100)).unwrap().into_inner();

        // rename the live category; snapshot must not follow without a category change
        fx.categories
            .replace(Category { name: "Groceries".into(), ..fx.food.clone() });

        let updated = service
            .update(
                goal.id,
                GoalUpdate {
                    limit_amount: Some(Money::from_cents(900)),
                    alert_on_exceed: Some(true),
                    ..GoalUpdate::default()
                },
            )
            .unwrap()
            .into_inner();

        assert_eq!(updated.limit_amount, Money::from_cents(900));
        assert!(updated.alert_on_exceed);
        assert_eq!(updated.category.name, "Food");
        assert_eq!(updated.created_at, goal.created_at);
        assert_eq!(updated.start_date, goal.start_date);
    }

    #[test]
    fn test_update_category_resnapshots() {
        let fx = Fixture::new();
        let service = fx.service();
        let goal = service.create(create_input(&fx.food, 100)).unwrap().into_inner();

        let updated = service
            .update(
                goal.id,
                GoalUpdate {
                    category_id: Some(fx.rent.id),
                    ..GoalUpdate::default()
                },
            )
            .unwrap()
            .into_inner();

        assert_eq!(updated.category_id, fx.rent.id);
        assert_eq!(updated.category.name, "Rent");
    }

    #[test]
    fn test_update_invalid_limit_rejected_before_write() {
        let fx = Fixture::new();
        let service = fx.service();
        let goal = service.create(create_input(&fx.food, 100)).unwrap().into_inner();
        let writes = fx.store.write_count();

        let err = service
            .update(
                goal.id,
                GoalUpdate {
                    limit_amount: Some(Money::from_cents(-5)),
                    ..GoalUpdate::default()
                },
            )
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(fx.store.write_count(), writes);
    }

    #[test]
    fn test_delete() {
        let fx = Fixture::new();
        let service = fx.service();
        let goal = service.create(create_input(&fx.food, 100)).unwrap().into_inner();

        let removed = service.delete(goal.id).unwrap();
        assert!(removed.is_persisted());
        assert_eq!(removed.value.id, goal.id);
        assert!(service.list().is_empty());

        assert!(service.delete(goal.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_ignores_stored_current_amount() {
        let fx = Fixture::new();
        let service = fx.service();
        let mut goal = service.create(create_input(&fx.food, 100)).unwrap().into_inner();
        goal.current_amount = Money::from_cents(99999);
        service.repository().save_all(&[goal]).unwrap();

        let listed = service.list();
        assert_eq!(listed[0].current_amount, Money::zero());
    }

    #[test]
    fn test_find_by_category_name() {
        let fx = Fixture::new();
        let service = fx.service();
        let goal = service.create(create_input(&fx.food, 100)).unwrap().into_inner();

        assert_eq!(service.find("food").unwrap().id, goal.id);
        assert_eq!(service.find(&goal.id.full()).unwrap().id, goal.id);
        assert!(service.find("rent").unwrap_err().is_not_found());
    }

    #[test]
    fn test_resync_categories() {
        let fx = Fixture::new();
        let service = fx.service();
        let _ = service.create(create_input(&fx.food, 100)).unwrap();
        let _ = service.create(create_input(&fx.rent, 100)).unwrap();

        fx.categories.replace(Category {
            name: "Dining".into(),
            color: "#00ff00".into(),
            ..fx.food.clone()
        });

        let saved = service.resync_categories().unwrap();
        assert_eq!(saved.value, 1);

        let names: Vec<_> = service
            .list()
            .into_iter()
            .map(|g| g.category.name)
            .collect();
        assert!(names.contains(&"Dining".to_string()));
        assert!(names.contains(&"Rent".to_string()));

        assert_eq!(service.resync_categories().unwrap().value, 0);
    }

    #[test]
    fn test_alerts_only_for_flagged_goals() {
        let fx = Fixture::new();
        let service = fx.service();
        let mut flagged = create_input(&fx.food, 10000);
        flagged.alert_on_exceed = true;
        let _ = service.create(flagged).unwrap();
        let _ = service.create(create_input(&fx.rent, 10000)).unwrap();

        for cat in [&fx.food, &fx.rent] {
            fx.transactions.push(Transaction::expense(
                cat.id,
                Money::from_cents(-15000),
                date(2026, 10, 1),
            ));
        }

        let alerts = service.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].0.category.name, "Food");
        assert!(alerts[0].1.is_over_limit());
    }

    #[test]
    fn test_mutations_are_audited() {
        let temp_dir = TempDir::new().unwrap();
        let fx = Fixture::new();
        let service = fx
            .service()
            .with_audit(AuditLogger::new(temp_dir.path().join("audit.log")));

        let goal = service.create(create_input(&fx.food, 100)).unwrap().into_inner();
        let _ = service
            .update(
                goal.id,
                GoalUpdate {
                    limit_amount: Some(Money::from_cents(200)),
                    ..GoalUpdate::default()
                },
            )
            .unwrap();
        let _ = service.delete(goal.id).unwrap();

        let entries = AuditLogger::new(temp_dir.path().join("audit.log"))
            .read_all()
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[1].diff_summary.as_deref(),
            Some("limitAmount: 1.0 -> 2.0")
        );
    }
}

//! Goal repository
//!
//! The whole goal collection lives as one JSON array under a single store
//! key. Every mutation rewrites the full array; concurrent writers race and
//! the last write wins. Mutations refuse to run over unreadable data, so a
//! corrupt collection is never replaced by a partial one.

use tracing::warn;

use crate::error::GoalError;
use crate::models::{Goal, GoalId};

use super::kv::KeyValueStore;

pub const GOALS_KEY: &str = "goals";

pub struct GoalRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> GoalRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, GOALS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Load every goal, degrading to an empty list on missing or corrupt data
    pub fn load_all(&self) -> Vec<Goal> {
        match self.try_load_all() {
            Ok(goals) => goals,
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding unreadable goal data");
                Vec::new()
            }
        }
    }

    /// Load every goal; a missing key is an empty list, corruption is an error
    pub fn try_load_all(&self) -> Result<Vec<Goal>, GoalError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            GoalError::Storage(format!("Failed to parse stored goals: {}", e))
        })
    }

    /// Overwrite the stored collection in a single write
    pub fn save_all(&self, goals: &[Goal]) -> Result<(), GoalError> {
        let raw = serde_json::to_string(goals)
            .map_err(|e| GoalError::Storage(format!("Failed to serialize goals: {}", e)))?;
        self.store.set(&self.key, &raw)
    }

    pub fn get(&self, id: GoalId) -> Option<Goal> {
        self.load_all().into_iter().find(|g| g.id == id)
    }

    /// Replace the goal with the same id, or append it
    pub fn upsert(&self, goal: Goal) -> Result<(), GoalError> {
        let mut goals = self.try_load_all()?;
        match goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal,
            None => goals.push(goal),
        }
        self.save_all(&goals)
    }

    /// Returns whether a goal was removed; nothing is written if not
    pub fn delete(&self, id: GoalId) -> Result<bool, GoalError> {
        let mut goals = self.try_load_all()?;
        let before = goals.len();
        goals.retain(|g| g.id != id);
        if goals.len() == before {
            return Ok(false);
        }
        self.save_all(&goals)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money};
    use crate::storage::kv::{FileStore, MemoryStore};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn goal(name: &str, cents: i64) -> Goal {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        Goal::new(&Category::new(name), Money::from_cents(cents), today)
    }

    #[test]
    fn test_save_then_load_is_field_for_field() {
        let store = MemoryStore::new();
        let repo = GoalRepository::new(&store);

        let mut food = goal("Food", 50000);
        food.alert_on_exceed = true;
        food.current_amount = Money::from_cents(20550);
        let goals = vec![food, goal("Rent", 150000)];

        repo.save_all(&goals).unwrap();
        assert_eq!(repo.load_all(), goals);
    }

    #[test]
    fn test_round_trip_through_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(FileStore::new(temp_dir.path()));

        let goals = vec![goal("Food", 12345)];
        repo.save_all(&goals).unwrap();

        let reopened = GoalRepository::new(FileStore::new(temp_dir.path()));
        assert_eq!(reopened.load_all(), goals);
    }

    #[test]
    fn test_load_all_empty_store() {
        let store = MemoryStore::new();
        let repo = GoalRepository::new(&store);
        assert!(repo.load_all().is_empty());
        assert!(repo.try_load_all().unwrap().is_empty());
    }

    #[test]
    fn test_load_all_corrupt_degrades_to_empty() {
        let store = MemoryStore::new().with_value(GOALS_KEY, "{not valid json");
        let repo = GoalRepository::new(&store);

        assert!(repo.load_all().is_empty());
        assert!(matches!(repo.try_load_all(), Err(GoalError::Storage(_))));
    }

    #[test]
    fn test_save_failure_is_reported() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let repo = GoalRepository::new(&store);

        assert!(repo.save_all(&[goal("Food", 100)]).is_err());
        assert!(repo.load_all().is_empty());
    }

    #[test]
    fn test_mutations_leave_corrupt_data_in_place() {
        let store = MemoryStore::new().with_value(GOALS_KEY, "{not valid json");
        let repo = GoalRepository::new(&store);

        assert!(matches!(repo.upsert(goal("Food", 100)), Err(GoalError::Storage(_))));
        assert!(repo.delete(GoalId::new()).is_err());
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.get(GOALS_KEY).unwrap().as_deref(), Some("{not valid json"));
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let store = MemoryStore::new();
        let repo = GoalRepository::new(&store);

        let mut g = goal("Food", 10000);
        repo.upsert(g.clone()).unwrap();
        g.limit_amount = Money::from_cents(20000);
        repo.upsert(g.clone()).unwrap();

        let all = repo.load_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].limit_amount, Money::from_cents(20000));
    }

    #[test]
    fn test_delete_unknown_does_not_write() {
        let store = MemoryStore::new();
        let repo = GoalRepository::new(&store);
        let g = goal("Food", 10000);
        repo.upsert(g.clone()).unwrap();
        let writes = store.write_count();

        assert!(!repo.delete(GoalId::new()).unwrap());
        assert_eq!(store.write_count(), writes);

        assert!(repo.delete(g.id).unwrap());
        assert!(repo.load_all().is_empty());
    }
}

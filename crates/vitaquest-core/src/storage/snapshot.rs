//! Startup snapshot of every persisted entity.
//!
//! One parallel batch of reads covers all known keys. A missing key, a
//! read failure, or malformed JSON all degrade that entity to its static
//! default -- the snapshot always completes so consumers are never blocked
//! by a storage outage.

use serde::de::DeserializeOwned;

use super::kv::{keys, KeyValueStore};
use crate::model::{ActiveGoal, FinishedGoal, PlanBook, TakenDates, TipViewRecord};
use crate::nutrition::NutritionDays;

/// In-memory state reconstructed from the backend at process start.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub plans: PlanBook,
    pub taken_dates: TakenDates,
    pub my_goals: Vec<String>,
    pub active_goals: Vec<ActiveGoal>,
    pub finished_goals: Vec<FinishedGoal>,
    pub has_completed_onboarding: bool,
    pub onboarding_step: u32,
    pub xp: i64,
    pub level: u32,
    pub tip_views: Vec<TipViewRecord>,
    pub nutrition: NutritionDays,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            plans: PlanBook::default(),
            taken_dates: TakenDates::default(),
            my_goals: Vec::new(),
            active_goals: Vec::new(),
            finished_goals: Vec::new(),
            has_completed_onboarding: false,
            onboarding_step: 0,
            xp: 0,
            level: 1,
            tip_views: Vec::new(),
            nutrition: NutritionDays::default(),
        }
    }
}

impl Snapshot {
    /// Load every entity from the backend, falling back per entity.
    pub async fn load(store: &dyn KeyValueStore) -> Self {
        let (
            plans,
            taken_dates,
            my_goals,
            active_goals,
            finished_goals,
            onboarded,
            step,
            xp,
            level,
            tip_views,
            nutrition,
        ) = tokio::join!(
            read(store, keys::PLANS),
            read(store, keys::TAKEN_DATES),
            read(store, keys::MY_GOALS),
            read(store, keys::ACTIVE_GOALS),
            read(store, keys::FINISHED_GOALS),
            read(store, keys::HAS_COMPLETED_ONBOARDING),
            read(store, keys::ONBOARDING_STEP),
            read(store, keys::MY_XP),
            read(store, keys::MY_LEVEL),
            read(store, keys::TIP_VIEWS),
            read(store, keys::DAILY_NUTRITION_SUMMARY),
        );

        Self {
            plans: parse_json(keys::PLANS, plans),
            taken_dates: parse_json(keys::TAKEN_DATES, taken_dates),
            my_goals: parse_json(keys::MY_GOALS, my_goals),
            active_goals: parse_json(keys::ACTIVE_GOALS, active_goals),
            finished_goals: parse_json(keys::FINISHED_GOALS, finished_goals),
            has_completed_onboarding: parse_flag(onboarded),
            onboarding_step: parse_int(step, 0),
            xp: parse_int(xp, 0),
            level: parse_int(level, 1),
            tip_views: parse_json(keys::TIP_VIEWS, tip_views),
            nutrition: parse_json(keys::DAILY_NUTRITION_SUMMARY, nutrition),
        }
    }
}

async fn read(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "snapshot read failed; using default");
            None
        }
    }
}

fn parse_json<T: DeserializeOwned + Default>(key: &str, raw: Option<String>) -> T {
    match raw {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "malformed stored value; using default");
            T::default()
        }),
        None => T::default(),
    }
}

/// Raw `"true"`/`"false"` strings (not JSON, although the encodings
/// coincide for booleans).
fn parse_flag(raw: Option<String>) -> bool {
    raw.as_deref().map(str::trim) == Some("true")
}

fn parse_int<T: std::str::FromStr + Copy>(raw: Option<String>, default: T) -> T {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryStore;

    #[tokio::test]
    async fn empty_store_yields_defaults() {
        let store = MemoryStore::new();
        let snap = Snapshot::load(&store).await;
        assert_eq!(snap, Snapshot::default());
        assert_eq!(snap.level, 1);
    }

    #[tokio::test]
    async fn malformed_values_degrade_to_defaults() {
        let store = MemoryStore::new();
        store.set(keys::PLANS, "{not json").await.unwrap();
        store.set(keys::MY_XP, "lots").await.unwrap();
        store.set(keys::MY_GOALS, "[\"sleep\"]").await.unwrap();

        let snap = Snapshot::load(&store).await;
        assert!(snap.plans.is_empty());
        assert_eq!(snap.xp, 0);
        assert_eq!(snap.my_goals, vec!["sleep".to_string()]);
    }

    #[tokio::test]
    async fn primitive_encodings_parse() {
        let store = MemoryStore::new();
        store
            .set(keys::HAS_COMPLETED_ONBOARDING, "true")
            .await
            .unwrap();
        store.set(keys::ONBOARDING_STEP, "4").await.unwrap();
        store.set(keys::MY_XP, "600").await.unwrap();
        store.set(keys::MY_LEVEL, "2").await.unwrap();

        let snap = Snapshot::load(&store).await;
        assert!(snap.has_completed_onboarding);
        assert_eq!(snap.onboarding_step, 4);
        assert_eq!(snap.xp, 600);
        assert_eq!(snap.level, 2);
    }

    #[tokio::test]
    async fn anything_but_true_is_false() {
        let store = MemoryStore::new();
        store
            .set(keys::HAS_COMPLETED_ONBOARDING, "yes")
            .await
            .unwrap();
        let snap = Snapshot::load(&store).await;
        assert!(!snap.has_completed_onboarding);
    }
}

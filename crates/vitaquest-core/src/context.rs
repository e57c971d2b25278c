//! The process-wide state store.
//!
//! [`StorageContext`] composes every entity cell with the XP/level engine,
//! tip engagement scoring, and the persistence queue behind one read/write
//! surface. It is an explicit, constructible object -- the backend is
//! injected at construction so tests build isolated instances.
//!
//! Mutation model: setters resolve the new value against the in-memory
//! cell synchronously (in-memory state is the source of truth for the
//! running process), then hand the serialized form to the write queue
//! without awaiting it. The persisted copy is a best-effort mirror read
//! only at next startup.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::error::StorageError;
use crate::events::{Notification, NotificationQueue};
use crate::model::{
    ActiveGoal, FinishedGoal, PlanBook, SupplementTime, TakenDates, TipRef, TipViewRecord, Verdict,
};
use crate::nutrition::{DailyNutritionSummary, MealNutrition, NutrientGoals, NutrientTotals, NutritionDays};
use crate::progress::{self, GoalDuration, GoalProgress};
use crate::storage::kv::{keys, KeyValueStore};
use crate::storage::{Snapshot, WriteQueue};
use crate::tips;
use crate::xp::LevelTable;

/// New value for a cell: either the value itself or a function of the
/// previous value.
pub enum Update<T> {
    Value(T),
    With(Box<dyn FnOnce(&T) -> T + Send>),
}

impl<T> Update<T> {
    pub fn value(value: T) -> Self {
        Update::Value(value)
    }

    pub fn with<F>(f: F) -> Self
    where
        F: FnOnce(&T) -> T + Send + 'static,
    {
        Update::With(Box::new(f))
    }

    fn resolve(self, current: &T) -> T {
        match self {
            Update::Value(value) => value,
            Update::With(f) => f(current),
        }
    }
}

/// One entity's in-memory cell plus its persistence wiring.
struct Cell<T> {
    key: &'static str,
    value: Mutex<T>,
    encode: fn(&T) -> String,
}

impl<T: Clone> Cell<T> {
    fn new(key: &'static str, initial: T, encode: fn(&T) -> String) -> Self {
        Self {
            key,
            value: Mutex::new(initial),
            encode,
        }
    }

    fn get(&self) -> T {
        self.value.lock().unwrap().clone()
    }

    /// Replace the in-memory value without persisting (snapshot hydration).
    fn hydrate(&self, value: T) {
        *self.value.lock().unwrap() = value;
    }

    /// Resolve and apply an update, then queue the durable write.
    /// Returns `(previous, new)`.
    fn set(&self, update: Update<T>, queue: &WriteQueue) -> (T, T) {
        let mut guard = self.value.lock().unwrap();
        let previous = guard.clone();
        let next = update.resolve(&guard);
        *guard = next.clone();
        queue.enqueue(self.key, (self.encode)(&guard));
        (previous, next)
    }

    /// Mutate in place under the lock, then queue the durable write.
    fn mutate<R>(&self, queue: &WriteQueue, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.value.lock().unwrap();
        let out = f(&mut guard);
        queue.enqueue(self.key, (self.encode)(&guard));
        out
    }
}

fn encode_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to serialize entity; persisting empty value");
        String::new()
    })
}

fn encode_string<T: ToString>(value: &T) -> String {
    value.to_string()
}

/// Aggregate read/write surface over every persisted entity.
pub struct StorageContext {
    store: Arc<dyn KeyValueStore>,
    queue: WriteQueue,
    initialized: AtomicBool,
    notifications: NotificationQueue,
    level_table: LevelTable,
    nutrient_goals: NutrientGoals,

    plans: Cell<PlanBook>,
    taken_dates: Cell<TakenDates>,
    my_goals: Cell<Vec<String>>,
    active_goals: Cell<Vec<ActiveGoal>>,
    finished_goals: Cell<Vec<FinishedGoal>>,
    has_completed_onboarding: Cell<bool>,
    onboarding_step: Cell<u32>,
    xp: Cell<i64>,
    level: Cell<u32>,
    tip_views: Cell<Vec<TipViewRecord>>,
    nutrition: Cell<NutritionDays>,
}

impl StorageContext {
    /// Build an uninitialized context with default state.
    ///
    /// Call [`initialize`](Self::initialize) to hydrate from the backend;
    /// reads before that return provisional defaults.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, &Config::default())
    }

    /// Build a context using configured nutrient goals.
    pub fn with_config(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        let queue = WriteQueue::new(Arc::clone(&store));
        let defaults = Snapshot::default();
        Self {
            store,
            queue,
            initialized: AtomicBool::new(false),
            notifications: NotificationQueue::default(),
            level_table: LevelTable::default(),
            nutrient_goals: config.nutrition.goals(),
            plans: Cell::new(keys::PLANS, defaults.plans, encode_json::<PlanBook>),
            taken_dates: Cell::new(keys::TAKEN_DATES, defaults.taken_dates, encode_json::<TakenDates>),
            my_goals: Cell::new(keys::MY_GOALS, defaults.my_goals, encode_json::<Vec<String>>),
            active_goals: Cell::new(
                keys::ACTIVE_GOALS,
                defaults.active_goals,
                encode_json::<Vec<ActiveGoal>>,
            ),
            finished_goals: Cell::new(
                keys::FINISHED_GOALS,
                defaults.finished_goals,
                encode_json::<Vec<FinishedGoal>>,
            ),
            has_completed_onboarding: Cell::new(
                keys::HAS_COMPLETED_ONBOARDING,
                defaults.has_completed_onboarding,
                encode_string::<bool>,
            ),
            onboarding_step: Cell::new(
                keys::ONBOARDING_STEP,
                defaults.onboarding_step,
                encode_string::<u32>,
            ),
            xp: Cell::new(keys::MY_XP, defaults.xp, encode_string::<i64>),
            level: Cell::new(keys::MY_LEVEL, defaults.level, encode_string::<u32>),
            tip_views: Cell::new(
                keys::TIP_VIEWS,
                defaults.tip_views,
                encode_json::<Vec<TipViewRecord>>,
            ),
            nutrition: Cell::new(
                keys::DAILY_NUTRITION_SUMMARY,
                defaults.nutrition,
                encode_json::<NutritionDays>,
            ),
        }
    }

    /// Replace the level threshold table (before first use).
    pub fn with_level_table(mut self, table: LevelTable) -> Self {
        self.level_table = table;
        self
    }

    /// Hydrate every cell from the backend snapshot.
    ///
    /// Always completes: read or parse failures degrade individual
    /// entities to their defaults. Flips `is_initialized` afterwards.
    pub async fn initialize(&self) {
        let snapshot = Snapshot::load(self.store.as_ref()).await;
        self.plans.hydrate(snapshot.plans);
        self.taken_dates.hydrate(snapshot.taken_dates);
        self.my_goals.hydrate(snapshot.my_goals);
        self.active_goals.hydrate(snapshot.active_goals);
        self.finished_goals.hydrate(snapshot.finished_goals);
        self.has_completed_onboarding
            .hydrate(snapshot.has_completed_onboarding);
        self.onboarding_step.hydrate(snapshot.onboarding_step);
        self.xp.hydrate(snapshot.xp);
        self.level.hydrate(snapshot.level);
        self.tip_views.hydrate(snapshot.tip_views);
        self.nutrition.hydrate(snapshot.nutrition);
        self.initialized.store(true, Ordering::SeqCst);
    }

    /// Whether the startup snapshot has been applied. Reads before this
    /// returns `true` see provisional defaults.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Wait until every queued persistence write has settled.
    pub async fn flush(&self) {
        self.queue.flush().await;
    }

    /// Reset all state to defaults and wipe the backend.
    ///
    /// # Errors
    /// Returns an error if the backend clear fails; in-memory state is
    /// reset regardless.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        let defaults = Snapshot::default();
        self.plans.hydrate(defaults.plans);
        self.taken_dates.hydrate(defaults.taken_dates);
        self.my_goals.hydrate(defaults.my_goals);
        self.active_goals.hydrate(defaults.active_goals);
        self.finished_goals.hydrate(defaults.finished_goals);
        self.has_completed_onboarding
            .hydrate(defaults.has_completed_onboarding);
        self.onboarding_step.hydrate(defaults.onboarding_step);
        self.xp.hydrate(defaults.xp);
        self.level.hydrate(defaults.level);
        self.tip_views.hydrate(defaults.tip_views);
        self.nutrition.hydrate(defaults.nutrition);
        while self.notifications.poll().is_some() {}
        self.queue.flush().await;
        self.store.clear().await
    }

    // --- plans ---

    pub fn plans(&self) -> PlanBook {
        self.plans.get()
    }

    pub fn set_plans(&self, update: Update<PlanBook>) -> PlanBook {
        self.plans.set(update, &self.queue).1
    }

    // --- taken dates ---

    pub fn taken_dates(&self) -> TakenDates {
        self.taken_dates.get()
    }

    pub fn set_taken_dates(&self, update: Update<TakenDates>) -> TakenDates {
        self.taken_dates.set(update, &self.queue).1
    }

    /// Record an intake for a calendar date (`YYYY-MM-DD`).
    pub fn add_taken(&self, date: &str, intake: SupplementTime) {
        self.taken_dates.mutate(&self.queue, |dates| {
            dates.entry(date.to_string()).or_default().push(intake);
        });
    }

    // --- focus areas ---

    pub fn my_goals(&self) -> Vec<String> {
        self.my_goals.get()
    }

    pub fn set_my_goals(&self, update: Update<Vec<String>>) -> Vec<String> {
        self.my_goals.set(update, &self.queue).1
    }

    // --- active / finished goals ---

    pub fn active_goals(&self) -> Vec<ActiveGoal> {
        self.active_goals.get()
    }

    pub fn finished_goals(&self) -> Vec<FinishedGoal> {
        self.finished_goals.get()
    }

    /// Start a goal, replacing any active entry for the same main goal.
    pub fn start_goal(&self, main_goal_id: &str, goal_id: &str) -> ActiveGoal {
        let goal = ActiveGoal {
            main_goal_id: main_goal_id.to_string(),
            goal_id: goal_id.to_string(),
            started_at: Utc::now(),
        };
        let entry = goal.clone();
        self.active_goals.mutate(&self.queue, move |goals| {
            goals.retain(|g| g.main_goal_id != entry.main_goal_id);
            goals.push(entry);
        });
        goal
    }

    /// Complete a goal: append to the finished list and drop the active
    /// entry. Finished goals are append-only and never mutated afterward.
    pub fn finish_goal(&self, main_goal_id: &str, goal_id: &str) -> FinishedGoal {
        self.active_goals.mutate(&self.queue, |goals| {
            goals.retain(|g| !(g.main_goal_id == main_goal_id && g.goal_id == goal_id));
        });
        let finished = FinishedGoal {
            main_goal_id: main_goal_id.to_string(),
            goal_id: goal_id.to_string(),
            finished: Utc::now(),
        };
        let entry = finished.clone();
        self.finished_goals.mutate(&self.queue, move |goals| {
            goals.push(entry);
        });
        finished
    }

    /// Progress of the active goal under `main_goal_id`, if any.
    pub fn progress_for(&self, main_goal_id: &str, duration: GoalDuration) -> Option<GoalProgress> {
        self.active_goals
            .get()
            .iter()
            .find(|g| g.main_goal_id == main_goal_id)
            .map(|g| progress::progress(g.started_at, duration))
    }

    // --- onboarding ---

    pub fn has_completed_onboarding(&self) -> bool {
        self.has_completed_onboarding.get()
    }

    pub fn set_has_completed_onboarding(&self, done: bool) {
        self.has_completed_onboarding
            .set(Update::value(done), &self.queue);
    }

    pub fn onboarding_step(&self) -> u32 {
        self.onboarding_step.get()
    }

    pub fn set_onboarding_step(&self, update: Update<u32>) -> u32 {
        self.onboarding_step.set(update, &self.queue).1
    }

    // --- XP / level ---

    pub fn xp(&self) -> i64 {
        self.xp.get()
    }

    pub fn level(&self) -> u32 {
        self.level.get()
    }

    pub fn level_table(&self) -> &LevelTable {
        &self.level_table
    }

    /// Set XP and re-derive the level.
    ///
    /// Crossing a threshold upward persists the new level and raises a
    /// one-shot [`Notification::LevelUp`]. A stored level that merely
    /// drifted from the derived one (XP decreased, stale state) is
    /// corrected silently.
    pub fn set_xp(&self, update: Update<i64>) -> i64 {
        let (previous, next) = self.xp.set(update, &self.queue);
        let old_level = self.level_table.level_for(previous);
        let new_level = self.level_table.level_for(next);
        if new_level > old_level {
            self.level.set(Update::value(new_level), &self.queue);
            self.notifications.push(Notification::LevelUp {
                level: new_level,
                at: Utc::now(),
            });
        } else if new_level != self.level.get() {
            self.level.set(Update::value(new_level), &self.queue);
        }
        next
    }

    /// Add a (possibly negative) XP delta.
    pub fn add_xp(&self, delta: i64) -> i64 {
        self.set_xp(Update::with(move |xp| xp + delta))
    }

    /// Take the oldest pending notification, if any. Each notification
    /// is delivered exactly once.
    pub fn poll_notification(&self) -> Option<Notification> {
        self.notifications.poll()
    }

    // --- tip engagement ---

    pub fn tip_views(&self) -> Vec<TipViewRecord> {
        self.tip_views.get()
    }

    /// Record a tip view; awards XP only for the first view.
    /// Returns the XP granted by this call.
    pub fn add_tip_view(&self, tip: &TipRef) -> i64 {
        let granted = self
            .tip_views
            .mutate(&self.queue, |records| tips::record_view(records, tip));
        if granted > 0 {
            self.add_xp(granted);
        }
        granted
    }

    /// Record a suggested question being asked; awards XP only the first
    /// time each question key is seen for the tip.
    pub fn increment_tip_chat(&self, tip: &TipRef, question_key: &str) -> i64 {
        let granted = self.tip_views.mutate(&self.queue, |records| {
            tips::record_question(records, tip, question_key)
        });
        if granted > 0 {
            self.add_xp(granted);
        }
        granted
    }

    /// Set or overwrite a tip verdict; awards XP only on the first
    /// verdict ever given for the tip.
    pub fn set_tip_verdict(&self, tip: &TipRef, verdict: Verdict) -> i64 {
        let granted = self.tip_views.mutate(&self.queue, |records| {
            tips::record_verdict(records, tip, verdict)
        });
        if granted > 0 {
            self.add_xp(granted);
        }
        granted
    }

    /// Award per-message chat XP in a tip's context. Every call awards.
    pub fn add_chat_message_xp(&self, tip: &TipRef) -> i64 {
        let granted = self
            .tip_views
            .mutate(&self.queue, |records| tips::record_chat_message(records, tip));
        self.add_xp(granted);
        granted
    }

    // --- nutrition ---

    pub fn nutrition_days(&self) -> NutritionDays {
        self.nutrition.get()
    }

    pub fn nutrient_goals(&self) -> NutrientGoals {
        self.nutrient_goals
    }

    /// The summary for a date, if any meals were logged.
    pub fn daily_summary(&self, date: &str) -> Option<DailyNutritionSummary> {
        self.nutrition.get().get(date).cloned()
    }

    /// Log a meal for a date and return the day's new totals.
    pub fn log_meal(&self, date: &str, meal: MealNutrition) -> NutrientTotals {
        self.nutrition.mutate(&self.queue, |days| {
            let day = days
                .entry(date.to_string())
                .or_insert_with(|| DailyNutritionSummary::new(date));
            day.meals.push(meal);
            day.totals()
        })
    }

    /// Remove a logged meal by index. Returns `false` if the date or
    /// index does not exist.
    pub fn remove_meal(&self, date: &str, index: usize) -> bool {
        self.nutrition.mutate(&self.queue, |days| {
            if let Some(day) = days.get_mut(date) {
                if index < day.meals.len() {
                    day.meals.remove(index);
                    return true;
                }
            }
            false
        })
    }
}

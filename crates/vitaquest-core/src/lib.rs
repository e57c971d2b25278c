//! # VitaQuest Core Library
//!
//! This library provides the persistent state core for VitaQuest, a
//! gamified personal-health tracker: users pick focus areas, follow tips
//! (timed micro-interventions), log supplements and meals, and earn XP
//! that unlocks levels. All operations are available via a standalone CLI
//! binary; GUI surfaces are thin layers over the same core library.
//!
//! ## Architecture
//!
//! - **Storage**: a string-keyed key-value backend (SQLite), a startup
//!   snapshot loader, and a per-key write queue that keeps fire-and-forget
//!   persistence ordered
//! - **StorageContext**: the aggregate read/write surface composing every
//!   entity cell with the derivation engines
//! - **Engines**: XP-to-level derivation, goal progress, tip engagement
//!   scoring
//! - **Analysis**: client for the remote analysis/chat service
//!
//! ## Key Components
//!
//! - [`StorageContext`]: process-wide state store
//! - [`KeyValueStore`]: persistence backend trait
//! - [`LevelTable`]: XP threshold table
//! - [`Config`]: application configuration management

pub mod analysis;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod model;
pub mod nutrition;
pub mod progress;
pub mod storage;
pub mod tips;
pub mod xp;

pub use analysis::{AnalysisClient, ImageSource, MatchResult};
pub use config::Config;
pub use context::{StorageContext, Update};
pub use error::{AnalysisError, CoreError, StorageError, ValidationError};
pub use events::Notification;
pub use model::{
    ActiveGoal, FinishedGoal, Plan, PlanBook, Supplement, SupplementTime, TakenDates, TipRef,
    TipViewRecord, Verdict,
};
pub use nutrition::{
    DailyNutritionSummary, GoalsMet, MealNutrition, NutrientGoals, NutrientTotals, NutritionDays,
};
pub use progress::{DurationUnit, GoalDuration, GoalProgress, TimeLeft};
pub use storage::{KeyValueStore, MemoryStore, Snapshot, SqliteStore, WriteQueue};
pub use xp::{LevelTable, LevelThreshold};

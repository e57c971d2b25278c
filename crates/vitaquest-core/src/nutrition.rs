//! Daily nutrition summaries and macro tracking.
//!
//! Only the meal list is authoritative: totals and goals-met are derived
//! on read, never stored independently of the meals. The persisted form
//! still writes both derived fields to keep the wire contract stable, and
//! ignores them on the way back in.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Map of date string (`YYYY-MM-DD`) to that day's summary.
pub type NutritionDays = BTreeMap<String, DailyNutritionSummary>;

/// Macro breakdown for a single logged meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealNutrition {
    pub name: String,
    pub protein: f64,
    pub calories: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    pub fiber: f64,
}

/// Componentwise macro sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientTotals {
    pub protein: f64,
    pub calories: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl From<&MealNutrition> for NutrientTotals {
    fn from(meal: &MealNutrition) -> Self {
        Self {
            protein: meal.protein,
            calories: meal.calories,
            carbohydrates: meal.carbohydrates,
            fat: meal.fat,
            fiber: meal.fiber,
        }
    }
}

impl Add for NutrientTotals {
    type Output = NutrientTotals;

    fn add(self, rhs: NutrientTotals) -> NutrientTotals {
        NutrientTotals {
            protein: self.protein + rhs.protein,
            calories: self.calories + rhs.calories,
            carbohydrates: self.carbohydrates + rhs.carbohydrates,
            fat: self.fat + rhs.fat,
            fiber: self.fiber + rhs.fiber,
        }
    }
}

impl AddAssign for NutrientTotals {
    fn add_assign(&mut self, rhs: NutrientTotals) {
        *self = *self + rhs;
    }
}

/// Daily macro thresholds a day's totals are judged against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientGoals {
    pub protein: f64,
    pub calories: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl Default for NutrientGoals {
    fn default() -> Self {
        Self {
            protein: 50.0,
            calories: 2000.0,
            carbohydrates: 130.0,
            fat: 70.0,
            fiber: 25.0,
        }
    }
}

impl NutrientGoals {
    /// Componentwise `total >= threshold`.
    pub fn met(&self, totals: &NutrientTotals) -> GoalsMet {
        GoalsMet {
            protein: totals.protein >= self.protein,
            calories: totals.calories >= self.calories,
            carbohydrates: totals.carbohydrates >= self.carbohydrates,
            fat: totals.fat >= self.fat,
            fiber: totals.fiber >= self.fiber,
        }
    }
}

/// Which macro goals a day's totals satisfy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsMet {
    pub protein: bool,
    pub calories: bool,
    pub carbohydrates: bool,
    pub fat: bool,
    pub fiber: bool,
}

/// One calendar day's logged meals.
///
/// Totals and goals-met are always recomputed from `meals`; the struct
/// never caches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SummaryRecord", into = "SummaryRecord")]
pub struct DailyNutritionSummary {
    pub date: String,
    pub meals: Vec<MealNutrition>,
}

impl DailyNutritionSummary {
    pub fn new(date: &str) -> Self {
        Self {
            date: date.to_string(),
            meals: Vec::new(),
        }
    }

    /// Componentwise sum of all logged meals.
    pub fn totals(&self) -> NutrientTotals {
        self.meals
            .iter()
            .fold(NutrientTotals::default(), |acc, meal| acc + meal.into())
    }

    pub fn goals_met(&self, goals: &NutrientGoals) -> GoalsMet {
        goals.met(&self.totals())
    }
}

/// Persisted shape of a day summary.
///
/// Carries the derived fields for wire-contract compatibility; on
/// deserialization they are discarded and recomputed from `meals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryRecord {
    date: String,
    #[serde(default)]
    meals: Vec<MealNutrition>,
    #[serde(default)]
    totals: NutrientTotals,
    #[serde(default)]
    goals_met: GoalsMet,
}

impl From<SummaryRecord> for DailyNutritionSummary {
    fn from(record: SummaryRecord) -> Self {
        Self {
            date: record.date,
            meals: record.meals,
        }
    }
}

impl From<DailyNutritionSummary> for SummaryRecord {
    fn from(summary: DailyNutritionSummary) -> Self {
        let totals = summary.totals();
        let goals_met = NutrientGoals::default().met(&totals);
        Self {
            date: summary.date,
            meals: summary.meals,
            totals,
            goals_met,
        }
    }
}

//! Domain types persisted by the state store.
//!
//! Wire shapes use camelCase keys to stay compatible with the persisted
//! JSON contract; dates inside map keys are `YYYY-MM-DD` strings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference data for a supplement, merged into per-plan entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplement {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Supplement {
    /// Create a supplement with a fresh id.
    pub fn new(name: &str, quantity: f64, unit: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            description: None,
        }
    }
}

/// A named, time-of-day-scheduled bundle of supplements.
///
/// Mutated wholesale by plan-editing surfaces; the store never edits
/// individual fields in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub name: String,
    /// Preferred intake time as `HH:MM`.
    pub preferred_time: String,
    pub supplements: Vec<Supplement>,
    pub notify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// All plans grouped by category (the persisted `plans` key).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanBook {
    pub supplement: Vec<Plan>,
    pub training: Vec<Plan>,
    pub nutrition: Vec<Plan>,
    pub other: Vec<Plan>,
}

impl PlanBook {
    /// Total number of plans across all categories.
    pub fn len(&self) -> usize {
        self.supplement.len() + self.training.len() + self.nutrition.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A scheduled intake instance for a specific calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementTime {
    #[serde(flatten)]
    pub supplement: Supplement,
    /// Intake time as `HH:MM`.
    pub time: String,
}

/// Map of date string (`YYYY-MM-DD`) to intakes taken that day.
pub type TakenDates = BTreeMap<String, Vec<SupplementTime>>;

/// A goal the user has started working on.
///
/// At most one active entry per `main_goal_id` is expected; callers
/// replace rather than accumulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveGoal {
    pub main_goal_id: String,
    pub goal_id: String,
    pub started_at: DateTime<Utc>,
}

/// A completed goal. Append-only; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedGoal {
    pub main_goal_id: String,
    pub goal_id: String,
    pub finished: DateTime<Utc>,
}

/// User's qualitative judgment on a tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    Interested,
    NotInterested,
    AlreadyWorks,
}

/// Identifies one tip within one focus area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipRef {
    pub main_goal_id: String,
    pub goal_id: String,
    pub tip_id: String,
}

impl TipRef {
    pub fn new(main_goal_id: &str, goal_id: &str, tip_id: &str) -> Self {
        Self {
            main_goal_id: main_goal_id.to_string(),
            goal_id: goal_id.to_string(),
            tip_id: tip_id.to_string(),
        }
    }
}

/// Per-tip engagement record.
///
/// `asked_questions` has set semantics: a question key appears at most
/// once, and the list only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipViewRecord {
    pub main_goal_id: String,
    pub goal_id: String,
    pub tip_id: String,
    #[serde(default)]
    pub asked_questions: Vec<String>,
    #[serde(default)]
    pub xp_earned: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
}

impl TipViewRecord {
    pub fn new(tip: &TipRef) -> Self {
        Self {
            main_goal_id: tip.main_goal_id.clone(),
            goal_id: tip.goal_id.clone(),
            tip_id: tip.tip_id.clone(),
            asked_questions: Vec::new(),
            xp_earned: 0,
            verdict: None,
        }
    }

    pub fn matches(&self, tip: &TipRef) -> bool {
        self.main_goal_id == tip.main_goal_id
            && self.goal_id == tip.goal_id
            && self.tip_id == tip.tip_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_roundtrip_uses_camel_case() {
        let plan = Plan {
            name: "Morning stack".to_string(),
            preferred_time: "08:30".to_string(),
            supplements: vec![Supplement::new("Magnesium", 400.0, "mg")],
            notify: true,
            reason: Some("sleep quality".to_string()),
        };
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains("\"preferredTime\":\"08:30\""));
        let back: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn plan_book_roundtrip_empty() {
        let book = PlanBook::default();
        let json = serde_json::to_string(&book).unwrap();
        let back: PlanBook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, book);
        assert!(back.is_empty());
    }

    #[test]
    fn supplement_time_flattens_supplement_fields() {
        let st = SupplementTime {
            supplement: Supplement::new("Zinc", 15.0, "mg"),
            time: "21:00".to_string(),
        };
        let json = serde_json::to_value(&st).unwrap();
        assert_eq!(json["name"], "Zinc");
        assert_eq!(json["time"], "21:00");
        let back: SupplementTime = serde_json::from_value(json).unwrap();
        assert_eq!(back, st);
    }

    #[test]
    fn taken_dates_roundtrip() {
        let mut dates = TakenDates::new();
        dates.insert(
            "2024-01-15".to_string(),
            vec![SupplementTime {
                supplement: Supplement::new("Omega-3", 1000.0, "mg"),
                time: "12:00".to_string(),
            }],
        );
        let json = serde_json::to_string(&dates).unwrap();
        let back: TakenDates = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dates);
    }

    #[test]
    fn active_goal_roundtrip() {
        let goal = ActiveGoal {
            main_goal_id: "sleep".to_string(),
            goal_id: "wind-down".to_string(),
            started_at: Utc::now(),
        };
        let json = serde_json::to_string(&goal).unwrap();
        assert!(json.contains("mainGoalId"));
        let back: ActiveGoal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, goal);
    }

    #[test]
    fn tip_view_record_defaults_on_missing_fields() {
        let json = r#"{"mainGoalId":"sleep","goalId":"wind-down","tipId":"t1"}"#;
        let rec: TipViewRecord = serde_json::from_str(json).unwrap();
        assert!(rec.asked_questions.is_empty());
        assert_eq!(rec.xp_earned, 0);
        assert!(rec.verdict.is_none());
    }

    #[test]
    fn verdict_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&Verdict::NotInterested).unwrap(),
            "\"notInterested\""
        );
        assert_eq!(
            serde_json::to_string(&Verdict::AlreadyWorks).unwrap(),
            "\"alreadyWorks\""
        );
    }
}

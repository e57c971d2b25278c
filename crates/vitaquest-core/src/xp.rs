//! XP-to-level derivation.
//!
//! Level is a pure function of XP via an ordered threshold table:
//! the current level is the highest entry whose `required_xp` does not
//! exceed the XP, defaulting to the lowest level below all thresholds.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One row of the level threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelThreshold {
    pub level: u32,
    pub required_xp: i64,
}

/// Ordered ascending threshold table.
///
/// Strict monotonicity (by level and by required XP) is validated once at
/// construction, never at lookup time.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    entries: Vec<LevelThreshold>,
}

impl LevelTable {
    /// Build a table from explicit entries.
    ///
    /// # Errors
    /// Returns an error if the table is empty or any entry fails to be
    /// strictly greater than its predecessor in both level and XP.
    pub fn new(entries: Vec<LevelThreshold>) -> Result<Self, ValidationError> {
        if entries.is_empty() {
            return Err(ValidationError::EmptyLevelTable);
        }
        for pair in entries.windows(2) {
            if pair[1].level <= pair[0].level || pair[1].required_xp <= pair[0].required_xp {
                return Err(ValidationError::NonIncreasingThreshold {
                    level: pair[1].level,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Highest level whose threshold is satisfied by `xp`.
    ///
    /// XP below every threshold maps to the table's lowest level.
    pub fn level_for(&self, xp: i64) -> u32 {
        self.entries
            .iter()
            .rev()
            .find(|t| t.required_xp <= xp)
            .map(|t| t.level)
            .unwrap_or_else(|| self.entries[0].level)
    }

    /// XP required to reach `level`, if the table defines it.
    pub fn required_xp(&self, level: u32) -> Option<i64> {
        self.entries
            .iter()
            .find(|t| t.level == level)
            .map(|t| t.required_xp)
    }

    /// Next threshold above `xp`, or `None` at max level.
    pub fn next_threshold(&self, xp: i64) -> Option<LevelThreshold> {
        self.entries.iter().find(|t| t.required_xp > xp).copied()
    }

    pub fn entries(&self) -> &[LevelThreshold] {
        &self.entries
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        let entries = [
            (1, 0),
            (2, 500),
            (3, 1500),
            (4, 3000),
            (5, 5000),
            (6, 7500),
            (7, 10_500),
            (8, 14_000),
            (9, 18_000),
            (10, 22_500),
        ]
        .into_iter()
        .map(|(level, required_xp)| LevelThreshold { level, required_xp })
        .collect();
        // Known-good ascending table; skips the constructor validation.
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(rows: &[(u32, i64)]) -> LevelTable {
        LevelTable::new(
            rows.iter()
                .map(|&(level, required_xp)| LevelThreshold { level, required_xp })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn lookup_picks_highest_satisfied_threshold() {
        let t = table(&[(1, 0), (2, 500), (3, 1500)]);
        assert_eq!(t.level_for(0), 1);
        assert_eq!(t.level_for(499), 1);
        assert_eq!(t.level_for(500), 2);
        assert_eq!(t.level_for(1499), 2);
        assert_eq!(t.level_for(1500), 3);
        assert_eq!(t.level_for(1_000_000), 3);
    }

    #[test]
    fn xp_below_all_thresholds_defaults_to_lowest_level() {
        let t = table(&[(1, 100), (2, 500)]);
        assert_eq!(t.level_for(0), 1);
        assert_eq!(t.level_for(-50), 1);
    }

    #[test]
    fn empty_table_rejected() {
        assert!(matches!(
            LevelTable::new(Vec::new()),
            Err(ValidationError::EmptyLevelTable)
        ));
    }

    #[test]
    fn non_increasing_xp_rejected() {
        let result = LevelTable::new(vec![
            LevelThreshold { level: 1, required_xp: 0 },
            LevelThreshold { level: 2, required_xp: 0 },
        ]);
        assert!(matches!(
            result,
            Err(ValidationError::NonIncreasingThreshold { level: 2 })
        ));
    }

    #[test]
    fn duplicate_level_rejected() {
        let result = LevelTable::new(vec![
            LevelThreshold { level: 1, required_xp: 0 },
            LevelThreshold { level: 1, required_xp: 500 },
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn next_threshold_reports_upcoming_level() {
        let t = table(&[(1, 0), (2, 500), (3, 1500)]);
        assert_eq!(t.next_threshold(0).unwrap().level, 2);
        assert_eq!(t.next_threshold(600).unwrap().level, 3);
        assert!(t.next_threshold(1500).is_none());
    }

    #[test]
    fn default_table_starts_at_level_one() {
        let t = LevelTable::default();
        assert_eq!(t.level_for(0), 1);
        assert_eq!(t.level_for(500), 2);
        assert_eq!(t.required_xp(3), Some(1500));
    }

    proptest! {
        #[test]
        fn level_is_monotone_in_xp(a in -1000i64..30_000, b in -1000i64..30_000) {
            let t = LevelTable::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(t.level_for(lo) <= t.level_for(hi));
        }

        #[test]
        fn lookup_matches_definition(xp in -1000i64..30_000) {
            let t = LevelTable::default();
            let expected = t
                .entries()
                .iter()
                .filter(|e| e.required_xp <= xp)
                .map(|e| e.level)
                .max()
                .unwrap_or(1);
            prop_assert_eq!(t.level_for(xp), expected);
        }
    }
}

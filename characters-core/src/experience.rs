//! Experience thresholds and level derivation.
//!
//! Cumulative XP required per level for levels 1 through 20, from the 2018
//! Basic Rules table. The table is immutable; the service receives an
//! [`ExperienceTable`] at construction instead of reaching for a global.

/// Highest attainable level.
pub const MAX_LEVEL: i32 = 20;

/// Cumulative XP required to reach each level. Index 0 is level 1.
const LEVEL_THRESHOLDS: [i32; MAX_LEVEL as usize] = [
    0, 300, 900, 2_700, 6_500, 14_000, 23_000, 34_000, 48_000, 64_000, 85_000, 100_000, 120_000,
    140_000, 165_000, 195_000, 225_000, 265_000, 305_000, 355_000,
];

/// Immutable level/XP lookup table.
#[derive(Debug, Clone)]
pub struct ExperienceTable {
    thresholds: [i32; MAX_LEVEL as usize],
}

impl Default for ExperienceTable {
    fn default() -> Self {
        Self {
            thresholds: LEVEL_THRESHOLDS,
        }
    }
}

impl ExperienceTable {
    /// Cumulative XP required to reach `level`. Levels below 1 cost nothing;
    /// levels above 20 clamp to the level 20 threshold.
    pub fn threshold_for_level(&self, level: i32) -> i32 {
        if level < 1 {
            return 0;
        }
        let level = level.min(MAX_LEVEL);
        self.thresholds[(level - 1) as usize]
    }

    /// The highest level whose threshold `experience` meets, scanning from 20
    /// downward. Anything below the level 2 threshold (including negative
    /// totals) is level 1.
    pub fn level_for_experience(&self, experience: i32) -> i32 {
        for level in (1..=MAX_LEVEL).rev() {
            if experience >= self.threshold_for_level(level) {
                return level;
            }
        }
        1
    }

    /// Whether a total of `total_experience` puts a character strictly above
    /// `current_level`.
    pub fn has_leveled_up(&self, current_level: i32, total_experience: i32) -> bool {
        self.level_for_experience(total_experience) > current_level
    }

    /// XP between the current level's threshold and the next one. 0 at max
    /// level.
    pub fn experience_to_next_level(&self, current_level: i32) -> i32 {
        if current_level >= MAX_LEVEL {
            return 0;
        }
        self.threshold_for_level(current_level + 1) - self.threshold_for_level(current_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_match_the_basic_rules_table() {
        let table = ExperienceTable::default();
        assert_eq!(table.threshold_for_level(1), 0);
        assert_eq!(table.threshold_for_level(2), 300);
        assert_eq!(table.threshold_for_level(5), 6_500);
        assert_eq!(table.threshold_for_level(12), 100_000);
        assert_eq!(table.threshold_for_level(20), 355_000);
    }

    #[test]
    fn threshold_clamps_out_of_range_levels() {
        let table = ExperienceTable::default();
        assert_eq!(table.threshold_for_level(0), 0);
        assert_eq!(table.threshold_for_level(-3), 0);
        assert_eq!(table.threshold_for_level(21), table.threshold_for_level(20));
    }

    #[test]
    fn thresholds_are_monotonically_increasing() {
        let table = ExperienceTable::default();
        for level in 2..=MAX_LEVEL {
            assert!(
                table.threshold_for_level(level) > table.threshold_for_level(level - 1),
                "threshold for level {level} should exceed level {}",
                level - 1
            );
        }
    }

    #[test]
    fn level_for_threshold_roundtrips() {
        let table = ExperienceTable::default();
        for level in 1..=MAX_LEVEL {
            let threshold = table.threshold_for_level(level);
            assert_eq!(table.level_for_experience(threshold), level);
            if level > 1 {
                assert!(table.level_for_experience(threshold - 1) < level);
            }
        }
    }

    #[test]
    fn negative_experience_is_level_one() {
        let table = ExperienceTable::default();
        assert_eq!(table.level_for_experience(-500), 1);
        assert_eq!(table.level_for_experience(0), 1);
        assert_eq!(table.level_for_experience(299), 1);
    }

    #[test]
    fn experience_past_the_cap_is_level_twenty() {
        let table = ExperienceTable::default();
        assert_eq!(table.level_for_experience(355_000), 20);
        assert_eq!(table.level_for_experience(1_000_000), 20);
    }

    #[test]
    fn has_leveled_up_requires_strict_increase() {
        let table = ExperienceTable::default();
        assert!(table.has_leveled_up(1, 300));
        assert!(!table.has_leveled_up(2, 300));
        assert!(!table.has_leveled_up(5, 300));
        assert!(!table.has_leveled_up(20, 1_000_000));
    }

    #[test]
    fn experience_to_next_level_is_the_threshold_gap() {
        let table = ExperienceTable::default();
        assert_eq!(table.experience_to_next_level(1), 300);
        assert_eq!(table.experience_to_next_level(2), 600);
        assert_eq!(table.experience_to_next_level(19), 50_000);
        assert_eq!(table.experience_to_next_level(20), 0);
        assert_eq!(table.experience_to_next_level(25), 0);
    }
}

use crate::domain::AchievementKind;

use super::condition::{CATEGORY_MASTERED, DAILY_STREAK, TRICKS_LEARNED, TRICKS_SUGGESTED};

/// Built-in achievement definition inserted at startup.
#[derive(Debug, Clone, Copy)]
pub struct DefaultAchievement {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub kind: AchievementKind,
    pub condition_type: &'static str,
    pub condition_value: Option<i32>,
    /// Category for `category_mastered` definitions.
    pub category: Option<&'static str>,
    pub points: i32,
    pub badge_color: &'static str,
}

const fn learned(
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    count: i32,
    points: i32,
    badge_color: &'static str,
) -> DefaultAchievement {
    DefaultAchievement {
        name,
        description,
        icon,
        kind: AchievementKind::Learning,
        condition_type: TRICKS_LEARNED,
        condition_value: Some(count),
        category: None,
        points,
        badge_color,
    }
}

const fn mastered(
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: &'static str,
    badge_color: &'static str,
) -> DefaultAchievement {
    DefaultAchievement {
        name,
        description,
        icon,
        kind: AchievementKind::Category,
        condition_type: CATEGORY_MASTERED,
        condition_value: None,
        category: Some(category),
        points: 200,
        badge_color,
    }
}

const fn streak(
    name: &'static str,
    description: &'static str,
    days: i32,
    points: i32,
    badge_color: &'static str,
) -> DefaultAchievement {
    DefaultAchievement {
        name,
        description,
        icon: if days < 7 { "📅" } else { "🔥" },
        kind: AchievementKind::Streak,
        condition_type: DAILY_STREAK,
        condition_value: Some(days),
        category: None,
        points,
        badge_color,
    }
}

const fn suggested(
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    count: i32,
    points: i32,
    badge_color: &'static str,
) -> DefaultAchievement {
    DefaultAchievement {
        name,
        description,
        icon,
        kind: AchievementKind::Social,
        condition_type: TRICKS_SUGGESTED,
        condition_value: Some(count),
        category: None,
        points,
        badge_color,
    }
}

pub const FIRST_STEPS: &str = "First Steps";
pub const NEWCOMER: &str = "Newcomer";

pub const DEFAULT_ACHIEVEMENTS: &[DefaultAchievement] = &[
    learned(FIRST_STEPS, "Learn your first trick", "🎯", 1, 10, "#10B981"),
    learned(NEWCOMER, "Learn 5 tricks", "🌟", 5, 50, "#3B82F6"),
    learned("Progressor", "Learn 10 tricks", "⚡", 10, 100, "#8B5CF6"),
    learned("Master", "Learn 25 tricks", "🔥", 25, 250, "#F59E0B"),
    learned("Legend", "Learn 50 tricks", "👑", 50, 500, "#DC2626"),
    mastered("Spinner", "Master every spin", "🌀", "spins", "#06B6D4"),
    mastered("Acrobat", "Master every flip", "🤸", "flips", "#EF4444"),
    mastered("Grab Master", "Master every grab", "✋", "grabs", "#84CC16"),
    mastered("Jibber", "Master every rail trick", "🛤️", "jibbing", "#A855F7"),
    streak("Motivated", "Learn tricks 3 days in a row", 3, 75, "#F97316"),
    streak("Consistency", "Learn tricks 7 days in a row", 7, 150, "#DC2626"),
    suggested("Contributor", "Suggest your first trick", "💡", 1, 100, "#6366F1"),
    suggested("Creator", "Suggest 5 tricks", "🚀", 5, 300, "#8B5CF6"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::Condition;
    use crate::achievements::condition::category_payload;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = DEFAULT_ACHIEVEMENTS.iter().map(|a| a.name).collect();
        assert_eq!(names.len(), DEFAULT_ACHIEVEMENTS.len());
    }

    #[test]
    fn every_default_is_recognized() {
        for def in DEFAULT_ACHIEVEMENTS {
            let data = def.category.map(category_payload);
            let condition = Condition::parse(def.condition_type, def.condition_value, data.as_deref());
            assert!(condition.is_recognized(), "{} does not decode", def.name);
        }
    }

    #[test]
    fn covers_all_four_condition_families() {
        let types: HashSet<_> = DEFAULT_ACHIEVEMENTS
            .iter()
            .map(|a| a.condition_type)
            .collect();
        assert_eq!(types.len(), 4);
    }
}

use serde::Deserialize;

pub const TRICKS_LEARNED: &str = "tricks_learned";
pub const CATEGORY_MASTERED: &str = "category_mastered";
pub const DAILY_STREAK: &str = "daily_streak";
pub const TRICKS_SUGGESTED: &str = "tricks_suggested";

/// Unlock condition of an achievement definition.
///
/// Decoded from the stored `condition_type` / `condition_value` /
/// `condition_data` triple. Anything that cannot be decoded (unknown type,
/// missing threshold, unreadable or empty payload) becomes
/// [`Condition::Unrecognized`], which never holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Total tricks learned ≥ threshold.
    TricksLearned(i64),
    /// Every trick of the category learned; an empty category never counts.
    CategoryMastered(String),
    /// Consecutive days ending today with a learned trick ≥ threshold.
    DailyStreak(i64),
    /// Suggestions authored ≥ threshold.
    TricksSuggested(i64),
    Unrecognized(String),
}

#[derive(Debug, Default, Deserialize)]
struct ConditionData {
    category: Option<String>,
}

impl Condition {
    #[must_use]
    pub fn parse(condition_type: &str, value: Option<i32>, data: Option<&str>) -> Self {
        let threshold = value.map(i64::from);

        match (condition_type, threshold) {
            (TRICKS_LEARNED, Some(n)) => Self::TricksLearned(n),
            (DAILY_STREAK, Some(n)) => Self::DailyStreak(n),
            (TRICKS_SUGGESTED, Some(n)) => Self::TricksSuggested(n),
            (CATEGORY_MASTERED, _) => match category_of(data) {
                Some(category) => Self::CategoryMastered(category),
                None => Self::Unrecognized(condition_type.to_string()),
            },
            _ => Self::Unrecognized(condition_type.to_string()),
        }
    }

    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Stored `condition_type` for this condition.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::TricksLearned(_) => TRICKS_LEARNED,
            Self::CategoryMastered(_) => CATEGORY_MASTERED,
            Self::DailyStreak(_) => DAILY_STREAK,
            Self::TricksSuggested(_) => TRICKS_SUGGESTED,
            Self::Unrecognized(name) => name,
        }
    }
}

fn category_of(data: Option<&str>) -> Option<String> {
    let raw = data?;
    let parsed: ConditionData = serde_json::from_str(raw).unwrap_or_default();
    parsed
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Encodes a category payload the way definitions store it.
#[must_use]
pub fn category_payload(category: &str) -> String {
    serde_json::json!({ "category": category }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_threshold_conditions() {
        assert_eq!(
            Condition::parse("tricks_learned", Some(5), None),
            Condition::TricksLearned(5)
        );
        assert_eq!(
            Condition::parse("daily_streak", Some(3), None),
            Condition::DailyStreak(3)
        );
        assert_eq!(
            Condition::parse("tricks_suggested", Some(1), Some("{}")),
            Condition::TricksSuggested(1)
        );
    }

    #[test]
    fn parses_category_payload() {
        assert_eq!(
            Condition::parse("category_mastered", None, Some(r#"{"category":"spins"}"#)),
            Condition::CategoryMastered("spins".to_string())
        );
    }

    #[test]
    fn malformed_payload_fails_closed() {
        for data in [None, Some(""), Some("not json"), Some("{}"), Some(r#"{"category":""}"#)] {
            let condition = Condition::parse("category_mastered", None, data);
            assert!(!condition.is_recognized(), "payload {data:?}");
        }
    }

    #[test]
    fn missing_threshold_fails_closed() {
        assert!(!Condition::parse("tricks_learned", None, None).is_recognized());
    }

    #[test]
    fn unknown_type_is_unrecognized() {
        let condition = Condition::parse("tricks_shared", Some(3), None);
        assert_eq!(condition, Condition::Unrecognized("tricks_shared".to_string()));
        assert_eq!(condition.type_name(), "tricks_shared");
    }

    #[test]
    fn category_payload_round_trips_through_parse() {
        let payload = category_payload("jibbing");
        assert_eq!(
            Condition::parse(CATEGORY_MASTERED, None, Some(&payload)),
            Condition::CategoryMastered("jibbing".to_string())
        );
    }
}

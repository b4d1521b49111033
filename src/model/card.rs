use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Card priority. Declaration order is sort order: `high` sorts before
/// `medium` sorts before `low`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Parse a frontmatter value. Anything but the three known strings is
    /// `None` (callers coerce to the default).
    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One checklist entry. No identity of its own — addressed by its 1-based
/// position within the card's checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    pub checked: bool,
}

/// A single task card, stored as `<column>/<id>.md` under the board root.
///
/// `id` and `column` mirror the file path — they come from the filename and
/// directory at load time, never from the file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Derived from the title at creation, immutable afterwards
    pub id: String,
    pub title: String,
    pub priority: Priority,
    /// Insertion order preserved, duplicates kept
    pub labels: Vec<String>,
    /// Reserved: round-tripped through the file format, never validated
    pub dependencies: Vec<String>,
    /// ISO-8601, set once at creation
    pub created: String,
    /// Stamped by every mutating operation; absent on a never-modified card
    pub updated: Option<String>,
    pub description: String,
    pub checklist: Vec<ChecklistItem>,
    /// Name of the column directory currently holding the card
    pub column: String,
    /// Manual position within the card's (column, priority) group
    pub rank: Option<usize>,
}

impl Card {
    /// A fresh card: `created` stamped now, everything else empty.
    pub fn new(id: String, title: String, priority: Priority, column: String) -> Self {
        Card {
            id,
            title,
            priority,
            labels: Vec::new(),
            dependencies: Vec::new(),
            created: now_timestamp(),
            updated: None,
            description: String::new(),
            checklist: Vec::new(),
            column,
            rank: None,
        }
    }
}

/// Current instant as a full ISO-8601 timestamp. Lexicographic order on
/// these strings is chronological.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Derive a card id from its title: lowercase, keep letters, digits and
/// hyphens, collapse whitespace runs to single hyphens, cap at 50
/// characters. An id is derived exactly once, at creation.
pub fn derive_id(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(50)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_id_basic() {
        assert_eq!(derive_id("Build login page"), "build-login-page");
    }

    #[test]
    fn test_derive_id_strips_punctuation() {
        assert_eq!(derive_id("Fix: the #1 bug!"), "fix-the-1-bug");
    }

    #[test]
    fn test_derive_id_keeps_existing_hyphens() {
        assert_eq!(derive_id("re-run CI"), "re-run-ci");
    }

    #[test]
    fn test_derive_id_collapses_whitespace() {
        assert_eq!(derive_id("  a   b\tc  "), "a-b-c");
    }

    #[test]
    fn test_derive_id_truncates_to_50() {
        let id = derive_id(&"a".repeat(80));
        assert_eq!(id.len(), 50);
    }

    #[test]
    fn test_derive_id_empty_for_symbol_only_title() {
        assert_eq!(derive_id("???"), "");
        assert_eq!(derive_id(""), "");
    }

    #[test]
    fn test_priority_sort_order() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
    }

    #[test]
    fn test_priority_parse_rejects_unknown() {
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::parse("HIGH"), None);
        assert_eq!(Priority::parse("low"), Some(Priority::Low));
    }

    #[test]
    fn test_now_timestamp_shape() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(ts.contains('T'));
    }

    #[test]
    fn test_new_card_is_pristine() {
        let card = Card::new("x".into(), "X".into(), Priority::High, "todo".into());
        assert!(!card.created.is_empty());
        assert_eq!(card.updated, None);
        assert_eq!(card.rank, None);
        assert!(card.labels.is_empty());
        assert!(card.checklist.is_empty());
    }
}

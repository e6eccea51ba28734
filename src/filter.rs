// Completion filters and sort orders for task queries

use std::cmp::Ordering;
use std::str::FromStr;

use eyre::eyre;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::task::Task;

/// Which tasks pass the completion filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Active, StatusFilter::Completed];

    /// Whether `task` passes this filter
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }

    /// Display label for the filter control
    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Active => write!(f, "active"),
            StatusFilter::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            other => Err(eyre!("Unknown filter: {} (expected all, active or completed)", other)),
        }
    }
}

/// Ordering applied to the filtered tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Alphabetical,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Newest, SortOrder::Oldest, SortOrder::Alphabetical];

    /// Compare two tasks under this order
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortOrder::Newest => b.created_at.cmp(&a.created_at),
            SortOrder::Oldest => a.created_at.cmp(&b.created_at),
            SortOrder::Alphabetical => locale_cmp(&a.title, &b.title),
        }
    }

    /// Display label for the sort control
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest",
            SortOrder::Oldest => "Oldest",
            SortOrder::Alphabetical => "A-Z",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Newest => write!(f, "newest"),
            SortOrder::Oldest => write!(f, "oldest"),
            SortOrder::Alphabetical => write!(f, "alphabetical"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "alphabetical" | "alpha" | "a-z" => Ok(SortOrder::Alphabetical),
            other => Err(eyre!("Unknown sort: {} (expected newest, oldest or alphabetical)", other)),
        }
    }
}

/// Human-oriented string comparison
///
/// Letters compare on their base form first, ignoring accents and case, so
/// "apple" sorts before "Banana" and "Éclair" before "Zoo". Strings equal
/// on base letters compare accented after unaccented, then lowercase before
/// uppercase, then plain code point order.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let primary = base_letters(a).cmp(base_letters(b));
    if primary != Ordering::Equal {
        return primary;
    }

    let accents = a
        .nfd()
        .flat_map(char::to_lowercase)
        .cmp(b.nfd().flat_map(char::to_lowercase));
    if accents != Ordering::Equal {
        return accents;
    }

    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            // lowercase before uppercase, as in common collations
            match (ca.is_lowercase(), cb.is_lowercase()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => return ca.cmp(&cb),
            }
        }
    }
    a.len().cmp(&b.len())
}

/// Decomposed, lowercased characters with combining marks dropped
fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(id: i64, title: &str, completed: bool) -> Task {
        let mut t = Task::new(id, title, "", Utc.timestamp_millis_opt(id).unwrap());
        t.completed = completed;
        t
    }

    #[test]
    fn test_status_filter_matches() {
        let open = task(1, "A", false);
        let done = task(2, "B", true);

        assert!(StatusFilter::All.matches(&open));
        assert!(StatusFilter::All.matches(&done));
        assert!(StatusFilter::Active.matches(&open));
        assert!(!StatusFilter::Active.matches(&done));
        assert!(!StatusFilter::Completed.matches(&open));
        assert!(StatusFilter::Completed.matches(&done));
    }

    #[test]
    fn test_status_filter_parse_and_display() {
        for filter in StatusFilter::ALL {
            assert_eq!(filter.to_string().parse::<StatusFilter>().unwrap(), filter);
        }
        assert_eq!("ACTIVE".parse::<StatusFilter>().unwrap(), StatusFilter::Active);
        assert!("pending".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_sort_order_parse_and_display() {
        for sort in SortOrder::ALL {
            assert_eq!(sort.to_string().parse::<SortOrder>().unwrap(), sort);
        }
        assert_eq!("a-z".parse::<SortOrder>().unwrap(), SortOrder::Alphabetical);
        assert!("random".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_sort_order_by_creation() {
        let older = task(1, "x", false);
        let newer = task(2, "y", false);
        assert_eq!(SortOrder::Newest.compare(&newer, &older), Ordering::Less);
        assert_eq!(SortOrder::Oldest.compare(&older, &newer), Ordering::Less);
    }

    #[test]
    fn test_locale_cmp_ignores_case_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Banana", "apple"), Ordering::Greater);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
        assert_eq!(locale_cmp("abc", "abcd"), Ordering::Less);
    }

    #[test]
    fn test_locale_cmp_ignores_accents_first() {
        assert_eq!(locale_cmp("Éclair", "Zoo"), Ordering::Less);
        assert_eq!(locale_cmp("ábaco", "banana"), Ordering::Less);
        assert_eq!(locale_cmp("resume", "résumé"), Ordering::Less);
        assert_eq!(locale_cmp("résumé", "resumes"), Ordering::Less);
        assert_eq!(locale_cmp("élan", "Élan"), Ordering::Less);
    }

    #[test]
    fn test_serde_tokens() {
        assert_eq!(serde_json::to_string(&StatusFilter::Completed).unwrap(), "\"completed\"");
        assert_eq!(serde_json::to_string(&SortOrder::Alphabetical).unwrap(), "\"alphabetical\"");
    }
}

//! Task record types: lifecycle status, tags, and comments.
//!
//! A [`Task`] is the unit of analysis for the dashboard engine. The engine
//! only ever reads these records; all mutation goes through the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The three recognized lifecycle statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl Status {
    /// All recognized statuses, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the recognized statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status {value:?} (expected pending, in_progress, or completed)")]
pub struct InvalidStatus {
    pub value: String,
}

impl FromStr for Status {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// A status cell as read from storage.
///
/// Rows written by other tooling may carry status strings outside the
/// recognized vocabulary. Those are preserved verbatim rather than rejected:
/// the histogram skips them, and they round-trip through serialization
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    Known(Status),
    Other(String),
}

impl StatusValue {
    /// Parse a raw status string, preserving unrecognized values.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.parse::<Status>()
            .map_or_else(|_| Self::Other(raw.to_string()), Self::Known)
    }

    /// The recognized status, if this value is one.
    #[must_use]
    pub const fn known(&self) -> Option<Status> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Other(_) => None,
        }
    }

    /// Equality test against the single status that denotes completion.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Known(Status::Completed))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(status) => status.as_str(),
            Self::Other(raw) => raw,
        }
    }
}

/// A structured tag: an object with an optional `label` plus arbitrary
/// extra fields that are preserved but never inspected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Tag {
    /// Build a tag carrying only a label.
    #[must_use]
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// One element of a task's tag list.
///
/// Tag lists are heterogeneous in the wild: structured objects mixed with
/// bare strings or other scalars. Only structured entries participate in
/// tag ranking; everything else is carried opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagEntry {
    Structured(Tag),
    Unstructured(serde_json::Value),
}

impl TagEntry {
    /// The structured tag, if this entry is one.
    #[must_use]
    pub const fn structured(&self) -> Option<&Tag> {
        match self {
            Self::Structured(tag) => Some(tag),
            Self::Unstructured(_) => None,
        }
    }
}

/// A comment on a task: free text plus the moment it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub date: DateTime<Utc>,
}

/// A task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque unique identifier, assigned by the store at creation.
    pub id: String,
    /// User identifier this task belongs to.
    pub owner: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: StatusValue,
    /// Creation timestamp. `None` when the stored cell was absent or
    /// unparseable; date-dependent metrics skip such tasks.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<TagEntry>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Task {
    /// The creation timestamp, substituting `now` when the record has none.
    #[must_use]
    pub fn created_at_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.created_at.unwrap_or(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
    }

    #[test]
    fn status_rejects_localized_variants() {
        // The vocabulary is exact; cased or localized spellings don't count.
        for raw in ["Pending", "COMPLETED", "concluída", "in progress", ""] {
            assert!(raw.parse::<Status>().is_err(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn status_value_preserves_unrecognized_strings() {
        let value = StatusValue::parse("archived");
        assert_eq!(value, StatusValue::Other("archived".to_string()));
        assert_eq!(value.known(), None);
        assert!(!value.is_completed());
        assert_eq!(value.as_str(), "archived");
    }

    #[test]
    fn status_value_serializes_as_plain_string() {
        let known = serde_json::to_value(StatusValue::Known(Status::InProgress)).unwrap();
        assert_eq!(known, serde_json::json!("in_progress"));

        let other = serde_json::to_value(StatusValue::parse("weird")).unwrap();
        assert_eq!(other, serde_json::json!("weird"));
    }

    #[test]
    fn tag_entries_deserialize_structured_and_bare() {
        let entries: Vec<TagEntry> = serde_json::from_value(serde_json::json!([
            {"label": "urgent", "color": "red"},
            "misc",
            {"weight": 3},
            7
        ]))
        .unwrap();

        assert_eq!(
            entries[0].structured().and_then(|t| t.label.as_deref()),
            Some("urgent")
        );
        assert!(entries[1].structured().is_none());
        // Object without a label is still structured (label None).
        let unlabeled = entries[2].structured().expect("object is structured");
        assert_eq!(unlabeled.label, None);
        assert!(entries[3].structured().is_none());
    }

    #[test]
    fn structured_tag_round_trips_extra_fields() {
        let raw = serde_json::json!({"label": "infra", "color": "blue"});
        let entry: TagEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }
}

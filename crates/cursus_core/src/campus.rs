//! Campus API payload boundary.
//!
//! # Responsibility
//! - Decode `projects_users` JSON into validated `RawSubmissionRecord`s.
//! - Drop piscine/pool attempts that are not part of the cursus.
//! - Summarize raw records into dashboard counters.
//!
//! # Invariants
//! - Only a non-array top-level document is an error; non-object items are
//!   skipped and fields of the wrong type fall back to defaults.
//! - Unknown status strings survive decoding as `SubmissionStatus::Other`.

use crate::model::submission::{RawSubmissionRecord, SubmissionStatus};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

const UNKNOWN_PROJECT_NAME: &str = "Unknown";
const PISCINE_MARKERS: &[&str] = &["piscine", "pool"];

pub type RecordResult<T> = Result<T, RecordError>;

/// Errors raised while decoding a campus payload.
#[derive(Debug)]
pub enum RecordError {
    /// Payload is not valid JSON.
    Json(serde_json::Error),
    /// Payload is valid JSON but not an array of records.
    NotAnArray(&'static str),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid campus payload: {err}"),
            Self::NotAnArray(kind) => {
                write!(f, "campus payload must be a JSON array, got {kind}")
            }
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::NotAnArray(_) => None,
        }
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Deserialize)]
struct CampusProjectUser {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    project: Option<CampusProject>,
    #[serde(default, deserialize_with = "lenient")]
    status: Option<String>,
    #[serde(rename = "validated?", default, deserialize_with = "lenient")]
    validated: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    final_mark: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    marked_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    retriable_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CampusProject {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    slug: Option<String>,
}

/// Reads one field, mapping a value of the wrong type to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl From<CampusProjectUser> for RawSubmissionRecord {
    fn from(value: CampusProjectUser) -> Self {
        let (name, slug) = match value.project {
            Some(project) => (project.name, project.slug),
            None => (None, None),
        };
        Self {
            id: value.id.unwrap_or(0),
            slug: slug.unwrap_or_default(),
            name: name.unwrap_or_else(|| UNKNOWN_PROJECT_NAME.to_string()),
            status: SubmissionStatus::parse(value.status.as_deref().unwrap_or_default()),
            validated: value.validated,
            final_mark: value.final_mark.map(|mark| mark.round() as i64),
            marked_at: value.marked_at,
            retries_count: value.retriable_count.unwrap_or(0),
        }
    }
}

/// Decodes a campus `projects_users` array.
///
/// Items that are not objects are skipped with a warning rather than
/// failing the whole payload; mistyped fields inside an object degrade to
/// their defaults.
pub fn decode_campus_records(payload: &str) -> RecordResult<Vec<RawSubmissionRecord>> {
    let document: Value = serde_json::from_str(payload)?;
    let items = match document {
        Value::Array(items) => items,
        Value::Object(_) => return Err(RecordError::NotAnArray("object")),
        Value::String(_) => return Err(RecordError::NotAnArray("string")),
        Value::Number(_) => return Err(RecordError::NotAnArray("number")),
        Value::Bool(_) => return Err(RecordError::NotAnArray("bool")),
        Value::Null => return Err(RecordError::NotAnArray("null")),
    };

    let total = items.len();
    let mut records = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            warn!(
                "event=campus_decode module=campus status=skip index={} error=not_an_object",
                index
            );
            continue;
        }
        match serde_json::from_value::<CampusProjectUser>(item) {
            Ok(item) => records.push(RawSubmissionRecord::from(item)),
            Err(err) => warn!(
                "event=campus_decode module=campus status=skip index={} error={}",
                index, err
            ),
        }
    }

    debug!(
        "event=campus_decode module=campus status=ok items={} decoded={}",
        total,
        records.len()
    );
    Ok(records)
}

/// Returns whether a record belongs to a piscine/pool rather than the cursus.
pub fn is_piscine_record(record: &RawSubmissionRecord) -> bool {
    let name = record.name.to_lowercase();
    let slug = record.slug.to_lowercase();
    PISCINE_MARKERS
        .iter()
        .any(|marker| name.contains(marker) || slug.contains(marker))
}

/// Drops piscine/pool records, keeping cursus records in order.
pub fn filter_cursus_records(mut records: Vec<RawSubmissionRecord>) -> Vec<RawSubmissionRecord> {
    records.retain(|record| !is_piscine_record(record));
    records
}

/// Counters over raw campus records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub in_progress: usize,
}

pub fn summarize_records(records: &[RawSubmissionRecord]) -> ProjectStats {
    ProjectStats {
        total: records.len(),
        completed: records.iter().filter(|record| record.is_passed()).count(),
        failed: records.iter().filter(|record| record.is_failed()).count(),
        in_progress: records
            .iter()
            .filter(|record| record.status.is_active())
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::{is_piscine_record, summarize_records};
    use crate::model::submission::{RawSubmissionRecord, SubmissionStatus};

    #[test]
    fn piscine_detection_checks_name_and_slug() {
        let mut by_slug =
            RawSubmissionRecord::new(1, "c-piscine-shell-00", SubmissionStatus::Finished, None);
        by_slug.name = "Shell 00".to_string();
        assert!(is_piscine_record(&by_slug));

        let mut by_name = RawSubmissionRecord::new(2, "rush-00", SubmissionStatus::Finished, None);
        by_name.name = "Python Pool Day 01".to_string();
        assert!(is_piscine_record(&by_name));

        let cursus = RawSubmissionRecord::new(3, "libft", SubmissionStatus::Finished, None);
        assert!(!is_piscine_record(&cursus));
    }

    #[test]
    fn stats_count_each_category_once() {
        let records = vec![
            RawSubmissionRecord::new(1, "a", SubmissionStatus::Finished, Some(true)),
            RawSubmissionRecord::new(2, "b", SubmissionStatus::Finished, Some(false)),
            RawSubmissionRecord::new(3, "c", SubmissionStatus::CreatingGroup, None),
            RawSubmissionRecord::new(4, "d", SubmissionStatus::parse("parent"), None),
        ];
        let stats = summarize_records(&records);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.in_progress, 1);
    }
}

// file: src/models/document.rs
// description: canonical document record shared by every workflow, plus the submission payload
// reference: internal data structures

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned identifier. Immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// OCR-extracted text produced by the server from the uploaded file.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub file_size: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub file_path: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub performers: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    #[serde(default, with = "expiry_date")]
    pub expiry_date: Option<NaiveDate>,

    #[serde(rename = "created_by", default, deserialize_with = "null_as_default")]
    pub created_by: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_blocked: bool,
}

impl Document {
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// JSON body sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub title: String,
    pub tags: Vec<String>,
    pub performers: Vec<String>,
    #[serde(rename = "created_by")]
    pub created_by: String,
    pub file_name: String,
    pub file_size: u64,
    /// `YYYY-MM-DD`, or empty when unset.
    pub expiry_date: String,
    pub is_blocked: bool,
    pub file_path: Option<String>,
    pub content: Option<String>,
}

/// Accepts either a full RFC 3339 timestamp (UTC date is kept) or a bare `YYYY-MM-DD`.
pub fn parse_expiry_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

mod expiry_date {
    use super::parse_expiry_date;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => {
                let parsed = parse_expiry_date(value);
                if parsed.is_none() {
                    warn!("Ignoring unparseable expiry date: {}", value);
                }
                Ok(parsed)
            }
        }
    }
}

// file: src/models/tag.rs
// description: filter facet listed by the tags endpoint

use serde::{Deserialize, Serialize};

/// Drives the filter chips only; independent of a document's free-form tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
}

impl Tag {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

//! Document model
//!
//! This module defines:
//! - DocumentType: the closed set of indexable content kinds
//! - MetadataValue: closed variant set for metadata values
//! - Document: the caller-supplied unit of indexing
//!
//! Tokens are not part of `Document`. They are derived by the indexer and
//! live next to the stored copy, so callers can never supply or mutate them.

use crate::error::{Error, Result};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Metadata key holding the owner id
pub const META_OWNER_ID: &str = "owner_id";
/// Metadata key holding the workflow status
pub const META_STATUS: &str = "status";
/// Metadata key holding the tag list
pub const META_TAGS: &str = "tags";
/// Metadata key holding the access level assigned by the permission layer
pub const META_ACCESS_LEVEL: &str = "access_level";

// ============================================================================
// DocumentType
// ============================================================================

/// Kind of content a document represents
///
/// There is no wildcard variant. "All types" is expressed at query time
/// as the absence of a type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Conversation thread
    Thread,
    /// Long-form document
    Document,
    /// Free-form note
    Note,
    /// Actionable task
    Task,
    /// Project record
    Project,
    /// Meeting record
    Meeting,
    /// Person or organization contact
    Contact,
    /// Agent definition
    Agent,
    /// Dataspace record
    Dataspace,
}

impl DocumentType {
    /// Every document type, in declaration order
    pub const ALL: [DocumentType; 9] = [
        DocumentType::Thread,
        DocumentType::Document,
        DocumentType::Note,
        DocumentType::Task,
        DocumentType::Project,
        DocumentType::Meeting,
        DocumentType::Contact,
        DocumentType::Agent,
        DocumentType::Dataspace,
    ];

    /// Lowercase name, identical to the serialized form
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Thread => "thread",
            DocumentType::Document => "document",
            DocumentType::Note => "note",
            DocumentType::Task => "task",
            DocumentType::Project => "project",
            DocumentType::Meeting => "meeting",
            DocumentType::Contact => "contact",
            DocumentType::Agent => "agent",
            DocumentType::Dataspace => "dataspace",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        DocumentType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| Error::UnknownDocumentType(s.to_string()))
    }
}

// ============================================================================
// MetadataValue
// ============================================================================

/// A primitive metadata value
///
/// Metadata is an open map of keys but a closed set of value kinds, so
/// every filter can match exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Boolean flag
    Bool(bool),
    /// Numeric value (IEEE-754 double)
    Number(f64),
    /// UTF-8 string
    String(String),
    /// List of strings (e.g. tags)
    StringList(Vec<String>),
}

impl MetadataValue {
    /// Borrow as a string, if this is a `String`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// View this value as a list of strings
    ///
    /// A single `String` is treated as a one-element list; other kinds are empty.
    pub fn as_string_list(&self) -> Vec<&str> {
        match self {
            MetadataValue::String(s) => vec![s.as_str()],
            MetadataValue::StringList(items) => items.iter().map(String::as_str).collect(),
            MetadataValue::Bool(_) | MetadataValue::Number(_) => vec![],
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::String(s)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        MetadataValue::Number(n)
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        MetadataValue::Number(n as f64)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(items: Vec<String>) -> Self {
        MetadataValue::StringList(items)
    }
}

impl TryFrom<serde_json::Value> for MetadataValue {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;
        match value {
            Json::Bool(b) => Ok(MetadataValue::Bool(b)),
            Json::Number(n) => n
                .as_f64()
                .map(MetadataValue::Number)
                .ok_or_else(|| Error::validation(format!("number {} is not representable", n))),
            Json::String(s) => Ok(MetadataValue::String(s)),
            Json::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Json::String(s) => Ok(s),
                    other => Err(Error::validation(format!(
                        "metadata lists may only hold strings, found {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(MetadataValue::StringList),
            Json::Null | Json::Object(_) => Err(Error::validation(format!(
                "unsupported metadata value: {}",
                value
            ))),
        }
    }
}

/// Metadata map attached to every document
pub type Metadata = BTreeMap<String, MetadataValue>;

// ============================================================================
// Document
// ============================================================================

/// The unit of indexing
///
/// # Example
///
/// ```
/// use sphere_core::{Document, DocumentType};
///
/// let doc = Document::new("d1", DocumentType::Note, "mtl", "Renovation budget", "discussing costs")
///     .with_owner("u-42")
///     .with_tags(["home", "budget"]);
///
/// assert_eq!(doc.owner_id(), Some("u-42"));
/// assert_eq!(doc.tags(), vec!["home", "budget"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document id
    pub id: String,
    /// Kind of content
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Organizational partition this document belongs to
    pub scope_id: String,
    /// Title (weighted higher in scoring)
    pub title: String,
    /// Body text
    pub content: String,
    /// Owner, status, tags and arbitrary flags
    #[serde(default)]
    pub metadata: Metadata,
    /// Creation time
    pub created_at: Timestamp,
    /// Last modification time
    pub updated_at: Timestamp,
}

impl Document {
    /// Create a document stamped with the current time
    pub fn new(
        id: impl Into<String>,
        doc_type: DocumentType,
        scope_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Document {
            id: id.into(),
            doc_type,
            scope_id: scope_id.into(),
            title: title.into(),
            content: content.into(),
            metadata: Metadata::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder: set a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builder: set the owner id
    pub fn with_owner(self, owner_id: impl Into<String>) -> Self {
        let owner_id: String = owner_id.into();
        self.with_metadata(META_OWNER_ID, owner_id)
    }

    /// Builder: set the status
    pub fn with_status(self, status: impl Into<String>) -> Self {
        let status: String = status.into();
        self.with_metadata(META_STATUS, status)
    }

    /// Builder: set the tag list
    pub fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        self.with_metadata(META_TAGS, tags)
    }

    /// Builder: set both timestamps
    pub fn with_timestamps(mut self, created_at: Timestamp, updated_at: Timestamp) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Builder: replace the metadata map from a JSON object
    pub fn with_json_metadata(mut self, json: serde_json::Value) -> Result<Self> {
        self.metadata = metadata_from_json(json)?;
        Ok(self)
    }

    /// Owner id from metadata
    pub fn owner_id(&self) -> Option<&str> {
        self.metadata.get(META_OWNER_ID).and_then(MetadataValue::as_str)
    }

    /// Status from metadata
    pub fn status(&self) -> Option<&str> {
        self.metadata.get(META_STATUS).and_then(MetadataValue::as_str)
    }

    /// Tags from metadata (empty when absent)
    pub fn tags(&self) -> Vec<&str> {
        self.metadata
            .get(META_TAGS)
            .map(MetadataValue::as_string_list)
            .unwrap_or_default()
    }

    /// Access level assigned by the permission layer, passed through untouched
    pub fn access_level(&self) -> Option<&str> {
        self.metadata
            .get(META_ACCESS_LEVEL)
            .and_then(MetadataValue::as_str)
    }

    /// Text the tokenizer indexes: title, a space, then content
    pub fn indexable_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }

    /// Check the fields the index keys on
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidDocument("document id is empty".to_string()));
        }
        if self.scope_id.trim().is_empty() {
            return Err(Error::InvalidDocument(format!(
                "document '{}' has an empty scope id",
                self.id
            )));
        }
        Ok(())
    }
}

/// Convert a JSON object into a metadata map
pub fn metadata_from_json(json: serde_json::Value) -> Result<Metadata> {
    match json {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| MetadataValue::try_from(v).map(|mv| (k, mv)))
            .collect(),
        other => Err(Error::validation(format!(
            "metadata must be a JSON object, found {}",
            other
        ))),
    }
}

//! Store client: the remote key-value store holding every presentation.
//!
//! DESIGN
//! ======
//! The store exposes exactly two operations, read the whole snapshot and
//! replace top-level fields of it. Everything above this layer talks to the
//! [`Store`] trait so tests can swap in [`memory::MemoryStore`] and the
//! binary uses [`http::HttpStore`].
//!
//! Presentations travel as raw JSON records. Only the one being edited is
//! decoded, so a sibling the model cannot read never blocks a write and is
//! written back exactly as fetched.
//!
//! Credentials come from an injected [`AuthContext`]. A missing credential
//! fails locally as [`StoreError::Unauthenticated`] before any I/O.

pub mod http;
pub mod memory;

use canvas::doc::{Presentation, PresentationId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No credential is available for the request.
    #[error("not authenticated")]
    Unauthenticated,

    /// The request could not be sent or the response could not be read.
    #[error("store request failed: {0}")]
    Request(String),

    /// The store answered with a non-success status.
    #[error("store returned status {status}")]
    Status { status: u16, body: String },

    /// The response body, or the presentation being edited, does not fit the model.
    #[error("store response decode failed: {0}")]
    Decode(String),

    /// A presentation could not be serialized for writing.
    #[error("store request encode failed: {0}")]
    Encode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Everything the store holds.
///
/// Presentation records stay raw JSON. Only the one being edited is decoded
/// into the typed model, and writing it back merges onto its raw record, so
/// other presentations and fields this crate does not model round-trip
/// byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub presentations: Vec<Value>,
    /// Other top-level store fields, left alone.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoreSnapshot {
    #[must_use]
    pub fn new(presentations: Vec<Value>) -> Self {
        Self { presentations, extra: Map::new() }
    }

    /// A snapshot holding the encoded `presentations`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if a presentation cannot be serialized.
    pub fn from_presentations(presentations: &[Presentation]) -> Result<Self, StoreError> {
        let records = presentations.iter().map(encode).collect::<Result<_, _>>()?;
        Ok(Self::new(records))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.presentations.iter().position(|record| record_id(record) == Some(id))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Decode the presentation `id`. Other records are not looked at.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] if that record does not fit the model.
    pub fn presentation(&self, id: &str) -> Result<Option<Presentation>, StoreError> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        Presentation::deserialize(&self.presentations[index])
            .map(Some)
            .map_err(|e| StoreError::Decode(format!("presentation {id}: {e}")))
    }

    /// Write `presentation` back over its raw record, appending it if absent.
    ///
    /// Keys the model does not know about survive on the presentation, and on
    /// slides and elements matched by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if the presentation cannot be serialized.
    pub fn put_presentation(&mut self, presentation: &Presentation) -> Result<(), StoreError> {
        let typed = encode(presentation)?;
        match self.position(&presentation.id) {
            Some(index) => merge_record(&mut self.presentations[index], typed),
            None => self.presentations.push(typed),
        }
        Ok(())
    }

    #[must_use]
    pub fn presentation_ids(&self) -> Vec<PresentationId> {
        self.presentations.iter().filter_map(record_id).map(str::to_owned).collect()
    }
}

/// The `id` of a raw record, if it has a string one.
#[must_use]
pub fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn encode(presentation: &Presentation) -> Result<Value, StoreError> {
    serde_json::to_value(presentation).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Old key names the model still reads, paired with the name it writes.
const RENAMED_KEYS: &[(&str, &str)] = &[("defaultColor", "defaultBackground")];

/// Overlay `typed` onto `base`, keeping keys only `base` has.
///
/// `slides` and `elements` arrays take `typed`'s order and membership; each
/// entry is merged with the `base` entry of the same id. An element whose
/// `type` changed replaces its old record outright.
fn merge_record(base: &mut Value, typed: Value) {
    match (base, typed) {
        (Value::Object(base_map), Value::Object(typed_map)) => {
            for (old, current) in RENAMED_KEYS {
                if typed_map.contains_key(*current) {
                    base_map.remove(*old);
                }
            }
            for (key, value) in typed_map {
                let merged = match (key.as_str(), base_map.remove(&key), value) {
                    ("slides" | "elements", Some(Value::Array(old)), Value::Array(new)) => {
                        Value::Array(merge_by_id(old, new))
                    }
                    (_, _, value) => value,
                };
                base_map.insert(key, merged);
            }
        }
        (base, typed) => *base = typed,
    }
}

fn merge_by_id(old: Vec<Value>, new: Vec<Value>) -> Vec<Value> {
    let mut old: Vec<Option<Value>> = old.into_iter().map(Some).collect();
    new.into_iter()
        .map(|entry| {
            let slot = old.iter_mut().find(|slot| {
                slot.as_ref().is_some_and(|prev| {
                    record_id(prev).is_some() && record_id(prev) == record_id(&entry) && prev.get("type") == entry.get("type")
                })
            });
            match slot.and_then(Option::take) {
                Some(mut prev) => {
                    merge_record(&mut prev, entry);
                    prev
                }
                None => entry,
            }
        })
        .collect()
}

/// `{ "store": ... }` as returned by `GET /store`.
#[derive(Debug, Deserialize)]
pub(crate) struct StoreEnvelope {
    #[serde(default)]
    pub store: StoreSnapshot,
}

/// Parse a `GET /store` response body.
///
/// # Errors
///
/// Returns [`StoreError::Decode`] if the body is not a store envelope.
pub fn parse_snapshot(text: &str) -> Result<StoreSnapshot, StoreError> {
    serde_json::from_str::<StoreEnvelope>(text)
        .map(|envelope| envelope.store)
        .map_err(|e| StoreError::Decode(e.to_string()))
}

// =============================================================================
// TRAITS
// =============================================================================

/// Source of the bearer credential attached to every store request.
pub trait AuthContext: Send + Sync {
    /// The current token, or `None` when signed out.
    fn token(&self) -> Option<String>;
}

/// A fixed credential, as read from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl AuthContext for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Async store seam. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Read the full store snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails or the body is malformed.
    async fn fetch(&self) -> Result<StoreSnapshot, StoreError>;

    /// Replace the store's `presentations` field with these raw records.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails or the store rejects it.
    async fn replace_presentations(&self, presentations: &[Value]) -> Result<(), StoreError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

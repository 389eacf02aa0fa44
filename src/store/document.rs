use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// A JSON document persisted in its own table
///
/// The version column is authoritative; `set_version` is called with the
/// stored value every time a document is loaded.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Unpin {
    const TABLE: &'static str;

    /// Top-level JSON fields to index
    const INDEXED_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> Uuid;

    fn version(&self) -> u32;

    fn set_version(&mut self, version: u32);
}

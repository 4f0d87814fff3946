//! Persistence contract for stored template documents.
//!
//! The engine never talks to a database; callers hand it something that can
//! load/save/delete one opaque JSON document per owner. Write atomicity is
//! the implementation's concern.

use std::collections::BTreeMap;

use crate::foundation::error::{SlatecastError, SlatecastResult};
use crate::schedule::record::OwnerId;

/// One JSON template document per owner.
pub trait TemplateStore {
    /// Fetch the stored document for `owner`, if any.
    fn load(&self, owner: &OwnerId) -> SlatecastResult<Option<serde_json::Value>>;

    /// Create or replace the stored document for `owner`.
    fn save(&mut self, owner: &OwnerId, doc: &serde_json::Value) -> SlatecastResult<()>;

    /// Remove the stored document for `owner`. Deleting a missing document
    /// is not an error.
    fn delete(&mut self, owner: &OwnerId) -> SlatecastResult<()>;
}

/// Load a document, mapping "no template" to [`SlatecastError::NotFound`].
pub fn require_template<S>(store: &S, owner: &OwnerId) -> SlatecastResult<serde_json::Value>
where
    S: TemplateStore + ?Sized,
{
    store
        .load(owner)?
        .ok_or_else(|| SlatecastError::not_found(format!("no template stored for owner {owner}")))
}

/// In-memory store backing tests and demos.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    docs: BTreeMap<String, serde_json::Value>,
}

impl MemoryTemplateStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True when no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load(&self, owner: &OwnerId) -> SlatecastResult<Option<serde_json::Value>> {
        Ok(self.docs.get(&owner.0).cloned())
    }

    fn save(&mut self, owner: &OwnerId, doc: &serde_json::Value) -> SlatecastResult<()> {
        self.docs.insert(owner.0.clone(), doc.clone());
        Ok(())
    }

    fn delete(&mut self, owner: &OwnerId) -> SlatecastResult<()> {
        self.docs.remove(&owner.0);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/store.rs"]
mod tests;

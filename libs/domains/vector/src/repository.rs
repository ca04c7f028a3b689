use async_trait::async_trait;
use serde_json::Value;

use crate::error::VectorResult;
use crate::models::{Lookup, Record, RecordPatch, SearchHit, SearchQuery, SpaceConfig};

/// Repository trait for space and record operations
///
/// This trait abstracts the underlying vector engine (Vearch).
/// Engine-side refusals come back as `false`, `None` or an empty list;
/// only transport and caller errors are `Err`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorRepository: Send + Sync {
    /// Reachability probe used by readiness checks
    async fn ping(&self) -> VectorResult<()>;

    // ===== Space Management =====

    /// Create a space with the fixed text/embed schema
    async fn create_space(&self, name: &str, config: SpaceConfig) -> VectorResult<bool>;

    /// Raw space descriptor
    async fn inspect_space(&self, name: &str) -> VectorResult<Value>;

    /// Delete a space and return the engine reply
    async fn delete_space(&self, name: &str) -> VectorResult<Value>;

    // ===== Record Operations =====

    /// Insert a record; the id is derived from the text when absent
    async fn insert(
        &self,
        space: &str,
        text: &str,
        vector: Vec<f32>,
        id: Option<String>,
    ) -> VectorResult<Option<String>>;

    /// Partially update a record
    async fn update(
        &self,
        space: &str,
        id: &str,
        patch: RecordPatch,
    ) -> VectorResult<Option<String>>;

    async fn get(&self, space: &str, id: &str) -> VectorResult<Option<Record>>;

    /// One result slot per requested id
    async fn get_many(&self, space: &str, ids: Vec<String>) -> VectorResult<Vec<Lookup>>;

    async fn delete(&self, space: &str, id: &str) -> VectorResult<bool>;

    // ===== Search =====

    async fn search(&self, space: &str, query: SearchQuery) -> VectorResult<Vec<SearchHit>>;
}

use std::sync::Arc;

use serde_json::Value;

use crate::embedding::{EmbeddingProvider, cosine_similarity, l2_normalize};
use crate::error::{VectorError, VectorResult};
use crate::models::{Lookup, Record, RecordPatch, SearchHit, SearchQuery, SpaceConfig};
use crate::repository::VectorRepository;

/// Vector service providing high-level operations
///
/// Combines the vector store (Vearch) with text encoding. Every vector
/// written or searched is L2-normalized first so the engine's inner-product
/// distance stays within 0..=2.
pub struct VectorService<R: VectorRepository> {
    repository: R,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl<R: VectorRepository> VectorService<R> {
    pub fn new(repository: R, embedding_provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            repository,
            embedding_provider,
        }
    }

    pub fn dimension(&self) -> u32 {
        self.embedding_provider.dimension()
    }

    /// Fails when the vector store cannot be reached
    pub async fn ping(&self) -> VectorResult<()> {
        self.repository.ping().await
    }

    // ===== Encoding =====

    /// Encode `text` into a unit-length vector
    pub async fn encode(&self, text: &str) -> VectorResult<Vec<f32>> {
        let mut vector = self.embedding_provider.embed(text).await?;
        l2_normalize(&mut vector);
        Ok(vector)
    }

    /// Cosine similarity between two texts; symmetric in its arguments
    pub async fn similarity(&self, text1: &str, text2: &str) -> VectorResult<f32> {
        let embeddings = self
            .embedding_provider
            .embed_batch(&[text1.to_string(), text2.to_string()])
            .await?;

        match embeddings.as_slice() {
            [a, b] => Ok(cosine_similarity(a, b)),
            other => Err(VectorError::Embedding(format!(
                "Expected 2 embeddings, got {}",
                other.len()
            ))),
        }
    }

    // ===== Space Management =====

    /// Create a space sized for the encoder's dimension
    pub async fn create_space(&self, name: &str) -> VectorResult<bool> {
        self.repository
            .create_space(name, SpaceConfig::new(self.dimension()))
            .await
    }

    pub async fn inspect_space(&self, name: &str) -> VectorResult<Value> {
        self.repository.inspect_space(name).await
    }

    pub async fn delete_space(&self, name: &str) -> VectorResult<Value> {
        self.repository.delete_space(name).await
    }

    // ===== Record Operations =====

    /// Encode and store `text`; returns the id the engine acknowledged
    pub async fn insert_text(
        &self,
        space: &str,
        text: &str,
        id: Option<String>,
    ) -> VectorResult<Option<String>> {
        let vector = self.encode(text).await?;
        self.repository.insert(space, text, vector, id).await
    }

    /// Replace the text of a record and its embedding together
    pub async fn update_text(
        &self,
        space: &str,
        id: &str,
        text: &str,
    ) -> VectorResult<Option<String>> {
        let vector = self.encode(text).await?;
        let patch = RecordPatch::Both {
            text: text.to_string(),
            vector,
        };
        self.repository.update(space, id, patch).await
    }

    pub async fn update(
        &self,
        space: &str,
        id: &str,
        patch: RecordPatch,
    ) -> VectorResult<Option<String>> {
        self.repository.update(space, id, patch).await
    }

    pub async fn get(&self, space: &str, id: &str) -> VectorResult<Option<Record>> {
        self.repository.get(space, id).await
    }

    pub async fn get_many(&self, space: &str, ids: Vec<String>) -> VectorResult<Vec<Lookup>> {
        self.repository.get_many(space, ids).await
    }

    pub async fn delete(&self, space: &str, id: &str) -> VectorResult<bool> {
        self.repository.delete(space, id).await
    }

    // ===== Search =====

    pub async fn search(&self, space: &str, query: SearchQuery) -> VectorResult<Vec<SearchHit>> {
        self.repository.search(space, query).await
    }

    /// Search with automatic query encoding
    pub async fn search_text(
        &self,
        space: &str,
        query: &str,
        topk: u32,
        return_vector: bool,
    ) -> VectorResult<Vec<SearchHit>> {
        if topk == 0 {
            return Err(VectorError::Validation(
                "topk must be greater than zero".to_string(),
            ));
        }

        let vector = self.encode(query).await?;
        let query = SearchQuery::new(vector, topk).with_vectors(return_vector);
        self.repository.search(space, query).await
    }
}

use async_trait::async_trait;

use crate::error::VectorResult;

/// Text encoder producing fixed-length embeddings
///
/// The model behind it is a black box; every vector it returns has exactly
/// [`dimension`](EmbeddingProvider::dimension) components.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Output dimension of the model
    fn dimension(&self) -> u32;

    /// Generate the raw embedding for a single text
    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<Vec<f32>>>;
}

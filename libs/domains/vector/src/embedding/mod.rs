mod math;
mod openai;
mod provider;

pub use math::{cosine_similarity, l2_normalize};
pub use openai::{OpenAIConfig, OpenAIProvider};
pub use provider::EmbeddingProvider;

#[cfg(test)]
pub use provider::MockEmbeddingProvider;

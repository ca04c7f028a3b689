use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::error::{VectorError, VectorResult};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/v1";
pub const DEFAULT_MODEL: &str = "paraphrase-multilingual-MiniLM-L12-v2";
pub const DEFAULT_DIMENSION: u32 = 384;

/// Configuration for an OpenAI-compatible `/embeddings` endpoint
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub dimension: u32,
}

impl OpenAIConfig {
    pub fn new(base_url: String, model: String, dimension: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            model,
            dimension,
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }
}

impl FromEnv for OpenAIConfig {
    /// Reads:
    /// - EMBEDDING_BASE_URL: defaults to http://127.0.0.1:8080/v1
    /// - EMBEDDING_API_KEY: optional bearer token
    /// - EMBEDDING_MODEL: defaults to paraphrase-multilingual-MiniLM-L12-v2
    /// - EMBEDDING_DIMENSION: defaults to 384
    fn from_env() -> Result<Self, ConfigError> {
        let dimension: u32 = env_or_default("EMBEDDING_DIMENSION", &DEFAULT_DIMENSION.to_string())
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "EMBEDDING_DIMENSION".to_string(),
                details: format!("{}", e),
            })?;
        if dimension == 0 {
            return Err(ConfigError::ParseError {
                key: "EMBEDDING_DIMENSION".to_string(),
                details: "dimension must be greater than zero".to_string(),
            });
        }

        let mut config = Self::new(
            env_or_default("EMBEDDING_BASE_URL", DEFAULT_BASE_URL),
            env_or_default("EMBEDDING_MODEL", DEFAULT_MODEL),
            dimension,
        );
        config.api_key = std::env::var("EMBEDDING_API_KEY").ok().filter(|k| !k.is_empty());
        Ok(config)
    }
}

/// Embeddings over an OpenAI-compatible HTTP API
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn from_env() -> VectorResult<Self> {
        Ok(Self::new(OpenAIConfig::from_env()?))
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// Order by `index` and check count and dimension.
fn collect_embeddings(
    mut data: Vec<EmbeddingData>,
    expected: usize,
    dimension: u32,
) -> VectorResult<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(VectorError::Embedding(format!(
            "Expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }

    data.sort_by_key(|d| d.index);

    data.into_iter()
        .map(|d| {
            if d.embedding.len() != dimension as usize {
                return Err(VectorError::Embedding(format!(
                    "Expected dimension {}, got {}",
                    dimension,
                    d.embedding.len()
                )));
            }
            Ok(d.embedding)
        })
        .collect()
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn dimension(&self) -> u32 {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| VectorError::Embedding("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        let mut builder = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| VectorError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VectorError::Embedding(format!(
                "Embedding API error ({}): {}",
                status, error_text
            )));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| VectorError::Embedding(e.to_string()))?;

        collect_embeddings(embedding_response.data, texts.len(), self.config.dimension)
    }
}

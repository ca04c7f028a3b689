//! Vector Domain Library
//!
//! Semantic text storage and search on top of a Vearch cluster: texts are
//! encoded by an [`EmbeddingProvider`], stored as records in Vearch spaces and
//! searched by inner product.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  VectorService  │  ← Encoding, normalization, space/record operations
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐     ┌──────────────────┐
//! │ VectorRepository│     │ EmbeddingProvider│
//! │   (trait)       │     │    (trait)       │
//! └────────┬────────┘     └────────┬─────────┘
//!          │                       │
//! ┌────────▼────────┐     ┌────────▼─────────┐
//! │  VearchClient   │     │  OpenAIProvider  │
//! └────────┬────────┘     └──────────────────┘
//!          │
//! ┌────────▼────────┐
//! │   Transport     │  ← HTTP in production, fakes in tests
//! └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_vector::{OpenAIProvider, VearchClient, VearchConfig, VectorService};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = VearchClient::connect(VearchConfig::from_env()?).await?;
//! let provider = Arc::new(OpenAIProvider::from_env()?);
//! let service = VectorService::new(client, provider);
//!
//! service.create_space("faq").await?;
//! let id = service.insert_text("faq", "How do I file an expense report?", None).await?;
//! let hits = service.search_text("faq", "expense report", 3, false).await?;
//! # Ok(())
//! # }
//! ```

pub mod embedding;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod vearch;

// Re-export commonly used types
pub use embedding::{EmbeddingProvider, OpenAIConfig, OpenAIProvider};
pub use error::{VectorError, VectorResult};
pub use handlers::VectorApiDoc;
pub use models::{Lookup, Record, RecordPatch, SearchHit, SearchQuery, SpaceConfig};
pub use repository::VectorRepository;
pub use service::VectorService;
pub use vearch::{HttpTransport, Transport, TransportRequest, VearchClient, VearchConfig, Verdict};

use async_trait::async_trait;
use serde_json::Value;

use super::transport::{HttpTransport, Transport, TransportRequest};
use super::VearchConfig;
use crate::error::VectorResult;
use crate::models::{Lookup, Record, RecordPatch, SearchHit, SearchQuery, SpaceConfig};
use crate::repository::VectorRepository;

/// Client for one Vearch database.
///
/// Holds only the immutable endpoints and the transport; every operation is
/// a single independent round trip, so the client is shared freely behind an
/// `Arc` without locking.
pub struct VearchClient<T: Transport = HttpTransport> {
    config: VearchConfig,
    transport: T,
}

impl VearchClient<HttpTransport> {
    /// Connect over HTTP and make sure the configured database exists.
    pub async fn connect(config: VearchConfig) -> VectorResult<Self> {
        Self::with_transport(config, HttpTransport::new()).await
    }
}

impl<T: Transport> VearchClient<T> {
    /// Build a client on `transport` and run the database bootstrap.
    ///
    /// A failed database listing is logged and construction carries on.
    pub async fn with_transport(config: VearchConfig, transport: T) -> VectorResult<Self> {
        let client = Self::new_unchecked(config, transport);
        client.ensure_database().await?;
        Ok(client)
    }

    /// Build a client without touching the engine.
    pub fn new_unchecked(config: VearchConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &VearchConfig {
        &self.config
    }

    pub fn db_name(&self) -> &str {
        &self.config.db_name
    }

    pub(crate) async fn send(&self, request: TransportRequest) -> VectorResult<Value> {
        self.transport.send(request).await
    }
}

#[async_trait]
impl<T: Transport> VectorRepository for VearchClient<T> {
    async fn ping(&self) -> VectorResult<()> {
        self.check_database().await.map(|_| ())
    }

    async fn create_space(&self, name: &str, config: SpaceConfig) -> VectorResult<bool> {
        VearchClient::create_space(self, name, &config).await
    }

    async fn inspect_space(&self, name: &str) -> VectorResult<Value> {
        VearchClient::inspect_space(self, name).await
    }

    async fn delete_space(&self, name: &str) -> VectorResult<Value> {
        VearchClient::delete_space(self, name).await
    }

    async fn insert(
        &self,
        space: &str,
        text: &str,
        vector: Vec<f32>,
        id: Option<String>,
    ) -> VectorResult<Option<String>> {
        VearchClient::insert(self, space, text, &vector, id.as_deref()).await
    }

    async fn update(
        &self,
        space: &str,
        id: &str,
        patch: RecordPatch,
    ) -> VectorResult<Option<String>> {
        self.apply_patch(space, id, &patch).await
    }

    async fn get(&self, space: &str, id: &str) -> VectorResult<Option<Record>> {
        VearchClient::get(self, space, id).await
    }

    async fn get_many(&self, space: &str, ids: Vec<String>) -> VectorResult<Vec<Lookup>> {
        VearchClient::get_many(self, space, &ids).await
    }

    async fn delete(&self, space: &str, id: &str) -> VectorResult<bool> {
        VearchClient::delete(self, space, id).await
    }

    async fn search(&self, space: &str, query: SearchQuery) -> VectorResult<Vec<SearchHit>> {
        VearchClient::search(self, space, &query).await
    }
}

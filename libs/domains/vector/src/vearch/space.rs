use serde_json::Value;

use super::normalizer;
use super::transport::{Transport, TransportRequest};
use super::wire::space_schema;
use super::VearchClient;
use crate::error::VectorResult;
use crate::models::SpaceConfig;

impl<T: Transport> VearchClient<T> {
    /// Create a space with the fixed `text` + `embed` schema.
    ///
    /// No existence check is made; a duplicate name surfaces whatever the
    /// engine reports.
    pub async fn create_space(&self, name: &str, config: &SpaceConfig) -> VectorResult<bool> {
        config.validate()?;

        let request = TransportRequest::put(
            self.config()
                .master(&["space", self.db_name(), "_create"]),
        )
        .with_body(space_schema(name, config));

        let response = self.send(request).await?;
        Ok(normalizer::checked("Create space", name, &response))
    }

    /// Fetch the space descriptor as reported by the engine.
    pub async fn inspect_space(&self, name: &str) -> VectorResult<Value> {
        let response = self
            .send(TransportRequest::get(
                self.config().master(&["space", self.db_name(), name]),
            ))
            .await?;
        normalizer::checked("Check space", name, &response);
        Ok(response)
    }

    pub async fn delete_space(&self, name: &str) -> VectorResult<Value> {
        let response = self
            .send(TransportRequest::delete(
                self.config().master(&["space", self.db_name(), name]),
            ))
            .await?;
        normalizer::checked("Delete space", name, &response);
        Ok(response)
    }
}

use serde::Deserialize;
use serde_json::{Value, json};

use super::normalizer::{self, Verdict};
use super::transport::{Transport, TransportRequest};
use super::VearchClient;
use crate::error::VectorResult;

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    data: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

fn names(response: Value) -> Vec<String> {
    serde_json::from_value::<Listing>(response)
        .map(|listing| listing.data.into_iter().map(|n| n.name).collect())
        .unwrap_or_default()
}

impl<T: Transport> VearchClient<T> {
    /// Create the configured database unless it is already listed.
    ///
    /// Listing failures, whether transport or engine side, are logged as
    /// warnings and the database is left unverified.
    pub(crate) async fn ensure_database(&self) -> VectorResult<()> {
        let db_name = self.db_name();
        let listing = match self
            .send(TransportRequest::get(self.config().master(&["list", "db"])))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(db = db_name, "Listing databases failed: {}", e);
                return Ok(());
            }
        };

        match normalizer::classify(&listing) {
            Verdict::Success { .. } => {}
            verdict => {
                tracing::warn!(db = db_name, "Listing databases failed: {}", verdict.message());
                return Ok(());
            }
        }

        if names(listing).iter().any(|name| name == db_name) {
            tracing::debug!(db = db_name, "Database already exists");
            return Ok(());
        }

        let response = self
            .send(
                TransportRequest::put(self.config().master(&["db", "_create"]))
                    .with_body(json!({ "name": db_name })),
            )
            .await?;
        normalizer::checked("Create database", db_name, &response);
        Ok(())
    }

    /// Fetch the database descriptor.
    pub async fn check_database(&self) -> VectorResult<Value> {
        let response = self
            .send(TransportRequest::get(
                self.config().master(&["db", self.db_name()]),
            ))
            .await?;
        normalizer::checked("Check database", self.db_name(), &response);
        Ok(response)
    }

    /// Delete every space of the database, then the database itself.
    ///
    /// Space deletions are best effort: a failure is logged and the next
    /// space is still attempted. Returns the verdict of the final delete.
    pub async fn destroy_database(&self) -> VectorResult<bool> {
        let db_name = self.db_name();
        let listing = self
            .send(
                TransportRequest::get(self.config().master(&["list", "space"]))
                    .with_query("db", db_name),
            )
            .await?;

        if normalizer::checked("List spaces", db_name, &listing) {
            for space in names(listing) {
                if let Err(e) = self.delete_space(&space).await {
                    tracing::warn!(db = db_name, space = %space, "Delete space {} failed: {}", space, e);
                }
            }
        }

        let response = self
            .send(TransportRequest::delete(
                self.config().master(&["db", db_name]),
            ))
            .await?;
        Ok(normalizer::checked("Delete database", db_name, &response))
    }
}

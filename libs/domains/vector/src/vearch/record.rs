use serde_json::Value;

use super::ids::derive_id;
use super::normalizer;
use super::transport::{Transport, TransportRequest};
use super::wire::{ByIdsBody, ByIdsQuery, ByIdsResponse, DocumentBody, DocumentState, Feature, RawDocument, WriteAck};
use super::VearchClient;
use crate::error::{VectorError, VectorResult};
use crate::models::{Lookup, Record, RecordPatch};

const FIELDS: [&str; 2] = ["text", "embed"];

impl<T: Transport> VearchClient<T> {
    /// Insert a record, deriving its id from `text` when none is given.
    ///
    /// Returns the id echoed by the engine, or `None` if the engine refused.
    pub async fn insert(
        &self,
        space: &str,
        text: &str,
        vector: &[f32],
        id: Option<&str>,
    ) -> VectorResult<Option<String>> {
        let id = id.map_or_else(|| derive_id(text), str::to_string);
        let body = DocumentBody {
            text: Some(text),
            embed: Some(Feature { feature: vector }),
        };

        let request = TransportRequest::post(self.config().router(space, &[&id]))
            .with_body(serde_json::to_value(&body)?);
        let response = self.send(request).await?;

        if !normalizer::checked("Insert data", &id, &response) {
            return Ok(None);
        }
        Ok(echoed_id(response, "Insert data", &id))
    }

    /// Partially update a record; omitted fields are left untouched.
    ///
    /// Passing neither `text` nor `vector` is rejected without a network call.
    pub async fn update(
        &self,
        space: &str,
        id: &str,
        text: Option<&str>,
        vector: Option<&[f32]>,
    ) -> VectorResult<Option<String>> {
        let Some(patch) = RecordPatch::new(text.map(str::to_string), vector.map(<[f32]>::to_vec))
        else {
            tracing::warn!(space, id, "Update warning: text and embed can not be both null!");
            return Err(VectorError::Validation(
                "update requires text, vector, or both".to_string(),
            ));
        };
        self.apply_patch(space, id, &patch).await
    }

    pub async fn apply_patch(
        &self,
        space: &str,
        id: &str,
        patch: &RecordPatch,
    ) -> VectorResult<Option<String>> {
        let body = DocumentBody {
            text: patch.text(),
            embed: patch.vector().map(|feature| Feature { feature }),
        };

        let request = TransportRequest::post(self.config().router(space, &[id, "_update"]))
            .with_body(serde_json::to_value(&body)?);
        let response = self.send(request).await?;

        if !normalizer::checked("Update data", id, &response) {
            return Ok(None);
        }
        Ok(echoed_id(response, "Update data", id))
    }

    /// Point lookup; `None` when the engine refuses or the id is unknown.
    pub async fn get(&self, space: &str, id: &str) -> VectorResult<Option<Record>> {
        let response = self
            .send(TransportRequest::get(self.config().router(space, &[id])))
            .await?;

        if !normalizer::checked("Query by id", id, &response) {
            return Ok(None);
        }

        let document: RawDocument = serde_json::from_value(response)?;
        match document.into_state() {
            DocumentState::Found(record) => Ok(Some(record)),
            DocumentState::NotFound => {
                tracing::info!(space, id, "Record not found");
                Ok(None)
            }
        }
    }

    /// Batch lookup. The result has one slot per requested id, in order.
    ///
    /// An empty list is returned only when the whole call is refused.
    pub async fn get_many(&self, space: &str, ids: &[String]) -> VectorResult<Vec<Lookup>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let body = ByIdsBody {
            query: ByIdsQuery { fields: FIELDS, ids },
        };
        let request = TransportRequest::post(self.config().router(space, &["_query_byids"]))
            .with_body(serde_json::to_value(&body)?);
        let response = self.send(request).await?;

        if !normalizer::checked("Query data by ids", space, &response) {
            return Ok(Vec::new());
        }

        let documents = serde_json::from_value::<ByIdsResponse>(response)?.into_documents();
        if documents.len() != ids.len() {
            return Err(VectorError::MalformedResponse(format!(
                "requested {} ids, engine answered {}",
                ids.len(),
                documents.len()
            )));
        }

        Ok(documents
            .into_iter()
            .map(|doc| match doc.into_state() {
                DocumentState::Found(record) => Lookup::Found(record),
                DocumentState::NotFound => Lookup::NotFound {},
            })
            .collect())
    }

    pub async fn delete(&self, space: &str, id: &str) -> VectorResult<bool> {
        let response = self
            .send(TransportRequest::delete(self.config().router(space, &[id])))
            .await?;
        Ok(normalizer::checked("Delete data", id, &response))
    }
}

fn echoed_id(response: Value, action: &str, id: &str) -> Option<String> {
    let echoed = serde_json::from_value::<WriteAck>(response)
        .ok()
        .and_then(|ack| ack.id);
    if echoed.is_none() {
        tracing::warn!(action, id, "Engine reply carried no _id");
    }
    echoed
}

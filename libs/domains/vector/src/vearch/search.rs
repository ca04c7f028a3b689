use serde_json::json;

use super::normalizer;
use super::transport::{Transport, TransportRequest};
use super::wire::{RetrievalParam, SearchBody, SearchClause, SearchResponse, SumTerm};
use super::VearchClient;
use crate::error::VectorResult;
use crate::models::{SearchHit, SearchQuery, similarity_from_raw};

impl<T: Transport> VearchClient<T> {
    /// Nearest-neighbour search over the `embed` field.
    ///
    /// Hits keep the engine's order, including its tie-breaking; scores are
    /// converted with [`similarity_from_raw`]. A refused call yields no hits.
    pub async fn search(&self, space: &str, query: &SearchQuery) -> VectorResult<Vec<SearchHit>> {
        let body = SearchBody {
            query: SearchClause {
                sum: [SumTerm {
                    field: "embed",
                    feature: &query.vector,
                    min_score: 0.0,
                    max_score: 2.0,
                    boost: 1.0,
                }],
                filter: [],
            },
            retrieval_param: RetrievalParam {
                nprobe: query.nprobe,
            },
            fields: ["text", "embed"],
            is_brute_search: 0,
            online_log_level: "debug",
            quick: false,
            vector_value: false,
            client_type: "leader",
            l2_sqrt: false,
            sort: [json!({"embed": {"order": "asc"}})],
            size: query.topk,
        };

        let request = TransportRequest::post(self.config().router(space, &["_search"]))
            .with_body(serde_json::to_value(&body)?);
        let response = self.send(request).await?;

        if !normalizer::checked("Search", space, &response) {
            return Ok(Vec::new());
        }

        let response: SearchResponse = serde_json::from_value(response)?;
        Ok(response
            .hits
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                id: hit.id,
                text: hit.source.text,
                score: similarity_from_raw(hit.score),
                vector: query.return_vector.then_some(hit.source.embed.feature),
            })
            .collect())
    }
}

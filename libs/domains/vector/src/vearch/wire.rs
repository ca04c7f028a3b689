//! Serde shapes of Vearch request and response bodies.
//!
//! Field names (`_id`, `_source`, `embed.feature`, `hits.hits`, `found`) must
//! match the engine byte for byte.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::{Record, SpaceConfig};

// ===== Requests =====

#[derive(Debug, Serialize)]
pub struct Feature<'a> {
    pub feature: &'a [f32],
}

#[derive(Debug, Serialize)]
pub struct DocumentBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Feature<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ByIdsBody<'a> {
    pub query: ByIdsQuery<'a>,
}

#[derive(Debug, Serialize)]
pub struct ByIdsQuery<'a> {
    pub fields: [&'static str; 2],
    pub ids: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct SearchBody<'a> {
    pub query: SearchClause<'a>,
    pub retrieval_param: RetrievalParam,
    pub fields: [&'static str; 2],
    pub is_brute_search: u8,
    pub online_log_level: &'static str,
    pub quick: bool,
    pub vector_value: bool,
    pub client_type: &'static str,
    pub l2_sqrt: bool,
    pub sort: [Value; 1],
    pub size: u32,
}

#[derive(Debug, Serialize)]
pub struct SearchClause<'a> {
    pub sum: [SumTerm<'a>; 1],
    pub filter: [Value; 0],
}

#[derive(Debug, Serialize)]
pub struct SumTerm<'a> {
    pub field: &'static str,
    pub feature: &'a [f32],
    pub min_score: f32,
    pub max_score: f32,
    pub boost: f32,
}

#[derive(Debug, Serialize)]
pub struct RetrievalParam {
    pub nprobe: u32,
}

/// Space creation request with the fixed text/embed schema.
pub fn space_schema(name: &str, config: &SpaceConfig) -> Value {
    serde_json::json!({
        "name": name,
        "partition_num": 1,
        "replica_num": 1,
        "engine": {
            "name": "gamma",
            "index_size": config.index_size,
            "id_type": "String",
            "retrieval_type": "IVFPQ",
            "retrieval_param": {
                "metric_type": "InnerProduct",
                "ncentroids": config.ncentroids,
                "nsubvector": config.nsubvector
            }
        },
        "properties": {
            "text": {
                "type": "keyword"
            },
            "embed": {
                "type": "vector",
                "dimension": config.dimension,
                "format": "normalization",
                "store_type": "RocksDB",
                "store_param": {
                    "cache_size": 512,
                    "compress": false
                }
            }
        }
    })
}

// ===== Responses =====

/// Ids come back as strings or integers depending on the space's id type.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unsupported id value: {}",
            other
        ))),
    }
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "unsupported id value: {}",
            other
        ))),
    }
}

/// Reply to insert/update: only the echoed id is used.
#[derive(Debug, Deserialize)]
pub struct WriteAck {
    #[serde(rename = "_id", default, deserialize_with = "optional_id")]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmbedSource {
    pub feature: Vec<f32>,
}

#[derive(Debug, Deserialize)]
pub struct Source {
    pub text: String,
    pub embed: EmbedSource,
}

/// One looked-up document as the engine reports it.
#[derive(Debug, Deserialize)]
pub struct RawDocument {
    #[serde(rename = "_id", default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub found: Option<bool>,
    #[serde(rename = "_source", default)]
    pub source: Option<Source>,
}

/// Document lookup outcome after interpreting `found` and `_source`.
#[derive(Debug)]
pub enum DocumentState {
    Found(Record),
    NotFound,
}

impl RawDocument {
    /// `found` defaults to true when absent but a `_source` is present.
    pub fn into_state(self) -> DocumentState {
        match (self.found, self.id, self.source) {
            (Some(false), _, _) => DocumentState::NotFound,
            (_, Some(id), Some(source)) => DocumentState::Found(Record {
                id,
                text: source.text,
                vector: source.embed.feature,
            }),
            _ => DocumentState::NotFound,
        }
    }
}

/// `_query_byids` answers a one-id batch with a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ByIdsResponse {
    Many(Vec<RawDocument>),
    One(RawDocument),
}

impl ByIdsResponse {
    pub fn into_documents(self) -> Vec<RawDocument> {
        match self {
            ByIdsResponse::Many(docs) => docs,
            ByIdsResponse::One(doc) => vec![doc],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
}

#[derive(Debug, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: f32,
    #[serde(rename = "_source")]
    pub source: Source,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_body_partial_fields() {
        let body = DocumentBody {
            text: None,
            embed: Some(Feature {
                feature: &[0.1, 0.2],
            }),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({"embed": {"feature": [0.1f32, 0.2f32]}}));
        assert!(value.get("text").is_none());
    }

    #[test]
    fn test_space_schema_shape() {
        let schema = space_schema("faq", &SpaceConfig::new(4));
        assert_eq!(schema["name"], "faq");
        assert_eq!(schema["partition_num"], 1);
        assert_eq!(schema["replica_num"], 1);
        assert_eq!(schema["engine"]["index_size"], 8192);
        assert_eq!(schema["engine"]["retrieval_param"]["metric_type"], "InnerProduct");
        assert_eq!(schema["engine"]["retrieval_param"]["ncentroids"], 2048);
        assert_eq!(schema["engine"]["retrieval_param"]["nsubvector"], 2);
        assert_eq!(schema["properties"]["text"]["type"], "keyword");
        assert_eq!(schema["properties"]["embed"]["dimension"], 4);
        assert_eq!(schema["properties"]["embed"]["format"], "normalization");
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let ack: WriteAck = serde_json::from_value(json!({"_id": -5899907996241850837i64})).unwrap();
        assert_eq!(ack.id.as_deref(), Some("-5899907996241850837"));

        let ack: WriteAck = serde_json::from_value(json!({"status": 200})).unwrap();
        assert!(ack.id.is_none());
    }

    #[test]
    fn test_by_ids_single_object_is_wrapped() {
        let response: ByIdsResponse = serde_json::from_value(json!({
            "_id": "a", "found": true,
            "_source": {"text": "t", "embed": {"feature": [1.0]}}
        }))
        .unwrap();
        assert_eq!(response.into_documents().len(), 1);

        let response: ByIdsResponse =
            serde_json::from_value(json!([{"_id": "a", "found": false}, {"_id": "b", "found": false}]))
                .unwrap();
        assert_eq!(response.into_documents().len(), 2);
    }

    #[test]
    fn test_not_found_document_state() {
        let doc: RawDocument = serde_json::from_value(json!({"_id": "x", "found": false})).unwrap();
        assert!(matches!(doc.into_state(), DocumentState::NotFound));
    }
}

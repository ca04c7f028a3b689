use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{VectorError, VectorResult};

pub const DEFAULT_INDEX_SIZE: u32 = 8192;
pub const DEFAULT_NCENTROIDS: u32 = 2048;
pub const DEFAULT_NSUBVECTOR: u32 = 2;
pub const DEFAULT_NPROBE: u32 = 20;

/// Space index configuration.
///
/// Partition/replica topology and the inner-product metric are fixed; only
/// the dimension and the IVFPQ sizing are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SpaceConfig {
    pub dimension: u32,
    pub index_size: u32,
    pub ncentroids: u32,
    pub nsubvector: u32,
}

impl SpaceConfig {
    pub fn new(dimension: u32) -> Self {
        Self {
            dimension,
            index_size: DEFAULT_INDEX_SIZE,
            ncentroids: DEFAULT_NCENTROIDS,
            nsubvector: DEFAULT_NSUBVECTOR,
        }
    }

    pub fn with_index_size(mut self, index_size: u32) -> Self {
        self.index_size = index_size;
        self
    }

    pub fn with_ncentroids(mut self, ncentroids: u32) -> Self {
        self.ncentroids = ncentroids;
        self
    }

    pub fn with_nsubvector(mut self, nsubvector: u32) -> Self {
        self.nsubvector = nsubvector;
        self
    }

    pub fn validate(&self) -> VectorResult<()> {
        let fields = [
            ("dimension", self.dimension),
            ("index_size", self.index_size),
            ("ncentroids", self.ncentroids),
            ("nsubvector", self.nsubvector),
        ];
        match fields.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(VectorError::Validation(format!(
                "{} must be greater than zero",
                name
            ))),
            None => Ok(()),
        }
    }
}

/// A stored text with its embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Record {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub vector: Vec<f32>,
}

/// One slot of a batch lookup.
///
/// `NotFound` serializes as `{}` so positions stay aligned with the requested ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lookup {
    Found(Record),
    NotFound {},
}

impl Lookup {
    pub fn record(&self) -> Option<&Record> {
        match self {
            Lookup::Found(record) => Some(record),
            Lookup::NotFound {} => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Partial update of a record. At least one field is always present.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPatch {
    Text(String),
    Vector(Vec<f32>),
    Both { text: String, vector: Vec<f32> },
}

impl RecordPatch {
    /// Returns `None` when neither field is given.
    pub fn new(text: Option<String>, vector: Option<Vec<f32>>) -> Option<Self> {
        match (text, vector) {
            (Some(text), Some(vector)) => Some(RecordPatch::Both { text, vector }),
            (Some(text), None) => Some(RecordPatch::Text(text)),
            (None, Some(vector)) => Some(RecordPatch::Vector(vector)),
            (None, None) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            RecordPatch::Text(text) | RecordPatch::Both { text, .. } => Some(text),
            RecordPatch::Vector(_) => None,
        }
    }

    pub fn vector(&self) -> Option<&[f32]> {
        match self {
            RecordPatch::Vector(vector) | RecordPatch::Both { vector, .. } => Some(vector),
            RecordPatch::Text(_) => None,
        }
    }
}

/// Similarity query parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchQuery {
    pub vector: Vec<f32>,
    pub topk: u32,
    #[serde(default = "default_nprobe")]
    pub nprobe: u32,
    #[serde(default = "default_true")]
    pub return_vector: bool,
}

fn default_nprobe() -> u32 {
    DEFAULT_NPROBE
}

fn default_true() -> bool {
    true
}

impl SearchQuery {
    pub fn new(vector: Vec<f32>, topk: u32) -> Self {
        Self {
            vector,
            topk,
            nprobe: DEFAULT_NPROBE,
            return_vector: true,
        }
    }

    pub fn with_nprobe(mut self, nprobe: u32) -> Self {
        self.nprobe = nprobe;
        self
    }

    pub fn with_vectors(mut self, return_vector: bool) -> Self {
        self.return_vector = return_vector;
        self
    }
}

/// Search result, in the engine's order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vector: Option<Vec<f32>>,
}

/// Map the engine's raw inner-product distance (0..=2 for normalized
/// vectors) onto a similarity where 1.0 means identical direction.
pub fn similarity_from_raw(raw_score: f32) -> f32 {
    1.0 - raw_score / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_similarity_from_raw() {
        assert_eq!(similarity_from_raw(0.0), 1.0);
        assert_eq!(similarity_from_raw(2.0), 0.0);
        assert_eq!(similarity_from_raw(1.0), 0.5);
    }

    #[test]
    fn test_space_config_defaults() {
        let config = SpaceConfig::new(768);
        assert_eq!(config.dimension, 768);
        assert_eq!(config.index_size, 8192);
        assert_eq!(config.ncentroids, 2048);
        assert_eq!(config.nsubvector, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_space_config_rejects_zero() {
        let err = SpaceConfig::new(4).with_ncentroids(0).validate().unwrap_err();
        assert!(err.to_string().contains("ncentroids"));

        let err = SpaceConfig::new(0).validate().unwrap_err();
        assert!(err.to_string().contains("dimension"));
    }

    #[test]
    fn test_record_patch_requires_a_field() {
        assert!(RecordPatch::new(None, None).is_none());

        let patch = RecordPatch::new(None, Some(vec![0.1])).unwrap();
        assert_eq!(patch.text(), None);
        assert_eq!(patch.vector(), Some(&[0.1f32][..]));

        let patch = RecordPatch::new(Some("t".into()), Some(vec![0.1])).unwrap();
        assert_eq!(patch.text(), Some("t"));
        assert!(patch.vector().is_some());
    }

    #[test]
    fn test_lookup_serialization() {
        let missing = serde_json::to_value(Lookup::NotFound {}).unwrap();
        assert_eq!(missing, json!({}));

        let found = serde_json::to_value(Lookup::Found(Record {
            id: "a".into(),
            text: "t".into(),
            vector: vec![1.0],
        }))
        .unwrap();
        assert_eq!(found, json!({"_id": "a", "text": "t", "vector": [1.0]}));
    }

    #[test]
    fn test_search_hit_omits_missing_vector() {
        let hit = SearchHit {
            id: "a".into(),
            text: "t".into(),
            score: 0.5,
            vector: None,
        };
        assert_eq!(
            serde_json::to_value(hit).unwrap(),
            json!({"_id": "a", "text": "t", "score": 0.5})
        );
    }
}

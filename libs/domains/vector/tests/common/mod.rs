//! In-memory stand-ins for a Vearch cluster and a text encoder.
//!
//! `FakeVearch` answers the same URLs and payload shapes the client sends
//! and keeps every request it saw, so tests can assert on traffic as well as
//! on state.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain_vector::vearch::{HttpMethod, Transport, TransportRequest, VearchConfig};
use domain_vector::{EmbeddingProvider, VectorError, VectorResult};
use serde_json::{Value, json};

pub const MASTER: &str = "http://master";
pub const ROUTER: &str = "http://router";
pub const DB: &str = "test_db";

pub fn config() -> VearchConfig {
    VearchConfig::new(MASTER.to_string(), ROUTER.to_string(), DB.to_string())
}

#[derive(Debug, Clone)]
struct Doc {
    text: String,
    embed: Vec<f32>,
}

#[derive(Debug, Default)]
struct Space {
    dimension: usize,
    docs: BTreeMap<String, Doc>,
}

#[derive(Debug, Default)]
struct State {
    databases: HashMap<String, BTreeMap<String, Space>>,
    requests: Vec<TransportRequest>,
    offline: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeVearch {
    state: Arc<Mutex<State>>,
}

fn refuse(reason: &str) -> Value {
    json!({"error": {"reason": reason}})
}

fn ok(data: Value) -> Value {
    json!({"code": 200, "msg": "success", "data": data})
}

impl FakeVearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cluster that already holds `db`.
    pub fn with_database(db: &str) -> Self {
        let fake = Self::new();
        fake.state
            .lock()
            .unwrap()
            .databases
            .insert(db.to_string(), BTreeMap::new());
        fake
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn has_database(&self, db: &str) -> bool {
        self.state.lock().unwrap().databases.contains_key(db)
    }

    pub fn space_names(&self, db: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .databases
            .get(db)
            .map(|spaces| spaces.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn stored_text(&self, db: &str, space: &str, id: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .databases
            .get(db)?
            .get(space)?
            .docs
            .get(id)
            .map(|doc| doc.text.clone())
    }

    fn handle(state: &mut State, request: &TransportRequest) -> Value {
        if let Some(path) = request.url.strip_prefix(MASTER) {
            let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
            Self::master(state, request, &segments)
        } else if let Some(path) = request.url.strip_prefix(ROUTER) {
            let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
            Self::router(state, request, &segments)
        } else {
            refuse("unknown host")
        }
    }

    fn master(state: &mut State, request: &TransportRequest, segments: &[&str]) -> Value {
        match (request.method, segments) {
            (HttpMethod::Get, ["list", "db"]) => {
                let names: Vec<Value> = state
                    .databases
                    .keys()
                    .map(|name| json!({"name": name}))
                    .collect();
                ok(Value::Array(names))
            }
            (HttpMethod::Put, ["db", "_create"]) => {
                let name = request
                    .body
                    .as_ref()
                    .and_then(|b| b["name"].as_str())
                    .unwrap_or_default()
                    .to_string();
                state.databases.entry(name.clone()).or_default();
                ok(json!({"name": name}))
            }
            (HttpMethod::Get, ["db", db]) => match state.databases.get(*db) {
                Some(_) => ok(json!({"name": db})),
                None => json!({"code": 562, "msg": "db not exist"}),
            },
            (HttpMethod::Delete, ["db", db]) => match state.databases.get(*db) {
                Some(spaces) if !spaces.is_empty() => refuse("db has spaces"),
                Some(_) => {
                    state.databases.remove(*db);
                    ok(Value::Null)
                }
                None => refuse("db not exist"),
            },
            (HttpMethod::Get, ["list", "space"]) => {
                let db = request
                    .query
                    .iter()
                    .find(|(k, _)| k == "db")
                    .map(|(_, v)| v.as_str())
                    .unwrap_or_default();
                match state.databases.get(db) {
                    Some(spaces) => ok(Value::Array(
                        spaces.keys().map(|name| json!({"name": name})).collect(),
                    )),
                    None => refuse("db not exist"),
                }
            }
            (HttpMethod::Put, ["space", db, "_create"]) => {
                let Some(spaces) = state.databases.get_mut(*db) else {
                    return refuse("db not exist");
                };
                let body = request.body.clone().unwrap_or_default();
                let name = body["name"].as_str().unwrap_or_default().to_string();
                if spaces.contains_key(&name) {
                    return refuse("space already exists");
                }
                let dimension = body["properties"]["embed"]["dimension"]
                    .as_u64()
                    .unwrap_or_default() as usize;
                spaces.insert(
                    name.clone(),
                    Space {
                        dimension,
                        docs: BTreeMap::new(),
                    },
                );
                ok(json!({"name": name}))
            }
            (HttpMethod::Get, ["space", db, name]) => {
                match state.databases.get(*db).and_then(|s| s.get(*name)) {
                    Some(space) => ok(json!({"name": name, "dimension": space.dimension})),
                    None => refuse("space not found"),
                }
            }
            (HttpMethod::Delete, ["space", db, name]) => {
                match state.databases.get_mut(*db).and_then(|s| s.remove(*name)) {
                    Some(_) => ok(Value::Null),
                    None => refuse("space not found"),
                }
            }
            _ => refuse("unsupported master call"),
        }
    }

    fn router(state: &mut State, request: &TransportRequest, segments: &[&str]) -> Value {
        let [db, space_name, rest @ ..] = segments else {
            return refuse("bad router path");
        };
        let Some(space) = state
            .databases
            .get_mut(*db)
            .and_then(|spaces| spaces.get_mut(*space_name))
        else {
            return refuse("space not found");
        };
        let body = request.body.clone().unwrap_or_default();

        match (request.method, rest) {
            (HttpMethod::Post, ["_search"]) => {
                let term = &body["query"]["sum"][0];
                let feature = floats(&term["feature"]);
                if feature.len() != space.dimension {
                    return refuse("query vector dimension mismatch");
                }
                let size = body["size"].as_u64().unwrap_or(1) as usize;
                let mut scored: Vec<(f32, &String, &Doc)> = space
                    .docs
                    .iter()
                    .map(|(id, doc)| {
                        let dot: f32 = doc.embed.iter().zip(&feature).map(|(a, b)| a * b).sum();
                        (1.0 - dot, id, doc)
                    })
                    .collect();
                scored.sort_by(|a, b| a.0.total_cmp(&b.0));
                let hits: Vec<Value> = scored
                    .into_iter()
                    .take(size)
                    .map(|(score, id, doc)| {
                        json!({
                            "_id": id,
                            "_score": score,
                            "_source": {"text": doc.text, "embed": {"feature": doc.embed}}
                        })
                    })
                    .collect();
                json!({"took": 1, "timed_out": false, "hits": {"total": hits.len(), "hits": hits}})
            }
            (HttpMethod::Post, ["_query_byids"]) => {
                let ids: Vec<String> = body["query"]["ids"]
                    .as_array()
                    .map(|ids| {
                        ids.iter()
                            .filter_map(|id| id.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();
                let docs: Vec<Value> = ids
                    .iter()
                    .map(|id| document(id, space.docs.get(id)))
                    .collect();
                match docs.as_slice() {
                    [single] => single.clone(),
                    _ => Value::Array(docs),
                }
            }
            (HttpMethod::Post, [id, "_update"]) => {
                let Some(doc) = space.docs.get_mut(*id) else {
                    return refuse("document not found");
                };
                if let Some(feature) = body.get("embed").map(|e| floats(&e["feature"])) {
                    if feature.len() != space.dimension {
                        return refuse("vector dimension mismatch");
                    }
                    doc.embed = feature;
                }
                if let Some(text) = body.get("text").and_then(Value::as_str) {
                    doc.text = text.to_string();
                }
                json!({"_id": id, "status": 200, "result": "updated"})
            }
            (HttpMethod::Post, [id]) => {
                let feature = floats(&body["embed"]["feature"]);
                if feature.len() != space.dimension {
                    return refuse("vector dimension mismatch");
                }
                let created = !space.docs.contains_key(*id);
                space.docs.insert(
                    id.to_string(),
                    Doc {
                        text: body["text"].as_str().unwrap_or_default().to_string(),
                        embed: feature,
                    },
                );
                json!({
                    "_id": id,
                    "status": if created { 201 } else { 200 },
                    "result": if created { "created" } else { "updated" }
                })
            }
            (HttpMethod::Get, [id]) => document(id, space.docs.get(*id)),
            (HttpMethod::Delete, [id]) => match space.docs.remove(*id) {
                Some(_) => json!({"_id": id, "status": 200, "result": "deleted"}),
                None => refuse("document not found"),
            },
            _ => refuse("unsupported router call"),
        }
    }
}

fn floats(value: &Value) -> Vec<f32> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_f64)
                .map(|f| f as f32)
                .collect()
        })
        .unwrap_or_default()
}

fn document(id: &str, doc: Option<&Doc>) -> Value {
    match doc {
        Some(doc) => json!({
            "_id": id,
            "found": true,
            "_source": {"text": doc.text, "embed": {"feature": doc.embed}}
        }),
        None => json!({"_id": id, "found": false}),
    }
}

#[async_trait]
impl Transport for FakeVearch {
    async fn send(&self, request: TransportRequest) -> VectorResult<Value> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        if state.offline {
            return Err(VectorError::Transport("connection refused".to_string()));
        }
        Ok(Self::handle(&mut state, &request))
    }
}

/// Deterministic encoder: character codes are folded into `dimension` buckets.
#[derive(Debug, Clone)]
pub struct FakeEncoder {
    pub dimension: u32,
}

impl FakeEncoder {
    pub fn new(dimension: u32) -> Self {
        Self { dimension }
    }

    pub fn raw(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension as usize];
        for (i, c) in text.chars().enumerate() {
            let bucket = (c as usize + i) % vector.len();
            vector[bucket] += 1.0 + (c as u32 % 7) as f32;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEncoder {
    fn dimension(&self) -> u32 {
        self.dimension
    }

    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>> {
        Ok(self.raw(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.raw(t)).collect())
    }
}

/// Unit vector along axis `i`.
pub fn axis(dimension: usize, i: usize) -> Vec<f32> {
    let mut v = vec![0.0; dimension];
    v[i] = 1.0;
    v
}

//! REST handlers for encoding, spaces and records

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use crate::error::VectorResult;
use crate::models::{Lookup, Record, SearchHit};
use crate::repository::VectorRepository;
use crate::service::VectorService;

// ===== Request/Response DTOs =====

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EncodeParams {
    /// Text to encode
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SimilarityParams {
    pub text1: String,
    pub text2: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InsertParams {
    pub text: String,
    /// Record id; derived from the text when omitted
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateParams {
    pub text: String,
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdParams {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "default_topk")]
    pub topk: u32,
    #[serde(default)]
    pub return_vector: bool,
}

fn default_topk() -> u32 {
    1
}

/// Body of `POST /query_by_ids/{space}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryByIdsRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EncodeResponse {
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SimilarityResponse {
    pub score: f32,
}

fn outcome(ok: bool) -> Json<&'static str> {
    Json(if ok { "success" } else { "failed" })
}

// ===== Encoding =====

/// Encode text into a normalized vector
#[utoipa::path(
    get,
    path = "/encode",
    tag = "encoder",
    params(EncodeParams),
    responses(
        (status = 200, description = "Normalized embedding", body = EncodeResponse),
        (status = 500, description = "Encoder failure")
    )
)]
#[instrument(skip(service))]
pub async fn encode<R: VectorRepository>(
    State(service): State<Arc<VectorService<R>>>,
    Query(params): Query<EncodeParams>,
) -> VectorResult<Json<EncodeResponse>> {
    let vector = service.encode(&params.text).await?;
    Ok(Json(EncodeResponse { vector }))
}

/// Cosine similarity of two texts
#[utoipa::path(
    get,
    path = "/similarity",
    tag = "encoder",
    params(SimilarityParams),
    responses(
        (status = 200, description = "Similarity score", body = SimilarityResponse),
        (status = 500, description = "Encoder failure")
    )
)]
#[instrument(skip(service))]
pub async fn similarity<R: VectorRepository>(
    State(service): State<Arc<VectorService<R>>>,
    Query(params): Query<SimilarityParams>,
) -> VectorResult<Json<SimilarityResponse>> {
    let score = service.similarity(&params.text1, &params.text2).await?;
    Ok(Json(SimilarityResponse { score }))
}

// ===== Space Management =====

/// Create a space sized for the encoder
#[utoipa::path(
    put,
    path = "/create_space/{name}",
    tag = "spaces",
    params(("name" = String, Path, description = "Space name")),
    responses(
        (status = 200, description = "\"success\" or \"failed\"", body = String),
        (status = 503, description = "Vearch unreachable")
    )
)]
#[instrument(skip(service))]
pub async fn create_space<R: VectorRepository>(
    State(service): State<Arc<VectorService<R>>>,
    Path(name): Path<String>,
) -> VectorResult<Json<&'static str>> {
    Ok(outcome(service.create_space(&name).await?))
}

/// Raw space descriptor from the master
#[utoipa::path(
    get,
    path = "/check_space/{name}",
    tag = "spaces",
    params(("name" = String, Path, description = "Space name")),
    responses(
        (status = 200, description = "Engine reply", body = Object),
        (status = 503, description = "Vearch unreachable")
    )
)]
#[instrument(skip(service))]
pub async fn check_space<R: VectorRepository>(
    State(service): State<Arc<VectorService<R>>>,
    Path(name): Path<String>,
) -> VectorResult<Json<Value>> {
    Ok(Json(service.inspect_space(&name).await?))
}

#[utoipa::path(
    delete,
    path = "/delete_space/{name}",
    tag = "spaces",
    params(("name" = String, Path, description = "Space name")),
    responses(
        (status = 200, description = "Engine reply", body = Object),
        (status = 503, description = "Vearch unreachable")
    )
)]
#[instrument(skip(service))]
pub async fn delete_space<R: VectorRepository>(
    State(service): State<Arc<VectorService<R>>>,
    Path(name): Path<String>,
) -> VectorResult<Json<Value>> {
    Ok(Json(service.delete_space(&name).await?))
}

// ===== Record Operations =====

/// Encode and insert one text
#[utoipa::path(
    post,
    path = "/insert_data/{space}",
    tag = "records",
    params(("space" = String, Path, description = "Space name"), InsertParams),
    responses(
        (status = 200, description = "Record id, or null when refused", body = Option<String>),
        (status = 503, description = "Vearch unreachable")
    )
)]
#[instrument(skip(service))]
pub async fn insert_data<R: VectorRepository>(
    State(service): State<Arc<VectorService<R>>>,
    Path(space): Path<String>,
    Query(params): Query<InsertParams>,
) -> VectorResult<Json<Option<String>>> {
    let id = service.insert_text(&space, &params.text, params.id).await?;
    Ok(Json(id))
}

/// Replace a record's text and embedding
#[utoipa::path(
    post,
    path = "/update_data/{space}",
    tag = "records",
    params(("space" = String, Path, description = "Space name"), UpdateParams),
    responses(
        (status = 200, description = "Record id, or null when refused", body = Option<String>),
        (status = 503, description = "Vearch unreachable")
    )
)]
#[instrument(skip(service))]
pub async fn update_data<R: VectorRepository>(
    State(service): State<Arc<VectorService<R>>>,
    Path(space): Path<String>,
    Query(params): Query<UpdateParams>,
) -> VectorResult<Json<Option<String>>> {
    let id = service.update_text(&space, &params.id, &params.text).await?;
    Ok(Json(id))
}

#[utoipa::path(
    get,
    path = "/query_by_id/{space}",
    tag = "records",
    params(("space" = String, Path, description = "Space name"), IdParams),
    responses(
        (status = 200, description = "Record, or null when absent", body = Option<Record>),
        (status = 503, description = "Vearch unreachable")
    )
)]
#[instrument(skip(service))]
pub async fn query_by_id<R: VectorRepository>(
    State(service): State<Arc<VectorService<R>>>,
    Path(space): Path<String>,
    Query(params): Query<IdParams>,
) -> VectorResult<Json<Option<Record>>> {
    Ok(Json(service.get(&space, &params.id).await?))
}

/// Batch lookup; one slot per id, `{}` for missing records
#[utoipa::path(
    post,
    path = "/query_by_ids/{space}",
    tag = "records",
    params(("space" = String, Path, description = "Space name")),
    request_body = QueryByIdsRequest,
    responses(
        (status = 200, description = "Records in request order", body = Vec<Object>),
        (status = 503, description = "Vearch unreachable")
    )
)]
#[instrument(skip(service))]
pub async fn query_by_ids<R: VectorRepository>(
    State(service): State<Arc<VectorService<R>>>,
    Path(space): Path<String>,
    Json(request): Json<QueryByIdsRequest>,
) -> VectorResult<Json<Vec<Lookup>>> {
    Ok(Json(service.get_many(&space, request.ids).await?))
}

/// Semantic search
#[utoipa::path(
    get,
    path = "/search/{space}",
    tag = "records",
    params(("space" = String, Path, description = "Space name"), SearchParams),
    responses(
        (status = 200, description = "Hits in engine order", body = Vec<SearchHit>),
        (status = 400, description = "Invalid topk"),
        (status = 503, description = "Vearch unreachable")
    )
)]
#[instrument(skip(service))]
pub async fn search<R: VectorRepository>(
    State(service): State<Arc<VectorService<R>>>,
    Path(space): Path<String>,
    Query(params): Query<SearchParams>,
) -> VectorResult<Json<Vec<SearchHit>>> {
    let hits = service
        .search_text(&space, &params.query, params.topk, params.return_vector)
        .await?;
    Ok(Json(hits))
}

#[utoipa::path(
    delete,
    path = "/delete_data/{space}",
    tag = "records",
    params(("space" = String, Path, description = "Space name"), IdParams),
    responses(
        (status = 200, description = "\"success\" or \"failed\"", body = String),
        (status = 503, description = "Vearch unreachable")
    )
)]
#[instrument(skip(service))]
pub async fn delete_data<R: VectorRepository>(
    State(service): State<Arc<VectorService<R>>>,
    Path(space): Path<String>,
    Query(params): Query<IdParams>,
) -> VectorResult<Json<&'static str>> {
    Ok(outcome(service.delete(&space, &params.id).await?))
}

mod semantic;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{Record, SearchHit};
use crate::repository::VectorRepository;
use crate::service::VectorService;

// Re-export HTTP model types
pub use semantic::{
    EncodeParams, EncodeResponse, IdParams, InsertParams, QueryByIdsRequest, SearchParams,
    SimilarityParams, SimilarityResponse, UpdateParams,
};

/// OpenAPI documentation for the semantic encoder API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SemanticEncoder",
        description = "Encode texts, compare them and run semantic search over Vearch spaces",
        license(name = "Apache 2.0", url = "https://www.apache.org/licenses/LICENSE-2.0.html")
    ),
    paths(
        semantic::encode,
        semantic::similarity,
        semantic::create_space,
        semantic::check_space,
        semantic::delete_space,
        semantic::insert_data,
        semantic::update_data,
        semantic::query_by_id,
        semantic::query_by_ids,
        semantic::search,
        semantic::delete_data,
    ),
    components(
        schemas(
            EncodeResponse, SimilarityResponse, QueryByIdsRequest,
            Record, SearchHit
        )
    ),
    tags(
        (name = "encoder", description = "Text encoding and similarity"),
        (name = "spaces", description = "Vearch space management"),
        (name = "records", description = "Record storage and semantic search")
    )
)]
pub struct VectorApiDoc;

/// Create router for the semantic encoder handlers
pub fn router<R: VectorRepository + 'static>(service: Arc<VectorService<R>>) -> Router {
    Router::new()
        .route("/encode", get(semantic::encode::<R>))
        .route("/similarity", get(semantic::similarity::<R>))
        .route("/create_space/{name}", put(semantic::create_space::<R>))
        .route("/check_space/{name}", get(semantic::check_space::<R>))
        .route("/delete_space/{name}", delete(semantic::delete_space::<R>))
        .route("/insert_data/{space}", post(semantic::insert_data::<R>))
        .route("/update_data/{space}", post(semantic::update_data::<R>))
        .route("/query_by_id/{space}", get(semantic::query_by_id::<R>))
        .route("/query_by_ids/{space}", post(semantic::query_by_ids::<R>))
        .route("/search/{space}", get(semantic::search::<R>))
        .route("/delete_data/{space}", delete(semantic::delete_data::<R>))
        .with_state(service)
}

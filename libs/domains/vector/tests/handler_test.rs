//! Handler tests for the semantic encoder routes
//!
//! Requests go through the real router, service and Vearch client; only the
//! cluster and the encoder are in-memory.

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{DB, FakeEncoder, FakeVearch, config};
use domain_vector::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

const DIM: u32 = 8;

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn app() -> (FakeVearch, Router) {
    let fake = FakeVearch::with_database(DB);
    let client = VearchClient::with_transport(config(), fake.clone())
        .await
        .unwrap();
    let service = VectorService::new(client, Arc::new(FakeEncoder::new(DIM)));
    (fake, handlers::router(Arc::new(service)))
}

async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, json_body(response.into_body()).await)
}

#[tokio::test]
async fn test_encode_returns_unit_vector() {
    let (_fake, app) = app().await;

    let (status, body) = call(&app, "GET", "/encode?text=hello%20world").await;
    assert_eq!(status, StatusCode::OK);

    let vector: Vec<f32> = serde_json::from_value(body["vector"].clone()).unwrap();
    assert_eq!(vector.len(), DIM as usize);
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_similarity_is_symmetric() {
    let (_fake, app) = app().await;

    let (_, forward) = call(&app, "GET", "/similarity?text1=apple&text2=grape").await;
    let (_, backward) = call(&app, "GET", "/similarity?text1=grape&text2=apple").await;
    assert_eq!(forward["score"], backward["score"]);

    let (_, same) = call(&app, "GET", "/similarity?text1=apple&text2=apple").await;
    assert!((same["score"].as_f64().unwrap() - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_create_check_delete_space() {
    let (fake, app) = app().await;

    let (status, body) = call(&app, "PUT", "/create_space/faq").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("success"));

    let (_, body) = call(&app, "PUT", "/create_space/faq").await;
    assert_eq!(body, json!("failed"));

    let (_, body) = call(&app, "GET", "/check_space/faq").await;
    assert_eq!(body["data"]["dimension"], DIM);

    let (status, _) = call(&app, "DELETE", "/delete_space/faq").await;
    assert_eq!(status, StatusCode::OK);
    assert!(fake.space_names(DB).is_empty());
}

#[tokio::test]
async fn test_insert_query_and_delete_data() {
    let (_fake, app) = app().await;
    call(&app, "PUT", "/create_space/faq").await;

    let (status, id) = call(&app, "POST", "/insert_data/faq?text=expense%20report").await;
    assert_eq!(status, StatusCode::OK);
    let id = id.as_str().unwrap().to_string();
    assert_eq!(id, vearch::derive_id("expense report"));

    let (_, record) = call(&app, "GET", &format!("/query_by_id/faq?id={}", id)).await;
    assert_eq!(record["_id"], id.as_str());
    assert_eq!(record["text"], "expense report");

    let (_, body) = call(&app, "DELETE", &format!("/delete_data/faq?id={}", id)).await;
    assert_eq!(body, json!("success"));

    let (_, record) = call(&app, "GET", &format!("/query_by_id/faq?id={}", id)).await;
    assert_eq!(record, Value::Null);

    let (_, body) = call(&app, "DELETE", &format!("/delete_data/faq?id={}", id)).await;
    assert_eq!(body, json!("failed"));
}

#[tokio::test]
async fn test_update_data_replaces_text() {
    let (fake, app) = app().await;
    call(&app, "PUT", "/create_space/faq").await;
    call(&app, "POST", "/insert_data/faq?text=old&id=r1").await;

    let (_, id) = call(&app, "POST", "/update_data/faq?text=new&id=r1").await;
    assert_eq!(id, json!("r1"));
    assert_eq!(fake.stored_text(DB, "faq", "r1").as_deref(), Some("new"));
}

#[tokio::test]
async fn test_query_by_ids_keeps_slots() {
    let (_fake, app) = app().await;
    call(&app, "PUT", "/create_space/faq").await;
    call(&app, "POST", "/insert_data/faq?text=first&id=a").await;
    call(&app, "POST", "/insert_data/faq?text=second&id=b").await;

    let request = Request::builder()
        .method("POST")
        .uri("/query_by_ids/faq")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({"ids": ["b", "nope", "a"]})).unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Vec<Value> = json_body(response.into_body()).await;
    assert_eq!(body.len(), 3);
    assert_eq!(body[0]["text"], "second");
    assert_eq!(body[1], json!({}));
    assert_eq!(body[2]["_id"], "a");
}

#[tokio::test]
async fn test_search_finds_inserted_text() {
    let (_fake, app) = app().await;
    call(&app, "PUT", "/create_space/faq").await;
    call(&app, "POST", "/insert_data/faq?text=reset%20password").await;
    call(&app, "POST", "/insert_data/faq?text=zzzz").await;

    let (status, hits) = call(&app, "GET", "/search/faq?query=reset%20password&topk=2").await;
    assert_eq!(status, StatusCode::OK);

    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["text"], "reset password");
    assert!((hits[0]["score"].as_f64().unwrap() - 1.0).abs() < 1e-5);
    assert!(hits[0].get("vector").is_none());

    let (_, hits) = call(&app, "GET", "/search/faq?query=zzzz&return_vector=true").await;
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0]["vector"].is_array());
}

#[tokio::test]
async fn test_search_rejects_zero_topk() {
    let (_fake, app) = app().await;
    call(&app, "PUT", "/create_space/faq").await;

    let (status, _) = call(&app, "GET", "/search/faq?query=x&topk=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreachable_vearch_is_503() {
    let (fake, app) = app().await;
    fake.set_offline(true);

    let (status, body) = call(&app, "GET", "/query_by_id/faq?id=x").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
}

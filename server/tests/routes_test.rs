use std::{path::PathBuf, sync::Arc};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use server::{
    catalog::Catalog,
    config::Config,
    models::FoodRecord,
    state::State,
};
use tower::ServiceExt;

fn test_config(pantry_failure_rate: f64, search_failure_rate: f64) -> Config {
    Config {
        port: 0,
        data_dir: PathBuf::from("../data"),
        pantry_failure_rate,
        search_failure_rate,
        failure_seed: Some(7),
    }
}

fn test_catalog() -> Catalog {
    let record = |fdc_id: u64, description: &str| FoodRecord {
        fdc_id,
        description: description.to_string(),
        food_nutrients: Vec::new(),
    };

    Catalog::from_records(vec![
        record(1, "Cheddar Cheese"),
        record(2, "Cottage Cheese"),
        record(3, "Whole Milk"),
        record(4, "Rolled Oats"),
    ])
}

fn reliable_state() -> Arc<State> {
    State::with_parts(test_config(0.0, 0.0), test_catalog())
}

fn failing_state() -> Arc<State> {
    State::with_parts(test_config(1.0, 1.0), test_catalog())
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .oneshot(builder.body(body).expect("build request"))
        .await
        .expect("execute request");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");

    (status, bytes.to_vec())
}

async fn send_raw(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request");

    let response = app.oneshot(request).await.expect("execute request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");

    (status, bytes.to_vec())
}

fn parse(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("json body")
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(
        server::app(reliable_state()),
        Method::GET,
        "/api/health",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["status"], "ok");
}

#[tokio::test]
async fn pantry_starts_with_the_seed_items() {
    let (status, body) = send(
        server::app(reliable_state()),
        Method::GET,
        "/api/pantry",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = parse(&body);
    let items = items.as_array().expect("pantry array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Apple");
    assert_eq!(items[1]["name"], "Brown Rice (uncooked)");
    assert!(items[0]["addedAt"].is_string());
}

#[tokio::test]
async fn added_item_gets_id_and_lands_first() {
    let state = reliable_state();

    let (status, body) = send(
        server::app(Arc::clone(&state)),
        Method::POST,
        "/api/pantry",
        Some(json!({"name": "Oats", "quantity": 3, "category": "Grains"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let created = parse(&body);
    assert_eq!(created["name"], "Oats");
    assert_eq!(created["category"], "Grains");
    assert!(created["id"].as_str().expect("id").starts_with('p'));
    assert!(created["addedAt"].is_string());

    let (status, body) = send(server::app(state), Method::GET, "/api/pantry", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = parse(&body);
    let items = items.as_array().expect("pantry array");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["name"], "Oats");
}

#[tokio::test]
async fn add_defaults_quantity_and_category() {
    let (status, body) = send(
        server::app(reliable_state()),
        Method::POST,
        "/api/pantry",
        Some(json!({"name": "Salt"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let created = parse(&body);
    assert_eq!(created["quantity"].as_f64(), Some(1.0));
    assert_eq!(created["category"], "");
}

#[tokio::test]
async fn bad_json_on_add_is_rejected() {
    let (status, body) = send_raw(
        server::app(reliable_state()),
        Method::POST,
        "/api/pantry",
        "{not json",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"Malformed payload");
}

#[tokio::test]
async fn missing_name_on_add_is_rejected() {
    let (status, _) = send(
        server::app(reliable_state()),
        Method::POST,
        "/api/pantry",
        Some(json!({"quantity": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn injected_pantry_failure_is_a_500() {
    let (status, body) = send(
        server::app(failing_state()),
        Method::GET,
        "/api/pantry",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"Backend error");
}

#[tokio::test]
async fn injected_search_failure_is_a_504() {
    let (status, body) = send(
        server::app(failing_state()),
        Method::GET,
        "/api/foods/search?q=cheese",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body, b"Backend timeout");
}

#[tokio::test]
async fn search_filters_case_insensitively() {
    let (status, body) = send(
        server::app(reliable_state()),
        Method::GET,
        "/api/foods/search?q=chEEse",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let hits = parse(&body);
    let hits = hits.as_array().expect("hits array");
    assert_eq!(hits.len(), 2);
    assert!(hits
        .iter()
        .all(|hit| hit["description"].as_str().expect("description").contains("Cheese")));
}

#[tokio::test]
async fn search_without_query_returns_everything() {
    let (status, body) = send(
        server::app(reliable_state()),
        Method::GET,
        "/api/foods/search",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body).as_array().expect("hits array").len(), 4);
}

#[tokio::test]
async fn weekly_plan_cycles_the_posted_pantry() {
    let (status, body) = send(
        server::app(reliable_state()),
        Method::POST,
        "/api/diet/week",
        Some(json!({"pantry": [{"name": "Egg"}, {"name": "Oats"}]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response = parse(&body);
    assert_eq!(response["mode"], "weekly");

    let plan = response["plan"].as_object().expect("plan object");
    assert_eq!(plan.len(), 7);
    assert_eq!(plan["Day 1"]["breakfast"], "Egg");
    assert_eq!(plan["Day 1"]["lunch"], "Oats");
    assert_eq!(plan["Day 1"]["dinner"], "Egg");
}

#[tokio::test]
async fn monthly_plan_has_thirty_days() {
    let (status, body) = send(
        server::app(reliable_state()),
        Method::POST,
        "/api/diet/month",
        Some(json!({"pantry": [{"name": "Egg"}]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response = parse(&body);
    assert_eq!(response["mode"], "monthly");
    assert_eq!(response["plan"].as_object().expect("plan object").len(), 30);
}

#[tokio::test]
async fn plan_without_pantry_uses_defaults() {
    let (status, body) = send(
        server::app(reliable_state()),
        Method::POST,
        "/api/diet/week",
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response = parse(&body);
    assert_eq!(response["plan"]["Day 1"]["breakfast"], "Cereal");
    assert_eq!(response["plan"]["Day 1"]["lunch"], "Salad");
    assert_eq!(response["plan"]["Day 1"]["dinner"], "Rice & Veg");
}

#[tokio::test]
async fn bad_json_on_plan_is_rejected() {
    let (status, _) = send_raw(
        server::app(reliable_state()),
        Method::POST,
        "/api/diet/week",
        "not json at all",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fallback_files_are_served_statically() {
    let (status, body) = send(
        server::app(reliable_state()),
        Method::GET,
        "/fallback/pantry.json",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = parse(&body);
    assert!(!items.as_array().expect("canned pantry").is_empty());
}

#[tokio::test]
async fn fallback_files_dodge_failure_injection() {
    // Rate 1.0 kills /api/pantry but must never touch the canned bodies.
    let (status, _) = send(
        server::app(failing_state()),
        Method::GET,
        "/fallback/pantry.json",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

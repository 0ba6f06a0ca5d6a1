//! Integration tests for the inventory report endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get, post, post_json};
use medchain_worker::MemoryInventoryStore;
use serde_json::json;
use sqlx::PgPool;

fn app_without_db() -> axum::Router {
    common::build_app_with_store(
        common::unreachable_pool(),
        Arc::new(MemoryInventoryStore::new()),
    )
}

fn medicine(
    name: &str,
    batch: &str,
    quantity: i32,
    expiry: &str,
    location: &str,
) -> serde_json::Value {
    json!({
        "name": name,
        "batch_id": batch,
        "manufacturer": "PharmaCorp Ltd",
        "quantity": quantity,
        "expiry_date": expiry,
        "location": location,
    })
}

async fn seed(app: &axum::Router) {
    let rows = [
        medicine("Amoxicillin 500mg", "AMX-1", 120, "2099-06-30", "District Hospital"),
        medicine("Amoxicillin 500mg", "AMX-2", 30, "2020-01-15", "Rural Clinic A"),
        medicine("Paracetamol 500mg", "PCM-1", 5, "2099-03-20", "Rural Clinic A"),
    ];
    for body in rows {
        let response = post_json(app.clone(), "/api/v1/medicines", body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

// ---------------------------------------------------------------------------
// Without a database
// ---------------------------------------------------------------------------

#[tokio::test]
async fn negative_threshold_is_rejected() {
    let response = get(app_without_db(), "/api/v1/inventory/low-stock?threshold=-1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn out_of_range_days_are_rejected() {
    let response = get(app_without_db(), "/api/v1/inventory/expired?days=100000").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app_without_db(), "/api/v1/inventory/expired?days=-3").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summary_without_database_is_sanitized_500() {
    let response = get(app_without_db(), "/api/v1/inventory/summary").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "INTERNAL_ERROR");
}

// ---------------------------------------------------------------------------
// Against PostgreSQL
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn summary_reports_totals_locations_and_top_drugs(pool: PgPool) {
    let app = common::build_test_app(pool);
    seed(&app).await;

    let response = get(app, "/api/v1/inventory/summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();

    assert_eq!(data["total_medicines"], 3);
    assert_eq!(data["total_quantity"], 155);
    assert_eq!(data["low_stock_count"], 2);
    assert_eq!(data["expiring_count"], 1);
    assert_eq!(data["locations"].as_array().unwrap().len(), 2);
    assert_eq!(data["locations"][1]["location"], "Rural Clinic A");
    assert_eq!(data["locations"][1]["total_quantity"], 35);
    assert_eq!(data["top_drugs"][0]["name"], "Amoxicillin 500mg");
    assert_eq!(data["top_drugs"][0]["total_quantity"], 150);
    assert!(data["generated_at"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn low_stock_and_expired_lists_honour_filters(pool: PgPool) {
    let app = common::build_test_app(pool);
    seed(&app).await;

    let low = body_json(get(app.clone(), "/api/v1/inventory/low-stock").await).await;
    let quantities: Vec<i64> = low["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["quantity"].as_i64().unwrap())
        .collect();
    assert_eq!(quantities, vec![5, 30]);

    let low = body_json(get(app.clone(), "/api/v1/inventory/low-stock?threshold=10").await).await;
    assert_eq!(low["data"].as_array().unwrap().len(), 1);

    let uri = "/api/v1/inventory/low-stock?location=District%20Hospital";
    let low = body_json(get(app.clone(), uri).await).await;
    assert!(low["data"].as_array().unwrap().is_empty());

    let expired = body_json(get(app.clone(), "/api/v1/inventory/expired").await).await;
    let expired = expired["data"].as_array().unwrap().clone();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0]["batch_id"], "AMX-2");

    let uri = "/api/v1/inventory/expired?days=3650&location=";
    let within = body_json(get(app, uri).await).await;
    assert_eq!(within["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn locations_are_distinct_and_sorted(pool: PgPool) {
    let app = common::build_test_app(pool);
    seed(&app).await;

    let response = get(app, "/api/v1/locations").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"],
        json!(["District Hospital", "Rural Clinic A"])
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn medicine_alert_history_uses_data_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);
    seed(&app).await;
    post(app.clone(), "/functions/monitor-inventory").await;

    let medicines = body_json(get(app.clone(), "/api/v1/medicines").await).await;
    let paracetamol = medicines["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["batch_id"] == "PCM-1")
        .unwrap()
        .clone();
    let id = paracetamol["id"].as_i64().unwrap();

    let response = get(app.clone(), &format!("/api/v1/medicines/{id}/alerts")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let alerts = json["data"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["type"], "low_stock");
    assert_eq!(alerts[0]["medicine_id"], id);

    let response = get(app, "/api/v1/medicines/999999/alerts").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

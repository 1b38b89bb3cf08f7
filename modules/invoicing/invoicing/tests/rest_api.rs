#![allow(clippy::unwrap_used, clippy::expect_used)]
#![cfg(feature = "integration")]

//! End-to-end HTTP tests: the real router over the real service over the
//! SeaORM backend on in-memory SQLite. Each test gets a fresh database.

mod support;

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use invoicing::InvoicingService;
use invoicing::api::rest::routes;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> axum::Router {
    let h = support::inmem_harness().await;
    routes::router(Arc::new(InvoicingService::new(h.repos.clone())))
}

fn json_post(path: &str, body: Value) -> Request<Body> {
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::get(path).body(Body::empty()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn id_from_location(resp: &axum::response::Response) -> i64 {
    let location = resp.headers()[header::LOCATION].to_str().unwrap();
    location.rsplit('/').next().unwrap().parse().unwrap()
}

#[tokio::test]
async fn customer_create_then_list_roundtrip() {
    let app = app().await;

    let resp = app
        .clone()
        .oneshot(json_post(
            "/customer",
            json!({
                "firstName": "Alice",
                "lastName": "Bob",
                "email": "alice.bob@example.com",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = id_from_location(&resp);
    let created = body_json(resp).await;
    assert_eq!(created["id"], id);
    assert_eq!(created["firstName"], "Alice");

    let resp = app.oneshot(get("/customer")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(
        body,
        json!([{
            "id": id,
            "firstName": "Alice",
            "lastName": "Bob",
            "email": "alice.bob@example.com",
        }])
    );
}

#[tokio::test]
async fn duplicate_email_maps_to_problem_conflict() {
    let app = app().await;
    let req = || {
        json_post(
            "/customer",
            json!({
                "firstName": "Alice",
                "lastName": "Bob",
                "email": "taken@example.com",
            }),
        )
    };

    let resp = app.clone().oneshot(req()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app.oneshot(req()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
    let body = body_json(resp).await;
    assert_eq!(body["code"], "EMAIL_TAKEN");
    assert_eq!(body["status"], 409);
    assert_eq!(body["instance"], "/customer");
}

#[tokio::test]
async fn invoice_lifecycle_from_post_to_archive_views() {
    let app = app().await;

    let resp = app
        .clone()
        .oneshot(json_post(
            "/customer",
            json!({
                "firstName": "Alice",
                "lastName": "Bob",
                "email": "lifecycle@example.com",
            }),
        ))
        .await
        .unwrap();
    let customer_id = id_from_location(&resp);

    let resp = app
        .clone()
        .oneshot(json_post(
            "/invoice",
            json!({
                "customerId": customer_id,
                "timestamp": "2024-03-07T14:23:05Z",
                "invoiceItemList": [
                    { "productName": "Desk Lamp", "price": 12.5, "quantity": 2 },
                ],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice_id = id_from_location(&resp);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty(), "creation response carries no body");

    // Archive list: date widened to midnight UTC, total truncated to 25.
    let resp = app
        .clone()
        .oneshot(get(&format!("/customer/{customer_id}/invoices")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!([{
            "id": invoice_id,
            "timestamp": "2024-03-07T00:00:00Z",
            "totalAmount": 25,
        }])
    );

    let resp = app
        .oneshot(get(&format!("/invoice/{invoice_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({
            "items": [
                { "quantity": 2, "product": { "name": "Desk Lamp", "price": 12.5 } },
            ],
        })
    );
}

#[tokio::test]
async fn unknown_ids_read_as_empty_lists() {
    let app = app().await;

    for path in [
        "/customer/999/addresses",
        "/customer/999/invoices",
        "/invoice/999",
    ] {
        let resp = app.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }

    let resp = app.oneshot(get("/invoice/999")).await.unwrap();
    assert_eq!(body_json(resp).await, json!({ "items": [] }));
}

#[tokio::test]
async fn invoice_for_missing_customer_is_conflict() {
    let resp = app()
        .await
        .oneshot(json_post(
            "/invoice",
            json!({
                "customerId": 999,
                "timestamp": "2024-03-07T14:23:05Z",
                "invoiceItemList": [
                    { "productName": "Desk Lamp", "price": 12.5, "quantity": 2 },
                ],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "UNKNOWN_CUSTOMER");
    assert_eq!(body["instance"], "/invoice");
}

#[tokio::test]
async fn validation_problem_lists_offending_fields() {
    let resp = app()
        .await
        .oneshot(json_post(
            "/invoice",
            json!({
                "customerId": 1,
                "timestamp": "2024-03-07T14:23:05Z",
                "invoiceItemList": [],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["errors"][0]["field"], "invoiceItemList");
    assert_eq!(body["errors"][0]["message"], "must not be empty");
}

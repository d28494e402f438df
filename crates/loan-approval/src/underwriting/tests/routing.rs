use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::underwriting::loan_router;
use crate::underwriting::router::evaluate_handler;

fn evaluate_request(body: Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/api/v1/loan/evaluate")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serializable body"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn evaluate_handler_returns_decision_view() {
    let (_, renderer) = stub_renderer(1, [0.127, 0.873]);

    let response = evaluate_handler(State(Arc::new(renderer)), Ok(axum::Json(applicant()))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["decision"], "approved");
    assert_eq!(payload["headline"], "Loan APPROVED");
    assert_eq!(payload["confidence_percent"], "87.3%");
    assert_eq!(payload["probabilities"], json!([0.127, 0.873]));
    assert_eq!(payload["features"]["FICO_score"], json!(650.0));
}

#[tokio::test]
async fn evaluate_handler_rejects_out_of_domain_values() {
    let (classifier, renderer) = stub_renderer(1, [0.127, 0.873]);
    let mut record = applicant();
    record.monthly_housing_payment = 5_050;

    let response = evaluate_handler(State(Arc::new(renderer)), Ok(axum::Json(record))).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("monthly_housing_payment"));
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn evaluate_handler_surfaces_model_failures_as_server_errors() {
    let (_, renderer) = stub_renderer(0, [0.2, 0.2]);

    let response = evaluate_handler(State(Arc::new(renderer)), Ok(axum::Json(applicant()))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn evaluate_route_accepts_form_payloads() {
    let router = loan_router(Arc::new(renderer()));

    let response = router
        .oneshot(evaluate_request(json!({
            "requested_loan_amount": 5000,
            "fico_score": 780,
            "monthly_gross_income": 9000,
            "monthly_housing_payment": 1500,
            "ever_bankrupt_or_foreclosed": 0,
            "reason": "HomeImprovement",
            "fico_score_group": "Exceptional",
            "employment_status": "employed",
            "employment_sector": "Technology",
            "lender": "Lender_A"
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["decision"], "approved");
    assert_eq!(payload["applicant"].as_array().map(Vec::len), Some(10));
    let features = payload["features"].as_object().expect("feature map");
    assert_eq!(features.len(), training_columns().len());
}

#[tokio::test]
async fn evaluate_route_rejects_unknown_categories() {
    let router = loan_router(Arc::new(renderer()));

    let response = router
        .oneshot(evaluate_request(json!({
            "requested_loan_amount": 5000,
            "fico_score": 780,
            "monthly_gross_income": 9000,
            "monthly_housing_payment": 1500,
            "ever_bankrupt_or_foreclosed": 0,
            "reason": "Vacation",
            "fico_score_group": "Exceptional",
            "employment_status": "employed",
            "employment_sector": "Technology",
            "lender": "Lender_A"
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    let message = payload["error"].as_str().expect("error message");
    assert!(message.contains("reason"));
    assert!(message.contains("Vacation"));
}

#[tokio::test]
async fn evaluate_route_rejects_fractional_amounts_with_json_errors() {
    let router = loan_router(Arc::new(renderer()));

    let response = router
        .oneshot(evaluate_request(json!({
            "requested_loan_amount": 5000.5,
            "fico_score": 780,
            "monthly_gross_income": 9000,
            "monthly_housing_payment": 1500,
            "ever_bankrupt_or_foreclosed": 0,
            "reason": "HomeImprovement",
            "fico_score_group": "Exceptional",
            "employment_status": "employed",
            "employment_sector": "Technology",
            "lender": "Lender_A"
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("requested_loan_amount"));
}

#[tokio::test]
async fn evaluate_route_reports_malformed_bodies_as_json() {
    let router = loan_router(Arc::new(renderer()));

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/loan/evaluate")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from("{\"fico_score\": "))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"].is_string());
}

#[tokio::test]
async fn schema_route_describes_the_form_and_model_columns() {
    let router = loan_router(Arc::new(renderer()));

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/loan/schema")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["numeric"].as_array().map(Vec::len), Some(4));
    assert_eq!(payload["numeric"][0]["max"], 50_000);
    assert_eq!(payload["categorical"][1]["options"][3], "Very Good");
    assert_eq!(payload["categorical"][4]["baseline"], "Lender_A");
    assert_eq!(
        payload["model_columns"].as_array().map(Vec::len),
        Some(training_columns().len())
    );
}

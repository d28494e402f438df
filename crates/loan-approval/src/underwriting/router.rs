use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use super::decision::{DecisionRenderer, EvaluationError};
use super::domain::ApplicantRecord;
use super::form::FormSchema;
use super::model::LoanClassifier;
use super::schema::EncodedFeatureVector;
use super::view::DecisionView;

/// Body returned by the evaluate endpoint.
#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    #[serde(flatten)]
    pub view: DecisionView,
    pub probabilities: [f64; 2],
    pub features: EncodedFeatureVector,
}

/// Router exposing the evaluate action and the form description.
pub fn loan_router<C>(renderer: Arc<DecisionRenderer<C>>) -> Router
where
    C: LoanClassifier + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/loan/evaluate", post(evaluate_handler::<C>))
        .route("/api/v1/loan/schema", get(schema_handler::<C>))
        .with_state(renderer)
}

pub(crate) async fn evaluate_handler<C>(
    State(renderer): State<Arc<DecisionRenderer<C>>>,
    payload: Result<axum::Json<ApplicantRecord>, JsonRejection>,
) -> Response
where
    C: LoanClassifier + ?Sized + 'static,
{
    // Unknown categories and non-integer amounts fail here, before validation.
    let applicant = match payload {
        Ok(axum::Json(applicant)) => applicant,
        Err(rejection) => {
            let payload = json!({
                "error": rejection.body_text(),
            });
            return (rejection.status(), axum::Json(payload)).into_response();
        }
    };

    match renderer.evaluate(&applicant) {
        Ok(evaluation) => {
            let body = EvaluationResponse {
                view: evaluation.view(),
                probabilities: evaluation.decision.probabilities,
                features: evaluation.features,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(EvaluationError::Validation(err)) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "loan evaluation failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn schema_handler<C>(
    State(renderer): State<Arc<DecisionRenderer<C>>>,
) -> Response
where
    C: LoanClassifier + ?Sized + 'static,
{
    let schema = FormSchema::describe(renderer.encoder());
    (StatusCode::OK, axum::Json(schema)).into_response()
}

// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::ledger::{InsufficientStock, QuantityOverflow, SnapshotError, SubmissionError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid stock snapshot: {0}")]
    InvalidSnapshot(#[from] SnapshotError),

    // Falta de estoque: erro de negócio, recuperável, nunca "erro de sistema".
    #[error(transparent)]
    InsufficientStock(#[from] InsufficientStock),

    #[error(transparent)]
    QuantityOverflow(#[from] QuantityOverflow),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Overflow(e) => AppError::QuantityOverflow(e),
            SubmissionError::Insufficient(e) => AppError::InsufficientStock(e),
        }
    }
}

// Achata os erros aninhados ("drafts[1].materials[0].quantity") num mapa campo -> mensagens.
fn collect_messages(prefix: &str, errors: &ValidationErrors, out: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                out.insert(path, messages);
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                collect_messages("", &errors, &mut details);
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            // A falta de estoque é mostrada ao usuário, recurso por recurso.
            AppError::InsufficientStock(err) => {
                tracing::info!(resources = err.shortages.len(), "Envio recusado por falta de estoque");
                let messages: Vec<String> = err.shortages.iter().map(|s| s.describe()).collect();
                let body = Json(json!({
                    "error": "Insufficient stock.",
                    "messages": messages,
                    "shortages": err.shortages,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::InvalidSnapshot(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::QuantityOverflow(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::ResourceNotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found.")),
            AppError::InvalidPeriod(msg) => (StatusCode::BAD_REQUEST, msg),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ShortageReport;
    use axum::body::to_bytes;
    use rust_decimal::Decimal;
    use validator::ValidationError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_insufficient_stock_response() {
        let err = AppError::from(InsufficientStock {
            shortages: vec![ShortageReport {
                resource_id: "flour".into(),
                name: Some("Flour".into()),
                total_requested: Decimal::from(110),
                available: Decimal::from(100),
                shortage: Decimal::from(10),
                unit: "kg".into(),
            }],
        });

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["shortages"][0]["resourceId"], "flour");
        assert_eq!(body["shortages"][0]["shortage"].as_f64(), Some(10.0));
        assert_eq!(
            body["messages"][0],
            "Flour: requested 110 kg, available 100 kg, short by 10 kg"
        );
    }

    #[tokio::test]
    async fn test_validation_response_lists_fields() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("range");
        err.message = Some("The value cannot be negative.".into());
        errors.add("quantity", err);

        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["details"]["quantity"][0], "The value cannot be negative.");
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = AppError::ResourceNotFound("Customer 42".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Customer 42 not found.");
    }

    #[tokio::test]
    async fn test_overflow_is_a_bad_request() {
        let err = AppError::from(SubmissionError::Overflow(QuantityOverflow("flour".into())));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Amounts for 'flour' are too large to add up");
    }
}

//! API error taxonomy mapped onto HTTP statuses.
//!
//! Validation and authorization failures block locally before any store
//! mutation; the body is always `{"error": message}` so the frontend can
//! surface the reason and let the caller retry.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::lifecycle::TransitionError;

#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing or malformed input. Nothing was mutated.
  #[error("{0}")]
  Validation(String),

  /// The role gate said no. Checked before any state is touched.
  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  /// Stale edit: the supplied version token no longer matches.
  #[error("{0}")]
  Conflict(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
    }
  }
}

impl From<TransitionError> for ApiError {
  fn from(e: TransitionError) -> Self {
    match e {
      TransitionError::NotPermitted { .. } => ApiError::Forbidden(e.to_string()),
      TransitionError::InvalidTransition { .. } | TransitionError::MissingFeedback => {
        ApiError::Validation(e.to_string())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{EvaluationStatus, Role};

  #[test]
  fn transition_errors_map_to_the_right_bucket() {
    let forbidden: ApiError =
      TransitionError::NotPermitted { role: Role::Student, action: "submit" }.into();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let invalid: ApiError =
      TransitionError::InvalidTransition { from: EvaluationStatus::Approved, action: "submit" }
        .into();
    assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let missing: ApiError = TransitionError::MissingFeedback.into();
    assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }
}

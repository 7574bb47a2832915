use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;
use serde::Serialize;
use thiserror::Error;

use crate::errors::{ExistingVote, ScoringError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing or malformed X-User-Id header")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Scoring(ScoringError::Storage(err))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    existing: Option<ExistingVote>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Scoring(err) => match err {
                ScoringError::DuplicateVote { .. } => StatusCode::CONFLICT,
                ScoringError::VotingClosed { .. } => StatusCode::FORBIDDEN,
                ScoringError::NotFound { .. } => StatusCode::NOT_FOUND,
                ScoringError::InvalidBallot(_) => StatusCode::BAD_REQUEST,
                ScoringError::InvalidMatchState { .. } => StatusCode::CONFLICT,
                ScoringError::DataIntegrity(_) | ScoringError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {:#}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let existing = match self {
            ApiError::Scoring(ScoringError::DuplicateVote { existing }) => Some(existing),
            _ => None,
        };

        let body = ErrorResponse {
            error: message,
            code: status.as_u16(),
            existing,
        };

        (status, Json(body)).into_response()
    }
}

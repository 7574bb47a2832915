use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use log::info;
use std::sync::Arc;

use super::AppState;
use crate::api::error::ApiError;
use crate::domain::{MatchId, Role};
use crate::services::scoring::IntegrityReport;
use crate::voting::ValidationSummary;

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let user = state.caller(headers)?;
    if user.role != Role::Admin {
        return Err(ApiError::Forbidden(format!(
            "user {} is not an administrator",
            user.id
        )));
    }
    Ok(())
}

pub async fn admin_validate_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<MatchId>,
    headers: HeaderMap,
) -> Result<Json<ValidationSummary>, ApiError> {
    require_admin(&state, &headers)?;

    info!("Admin triggered validation of match {}", match_id);
    Ok(Json(state.results.validate_match(match_id)?))
}

pub async fn admin_integrity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<IntegrityReport>, ApiError> {
    require_admin(&state, &headers)?;
    Ok(Json(state.scoring.check_integrity()?))
}

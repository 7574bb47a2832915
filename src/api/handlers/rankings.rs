use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use std::sync::Arc;

use super::AppState;
use crate::api::error::ApiError;
use crate::domain::{MatchId, UserId};
use crate::lineup::CompositionView;
use crate::ranking::{LeaderboardEntry, TeamStanding, UserRank};

pub async fn get_standings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TeamStanding>>, ApiError> {
    Ok(Json(state.scoring.team_standings()?))
}

pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    Ok(Json(state.scoring.leaderboard()?))
}

pub async fn get_user_rank(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserRank>, ApiError> {
    Ok(Json(state.scoring.user_rank(user_id)?))
}

pub async fn get_lineup(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<MatchId>,
) -> Result<Json<CompositionView>, ApiError> {
    let now = Utc::now().naive_utc();
    Ok(Json(state.scoring.lineup(match_id, now)?))
}

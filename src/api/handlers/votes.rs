use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::Utc;
use std::sync::Arc;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::models::{MatchVoteRequest, TournamentVoteRequest, VoteResponse};
use crate::domain::MatchId;
use crate::voting::MatchBallot;

pub async fn post_match_vote(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<MatchId>,
    headers: HeaderMap,
    Json(request): Json<MatchVoteRequest>,
) -> Result<(StatusCode, Json<VoteResponse>), ApiError> {
    let user = state.caller(&headers)?;
    let ballot = MatchBallot {
        match_id,
        team_id: request.team_id,
        best_player_id: request.best_player_id,
    };

    let vote = state
        .scoring
        .vote_on_match(user.id, &ballot, Utc::now().naive_utc())?;
    Ok((StatusCode::CREATED, Json(vote.into())))
}

pub async fn post_tournament_vote(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<TournamentVoteRequest>,
) -> Result<(StatusCode, Json<VoteResponse>), ApiError> {
    let user = state.caller(&headers)?;

    let vote = state
        .scoring
        .vote_on_tournament(user.id, request.team_id, Utc::now().naive_utc())?;
    Ok((StatusCode::CREATED, Json(vote.into())))
}

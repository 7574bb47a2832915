use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::{admin_integrity, admin_validate_match},
    rankings::{get_leaderboard, get_lineup, get_standings, get_user_rank},
    votes::{post_match_vote, post_tournament_vote},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/standings", get(get_standings))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/users/:id/rank", get(get_user_rank))
        .route("/api/matches/:id/lineup", get(get_lineup))
        .route("/api/matches/:id/votes", post(post_match_vote))
        .route("/api/tournament/votes", post(post_tournament_vote))
        .route("/api/admin/matches/:id/validate", post(admin_validate_match))
        .route("/api/admin/integrity", get(admin_integrity))
        .with_state(state)
}

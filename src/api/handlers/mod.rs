use axum::http::HeaderMap;

use crate::api::error::ApiError;
use crate::config::settings::AppConfig;
use crate::database::{DbPool, ScoringStore, SqliteStore};
use crate::domain::{User, UserId};
use crate::errors::{Entity, ScoringError};
use crate::services::results::ResultsService;
use crate::services::scoring::ScoringService;

pub mod admin;
pub mod rankings;
pub mod votes;

/// Header carrying the authenticated caller, set by the auth proxy in front
pub const USER_ID_HEADER: &str = "x-user-id";

pub struct AppState {
    pub scoring: ScoringService<SqliteStore>,
    pub results: ResultsService,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let store = SqliteStore::new(pool.clone(), config.default_points.clone());
        let results = ResultsService::new(pool, config.default_points.clone());

        Self {
            scoring: ScoringService::new(store, config),
            results,
        }
    }

    /// The user behind the request
    pub fn caller(&self, headers: &HeaderMap) -> Result<User, ApiError> {
        let user_id = caller_id(headers)?;

        self.scoring
            .store()
            .user(user_id)?
            .ok_or_else(|| ApiError::from(ScoringError::not_found(Entity::User, user_id)))
    }
}

pub fn caller_id(headers: &HeaderMap) -> Result<UserId, ApiError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .ok_or(ApiError::Unauthorized)
}

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{MatchId, MatchStatus, MatchVote, TournamentVote};

/// Kind of record a lookup failed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Team,
    Player,
    Match,
    User,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Team => "team",
            Entity::Player => "player",
            Entity::Match => "match",
            Entity::User => "user",
        };
        f.write_str(name)
    }
}

/// The vote that blocked a new one for the same (user, subject) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExistingVote {
    Match(MatchVote),
    Tournament(TournamentVote),
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("a vote already exists for this subject")]
    DuplicateVote { existing: ExistingVote },

    #[error("voting closed at {deadline}")]
    VotingClosed { deadline: NaiveDateTime },

    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    #[error("invalid ballot: {0}")]
    InvalidBallot(String),

    /// The match is in the wrong phase for the requested action
    #[error("match {match_id} is {}", .status.as_str())]
    InvalidMatchState { match_id: MatchId, status: MatchStatus },

    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ScoringError {
    pub fn not_found(entity: Entity, id: i64) -> Self {
        ScoringError::NotFound { entity, id }
    }
}

pub type ScoringResult<T> = Result<T, ScoringError>;

use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::domain::{MatchId, MatchStatus, PlayerId, Role, TeamId, UserId};

impl ToSql for MatchStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MatchStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|s| MatchStatus::parse(s).ok_or(FromSqlError::InvalidType))
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|s| Role::parse(s).ok_or(FromSqlError::InvalidType))
    }
}

/// Optional restrictions on a match listing
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub status: Option<MatchStatus>,
    pub scheduled_from: Option<NaiveDateTime>,
    pub scheduled_until: Option<NaiveDateTime>,
}

impl MatchFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn finished() -> Self {
        Self {
            status: Some(MatchStatus::Finished),
            ..Self::default()
        }
    }

    pub fn between(mut self, from: NaiveDateTime, until: NaiveDateTime) -> Self {
        self.scheduled_from = Some(from);
        self.scheduled_until = Some(until);
        self
    }
}

#[derive(Debug, Clone)]
pub struct NewMatch {
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub scheduled_at: NaiveDateTime,
    pub compo_publique: bool,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub score_a: i32,
    pub score_b: i32,
    pub man_of_the_match_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatchVote {
    pub user_id: UserId,
    pub match_id: MatchId,
    pub team_id: TeamId,
    pub best_player_id: Option<PlayerId>,
}

/// Result of an insert guarded by a uniqueness constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome<T> {
    Inserted(T),
    AlreadyExists(T),
}

impl<T> InsertOutcome<T> {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Result of a delete that may be refused to keep points consistent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// Validated votes would be cascaded away while their points stay with the users
    HasValidatedVotes,
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

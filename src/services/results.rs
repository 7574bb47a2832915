use log::info;

use crate::database::{self, matches, point_schedule, DbPool, MatchResult};
use crate::domain::{MatchId, MatchStatus, PointSchedule, TeamId};
use crate::errors::{Entity, ScoringError, ScoringResult};
use crate::voting::{validate_match, validate_tournament, ValidationSummary};

/// Administrative side: records final results and validates the votes on them
pub struct ResultsService {
    pool: DbPool,
    default_points: PointSchedule,
}

impl ResultsService {
    pub fn new(pool: DbPool, default_points: PointSchedule) -> Self {
        Self {
            pool,
            default_points,
        }
    }

    fn schedule(&self) -> ScoringResult<PointSchedule> {
        let conn = database::get_connection(&self.pool)?;
        Ok(point_schedule::load_or_create(&conn, &self.default_points)?)
    }

    /// Stores the final score, marks the match finished and validates its votes.
    /// A finished match keeps its result.
    pub fn finish_match(
        &self,
        match_id: MatchId,
        result: &MatchResult,
    ) -> ScoringResult<ValidationSummary> {
        let schedule = self.schedule()?;
        let mut conn = database::get_connection(&self.pool)?;

        let fixture = matches::find_by_id(&conn, match_id)?
            .ok_or_else(|| ScoringError::not_found(Entity::Match, match_id))?;
        let already_finished = ScoringError::InvalidMatchState {
            match_id,
            status: MatchStatus::Finished,
        };
        if fixture.is_finished() {
            return Err(already_finished);
        }
        // Guarded on status, a concurrent finish makes this a no-op
        if !matches::set_result(&conn, match_id, result)? {
            return Err(already_finished);
        }
        info!(
            "Match {} finished {}-{}",
            match_id, result.score_a, result.score_b
        );

        validate_match(&mut conn, match_id, &schedule)
    }

    pub fn validate_match(&self, match_id: MatchId) -> ScoringResult<ValidationSummary> {
        let schedule = self.schedule()?;
        let mut conn = database::get_connection(&self.pool)?;
        validate_match(&mut conn, match_id, &schedule)
    }

    pub fn validate_tournament(&self, winner: TeamId) -> ScoringResult<ValidationSummary> {
        let schedule = self.schedule()?;
        let mut conn = database::get_connection(&self.pool)?;
        validate_tournament(&mut conn, winner, &schedule)
    }
}

use anyhow::Context;
use log::info;
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

use crate::database::{matches, teams, users, votes};
use crate::domain::{Match, MatchId, MatchVote, PointSchedule, TeamId, TournamentVote};
use crate::errors::{Entity, ScoringError, ScoringResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub validated: usize,
    pub rewarded: usize,
    pub points_awarded: i64,
}

impl ValidationSummary {
    fn record(&mut self, points: i64) {
        self.validated += 1;
        if points > 0 {
            self.rewarded += 1;
            self.points_awarded += points;
        }
    }
}

/// Points earned by a match prediction once the result is final
pub fn score_match_vote(vote: &MatchVote, fixture: &Match, schedule: &PointSchedule) -> i64 {
    let mut points = 0;

    if fixture.winner() == Some(vote.team_id) {
        points += i64::from(schedule.match_winner_points);
    }
    if let (Some(pick), Some(best)) = (vote.best_player_id, fixture.man_of_the_match_id) {
        if pick == best {
            points += i64::from(schedule.best_player_points);
        }
    }

    points
}

pub fn score_tournament_vote(vote: &TournamentVote, winner: TeamId, schedule: &PointSchedule) -> i64 {
    if vote.team_id == winner {
        i64::from(schedule.tournament_winner_points)
    } else {
        0
    }
}

/// Scores every pending vote on a finished match.
///
/// Votes and the voters' running totals are updated in one transaction.
/// Votes validated earlier are left alone, so running it twice is harmless.
pub fn validate_match(
    conn: &mut Connection,
    match_id: MatchId,
    schedule: &PointSchedule,
) -> ScoringResult<ValidationSummary> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("Failed to start validation transaction")?;

    let fixture = matches::find_by_id(&tx, match_id)?
        .ok_or_else(|| ScoringError::not_found(Entity::Match, match_id))?;
    if !fixture.is_finished() {
        return Err(ScoringError::InvalidMatchState {
            match_id,
            status: fixture.status,
        });
    }
    if !fixture.has_scores() {
        return Err(ScoringError::DataIntegrity(format!(
            "match {} is finished without scores",
            match_id
        )));
    }

    let mut summary = ValidationSummary::default();
    for vote in votes::list_pending_for_match(&tx, match_id)? {
        let points = score_match_vote(&vote, &fixture, schedule);
        if votes::mark_match_vote_validated(&tx, vote.id, points)? {
            users::add_points(&tx, vote.user_id, points)?;
            summary.record(points);
        }
    }

    tx.commit().context("Failed to commit match validation")?;
    info!(
        "Validated {} votes on match {} ({} rewarded, {} points)",
        summary.validated, match_id, summary.rewarded, summary.points_awarded
    );
    Ok(summary)
}

/// Scores every pending tournament prediction against the tournament winner
pub fn validate_tournament(
    conn: &mut Connection,
    winner: TeamId,
    schedule: &PointSchedule,
) -> ScoringResult<ValidationSummary> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("Failed to start validation transaction")?;

    if teams::find_by_id(&tx, winner)?.is_none() {
        return Err(ScoringError::not_found(Entity::Team, winner));
    }

    let mut summary = ValidationSummary::default();
    let pending = votes::list_tournament_votes(&tx, false)?
        .into_iter()
        .filter(|v| !v.validated);

    for vote in pending {
        let points = score_tournament_vote(&vote, winner, schedule);
        if votes::mark_tournament_vote_validated(&tx, vote.id, points)? {
            users::add_points(&tx, vote.user_id, points)?;
            summary.record(points);
        }
    }

    tx.commit().context("Failed to commit tournament validation")?;
    info!(
        "Validated {} tournament votes for winner {} ({} rewarded)",
        summary.validated, winner, summary.rewarded
    );
    Ok(summary)
}

use chrono::NaiveDateTime;
use log::info;
use serde::Deserialize;

use crate::database::{InsertOutcome, NewMatchVote, ScoringStore};
use crate::domain::{Match, MatchId, MatchVote, PlayerId, TeamId, TournamentVote, UserId};
use crate::errors::{Entity, ExistingVote, ScoringError, ScoringResult};

/// A user's prediction on one match, before admission
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBallot {
    pub match_id: MatchId,
    pub team_id: TeamId,
    #[serde(default)]
    pub best_player_id: Option<PlayerId>,
}

/// Fails with `VotingClosed` once `now` reaches the deadline.
/// No deadline means voting has not been scheduled to close yet.
pub fn ensure_open(deadline: Option<NaiveDateTime>, now: NaiveDateTime) -> ScoringResult<()> {
    match deadline {
        Some(deadline) if deadline <= now => Err(ScoringError::VotingClosed { deadline }),
        _ => Ok(()),
    }
}

/// Admits a match prediction and stores it with no points, unvalidated
pub fn attempt_match_vote<S: ScoringStore + ?Sized>(
    store: &S,
    user_id: UserId,
    ballot: &MatchBallot,
    now: NaiveDateTime,
) -> ScoringResult<MatchVote> {
    require_user(store, user_id)?;
    let fixture = store
        .match_by_id(ballot.match_id)?
        .ok_or_else(|| ScoringError::not_found(Entity::Match, ballot.match_id))?;

    if let Some(existing) = store.find_match_vote(user_id, fixture.id)? {
        return Err(duplicate(ExistingVote::Match(existing)));
    }
    ensure_open(Some(fixture.scheduled_at), now)?;
    check_ballot(store, &fixture, ballot)?;

    let new_vote = NewMatchVote {
        user_id,
        match_id: fixture.id,
        team_id: ballot.team_id,
        best_player_id: ballot.best_player_id,
    };

    match store.insert_match_vote(&new_vote)? {
        InsertOutcome::Inserted(vote) => {
            info!(
                "User {} voted team {} on match {}",
                user_id, vote.team_id, vote.match_id
            );
            Ok(vote)
        }
        InsertOutcome::AlreadyExists(existing) => Err(duplicate(ExistingVote::Match(existing))),
    }
}

/// Admits a tournament-winner prediction. Locks for everyone at the first kickoff.
pub fn attempt_tournament_vote<S: ScoringStore + ?Sized>(
    store: &S,
    user_id: UserId,
    team_id: TeamId,
    now: NaiveDateTime,
) -> ScoringResult<TournamentVote> {
    require_user(store, user_id)?;

    if let Some(existing) = store.find_tournament_vote(user_id)? {
        return Err(duplicate(ExistingVote::Tournament(existing)));
    }
    ensure_open(store.first_kickoff()?, now)?;

    if store.team(team_id)?.is_none() {
        return Err(ScoringError::not_found(Entity::Team, team_id));
    }

    match store.insert_tournament_vote(user_id, team_id)? {
        InsertOutcome::Inserted(vote) => {
            info!("User {} picked team {} to win the tournament", user_id, team_id);
            Ok(vote)
        }
        InsertOutcome::AlreadyExists(existing) => {
            Err(duplicate(ExistingVote::Tournament(existing)))
        }
    }
}

fn require_user<S: ScoringStore + ?Sized>(store: &S, user_id: UserId) -> ScoringResult<()> {
    match store.user(user_id)? {
        Some(_) => Ok(()),
        None => Err(ScoringError::not_found(Entity::User, user_id)),
    }
}

fn check_ballot<S: ScoringStore + ?Sized>(
    store: &S,
    fixture: &Match,
    ballot: &MatchBallot,
) -> ScoringResult<()> {
    if store.team(ballot.team_id)?.is_none() {
        return Err(ScoringError::not_found(Entity::Team, ballot.team_id));
    }
    if !fixture.involves(ballot.team_id) {
        return Err(ScoringError::InvalidBallot(format!(
            "team {} does not play match {}",
            ballot.team_id, fixture.id
        )));
    }

    if let Some(player_id) = ballot.best_player_id {
        let player = store
            .player(player_id)?
            .ok_or_else(|| ScoringError::not_found(Entity::Player, player_id))?;
        if !fixture.involves(player.team_id) {
            return Err(ScoringError::InvalidBallot(format!(
                "player {} does not play match {}",
                player_id, fixture.id
            )));
        }
    }

    Ok(())
}

fn duplicate(existing: ExistingVote) -> ScoringError {
    ScoringError::DuplicateVote { existing }
}

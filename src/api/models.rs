use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{MatchId, MatchVote, PlayerId, TeamId, TournamentVote, UserId, VoteId};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchVoteRequest {
    pub team_id: TeamId,
    #[serde(default)]
    pub best_player_id: Option<PlayerId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentVoteRequest {
    pub team_id: TeamId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub id: VoteId,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<MatchId>,
    pub team_id: TeamId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_player_id: Option<PlayerId>,
    pub points: i64,
    pub validated: bool,
    pub created_at: Option<NaiveDateTime>,
}

impl From<MatchVote> for VoteResponse {
    fn from(vote: MatchVote) -> Self {
        Self {
            id: vote.id,
            user_id: vote.user_id,
            match_id: Some(vote.match_id),
            team_id: vote.team_id,
            best_player_id: vote.best_player_id,
            points: vote.points,
            validated: vote.validated,
            created_at: vote.created_at,
        }
    }
}

impl From<TournamentVote> for VoteResponse {
    fn from(vote: TournamentVote) -> Self {
        Self {
            id: vote.id,
            user_id: vote.user_id,
            match_id: None,
            team_id: vote.team_id,
            best_player_id: None,
            points: vote.points,
            validated: vote.validated,
            created_at: vote.created_at,
        }
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type TeamId = i64;
pub type PlayerId = i64;
pub type MatchId = i64;
pub type UserId = i64;
pub type VoteId = i64;

/// Tournament team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub code: String,
    /// Display ordering hint, lower comes first
    pub priority: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub name: String,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Finished,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Finished => "finished",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(MatchStatus::Scheduled),
            "in_progress" => Some(MatchStatus::InProgress),
            "finished" => Some(MatchStatus::Finished),
            _ => None,
        }
    }
}

/// A fixture between two distinct teams. Side A and side B matter for score attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub scheduled_at: NaiveDateTime,
    pub status: MatchStatus,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub man_of_the_match_id: Option<PlayerId>,
    /// Lineup may be disclosed regardless of kickoff time
    pub compo_publique: bool,
    pub notes: String,
}

impl Match {
    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn has_scores(&self) -> bool {
        self.score_a.is_some() && self.score_b.is_some()
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team_a_id == team_id || self.team_b_id == team_id
    }

    /// Returns `(scored, conceded)` from the point of view of `team_id`.
    /// Missing scores count as 0.
    pub fn scores_for(&self, team_id: TeamId) -> Option<(i32, i32)> {
        let a = self.score_a.unwrap_or(0);
        let b = self.score_b.unwrap_or(0);

        if team_id == self.team_a_id {
            Some((a, b))
        } else if team_id == self.team_b_id {
            Some((b, a))
        } else {
            None
        }
    }

    /// Winning side of a finished match with both scores. `None` on a draw.
    pub fn winner(&self) -> Option<TeamId> {
        if !self.is_finished() {
            return None;
        }

        match (self.score_a?, self.score_b?) {
            (a, b) if a > b => Some(self.team_a_id),
            (a, b) if b > a => Some(self.team_b_id),
            _ => None,
        }
    }
}

/// Prediction on a single match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchVote {
    pub id: VoteId,
    pub user_id: UserId,
    pub match_id: MatchId,
    pub team_id: TeamId,
    pub best_player_id: Option<PlayerId>,
    pub points: i64,
    pub validated: bool,
    pub created_at: Option<NaiveDateTime>,
}

/// Prediction on the tournament winner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentVote {
    pub id: VoteId,
    pub user_id: UserId,
    pub team_id: TeamId,
    pub points: i64,
    pub validated: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    /// Running total maintained by vote validation
    pub points: i64,
}

impl User {
    pub fn is_voter(&self) -> bool {
        self.role == Role::User
    }
}

/// Points awarded for each kind of correct prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointSchedule {
    pub match_winner_points: u32,
    pub best_player_points: u32,
    pub tournament_winner_points: u32,
    pub description: String,
}

impl Default for PointSchedule {
    fn default() -> Self {
        Self {
            match_winner_points: 10,
            best_player_points: 5,
            tournament_winner_points: 50,
            description: "Default point system".to_string(),
        }
    }
}

/// One starting player of a match lineup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub team_id: TeamId,
    pub position: String,
}

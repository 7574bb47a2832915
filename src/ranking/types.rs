use serde::{Deserialize, Serialize};

use crate::domain::{TeamId, UserId};

/// Outcome of one finished match from a team's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl FormResult {
    pub fn classify(scored: i32, conceded: i32) -> Self {
        if scored > conceded {
            FormResult::Win
        } else if scored == conceded {
            FormResult::Draw
        } else {
            FormResult::Loss
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            FormResult::Win => 'W',
            FormResult::Draw => 'D',
            FormResult::Loss => 'L',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub name: String,
    pub code: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_difference: i64,
    pub points: u32,
    /// Validated winner predictions naming this team
    pub votes_won: u32,
    /// Most recent first
    pub form: Vec<FormResult>,
}

impl TeamStanding {
    pub fn form_string(&self) -> String {
        self.form.iter().map(FormResult::as_char).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1 + number of users with strictly more points
    pub rank: usize,
    pub user_id: UserId,
    pub username: String,
    pub points: i64,
    pub total_votes: u32,
    pub correct_votes: u32,
    /// Percentage rounded to one decimal
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRank {
    pub user_id: UserId,
    pub points: i64,
    pub rank: usize,
}

/// Stored running total that disagrees with the validated votes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsMismatch {
    pub user_id: UserId,
    pub stored: i64,
    pub recomputed: i64,
}

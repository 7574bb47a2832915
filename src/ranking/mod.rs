pub mod leaderboard;
pub mod standings;
pub mod types;

pub use leaderboard::{calculate_leaderboard, find_points_mismatches, rank_for};
pub use standings::calculate_standings;
pub use types::{FormResult, LeaderboardEntry, PointsMismatch, TeamStanding, UserRank};

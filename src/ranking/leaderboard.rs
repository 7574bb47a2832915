use std::collections::HashMap;

use log::debug;

use super::types::{LeaderboardEntry, PointsMismatch};
use crate::domain::{MatchVote, TournamentVote, User, UserId};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    points: i64,
    total_votes: u32,
    correct_votes: u32,
}

impl Tally {
    fn record(&mut self, validated: bool, points: i64) {
        self.total_votes += 1;
        if validated {
            self.points += points;
            if points > 0 {
                self.correct_votes += 1;
            }
        }
    }
}

/// Ranks every voter by the points of their validated votes.
///
/// `match_votes` and `tournament_votes` must hold every vote cast, validated
/// or not: unvalidated ones only count towards `total_votes`. Admins are
/// skipped. Users on equal points share a rank and are listed by id.
pub fn calculate_leaderboard(
    users: &[User],
    match_votes: &[MatchVote],
    tournament_votes: &[TournamentVote],
) -> Vec<LeaderboardEntry> {
    let tallies = tally_votes(match_votes, tournament_votes);

    let mut entries: Vec<LeaderboardEntry> = users
        .iter()
        .filter(|u| u.is_voter())
        .map(|user| {
            let tally = tallies.get(&user.id).copied().unwrap_or_default();
            LeaderboardEntry {
                rank: 0,
                user_id: user.id,
                username: user.username.clone(),
                points: tally.points,
                total_votes: tally.total_votes,
                correct_votes: tally.correct_votes,
                accuracy: accuracy(tally.correct_votes, tally.total_votes),
            }
        })
        .collect();

    entries.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.user_id.cmp(&b.user_id)));

    let all_points: Vec<i64> = entries.iter().map(|e| e.points).collect();
    for entry in &mut entries {
        entry.rank = rank_for(entry.points, &all_points);
    }

    debug!("Leaderboard computed for {} users", entries.len());
    entries
}

fn tally_votes(
    match_votes: &[MatchVote],
    tournament_votes: &[TournamentVote],
) -> HashMap<UserId, Tally> {
    let mut tallies: HashMap<UserId, Tally> = HashMap::new();

    for vote in match_votes {
        tallies
            .entry(vote.user_id)
            .or_default()
            .record(vote.validated, vote.points);
    }
    for vote in tournament_votes {
        tallies
            .entry(vote.user_id)
            .or_default()
            .record(vote.validated, vote.points);
    }

    tallies
}

/// Share of correct votes as a percentage with one decimal, 0 without votes
pub fn accuracy(correct_votes: u32, total_votes: u32) -> f64 {
    if total_votes == 0 {
        return 0.0;
    }

    let ratio = f64::from(correct_votes) / f64::from(total_votes) * 100.0;
    (ratio * 10.0).round() / 10.0
}

/// 1 + the number of scores strictly greater than `points`
pub fn rank_for(points: i64, all_points: &[i64]) -> usize {
    1 + all_points.iter().filter(|&&p| p > points).count()
}

/// Sum of validated vote points per user
pub fn recompute_points(
    match_votes: &[MatchVote],
    tournament_votes: &[TournamentVote],
) -> HashMap<UserId, i64> {
    tally_votes(match_votes, tournament_votes)
        .into_iter()
        .map(|(user_id, tally)| (user_id, tally.points))
        .collect()
}

/// Voters whose stored running total differs from their validated votes
pub fn find_points_mismatches(
    users: &[User],
    match_votes: &[MatchVote],
    tournament_votes: &[TournamentVote],
) -> Vec<PointsMismatch> {
    let recomputed = recompute_points(match_votes, tournament_votes);

    users
        .iter()
        .filter_map(|user| {
            let expected = recomputed.get(&user.id).copied().unwrap_or(0);
            (expected != user.points).then_some(PointsMismatch {
                user_id: user.id,
                stored: user.points,
                recomputed: expected,
            })
        })
        .collect()
}

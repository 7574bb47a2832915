use std::cmp::Ordering;
use std::collections::HashMap;

use log::debug;

use super::types::{FormResult, TeamStanding};
use crate::config::settings::RankingSettings;
use crate::domain::{Match, MatchId, MatchVote, Team, TeamId};

// Association football scoring, not configurable
const POINTS_PER_WIN: u32 = 3;
const POINTS_PER_DRAW: u32 = 1;

/// Builds every team's record over the finished matches, best team first.
///
/// Unfinished matches in `matches` are ignored, and so are unvalidated
/// votes in `winner_votes`. Sort order is descending
/// (points, goal difference, goals scored), then ascending team id.
pub fn calculate_standings(
    teams: &[Team],
    matches: &[Match],
    winner_votes: &[MatchVote],
    settings: &RankingSettings,
) -> Vec<TeamStanding> {
    let finished: Vec<&Match> = matches.iter().filter(|m| m.is_finished()).collect();
    debug!(
        "Computing standings for {} teams over {} finished matches",
        teams.len(),
        finished.len()
    );

    let votes_won = count_votes_won(winner_votes);

    let mut standings: Vec<TeamStanding> = teams
        .iter()
        .map(|team| build_standing(team, &finished, &votes_won, settings.form_length))
        .collect();

    standings.sort_by(compare_standings);
    standings
}

fn count_votes_won(votes: &[MatchVote]) -> HashMap<TeamId, u32> {
    let mut counts = HashMap::new();
    for vote in votes.iter().filter(|v| v.validated) {
        *counts.entry(vote.team_id).or_insert(0) += 1;
    }
    counts
}

fn build_standing(
    team: &Team,
    finished: &[&Match],
    votes_won: &HashMap<TeamId, u32>,
    form_length: usize,
) -> TeamStanding {
    let played: Vec<&Match> = finished
        .iter()
        .copied()
        .filter(|m| m.involves(team.id))
        .collect();

    let mut standing = TeamStanding {
        team_id: team.id,
        name: team.name.clone(),
        code: team.code.clone(),
        played: 0,
        wins: 0,
        draws: 0,
        losses: 0,
        goals_for: 0,
        goals_against: 0,
        goal_difference: 0,
        points: 0,
        votes_won: votes_won.get(&team.id).copied().unwrap_or(0),
        form: Vec::new(),
    };

    for m in &played {
        let Some((scored, conceded)) = m.scores_for(team.id) else {
            continue;
        };

        standing.played += 1;
        standing.goals_for += i64::from(scored);
        standing.goals_against += i64::from(conceded);

        match FormResult::classify(scored, conceded) {
            FormResult::Win => standing.wins += 1,
            FormResult::Draw => standing.draws += 1,
            FormResult::Loss => standing.losses += 1,
        }
    }

    standing.goal_difference = standing.goals_for - standing.goals_against;
    standing.points = standing.wins * POINTS_PER_WIN + standing.draws * POINTS_PER_DRAW;
    standing.form = recent_form(team.id, &played, form_length);
    standing
}

/// Results of the `limit` most recent matches of `team_id`, most recent first
pub fn recent_form(team_id: TeamId, matches: &[&Match], limit: usize) -> Vec<FormResult> {
    let mut recent: Vec<&Match> = matches
        .iter()
        .copied()
        .filter(|m| m.is_finished() && m.involves(team_id))
        .collect();

    recent.sort_by(|a, b| {
        b.scheduled_at
            .cmp(&a.scheduled_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    recent
        .into_iter()
        .take(limit)
        .filter_map(|m| m.scores_for(team_id))
        .map(|(scored, conceded)| FormResult::classify(scored, conceded))
        .collect()
}

pub fn compare_standings(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

/// Finished matches the calculator had to score as 0 because a side has no score
pub fn finished_without_scores(matches: &[Match]) -> Vec<MatchId> {
    matches
        .iter()
        .filter(|m| m.is_finished() && !m.has_scores())
        .map(|m| m.id)
        .collect()
}

use std::io::IsTerminal;

use colored::Colorize;

use crate::ranking::{LeaderboardEntry, TeamStanding};
use crate::services::scoring::IntegrityReport;
use crate::voting::ValidationSummary;

/// Format team standings as an aligned table, best team first
pub fn format_standings(standings: &[TeamStanding], use_colors: bool) -> String {
    if standings.is_empty() {
        return "No teams registered.".to_string();
    }

    let header = format!(
        "{:>3}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>5} {:>4} {:>6}  {}",
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts", "Votes", "Form"
    );

    let mut lines = vec![paint_header(header, use_colors)];
    for (i, s) in standings.iter().enumerate() {
        let line = format!(
            "{:>3}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>+5} {:>4} {:>6}  {}",
            i + 1,
            truncate(&s.name, 20),
            s.played,
            s.wins,
            s.draws,
            s.losses,
            s.goals_for,
            s.goals_against,
            s.goal_difference,
            s.points,
            s.votes_won,
            s.form_string()
        );
        lines.push(line);
    }

    lines.join("\n")
}

/// Format the participant leaderboard
pub fn format_leaderboard(entries: &[LeaderboardEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No participants yet.".to_string();
    }

    let header = format!(
        "{:>4}  {:<20} {:>6} {:>6} {:>7} {:>8}",
        "Rank", "User", "Points", "Votes", "Correct", "Accuracy"
    );

    let mut lines = vec![paint_header(header, use_colors)];
    for e in entries {
        let line = format!(
            "{:>4}  {:<20} {:>6} {:>6} {:>7} {:>7.1}%",
            e.rank,
            truncate(&e.username, 20),
            e.points,
            e.total_votes,
            e.correct_votes,
            e.accuracy
        );
        if use_colors && e.rank == 1 {
            lines.push(line.yellow().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

pub fn format_validation(summary: &ValidationSummary) -> String {
    format!(
        "Validated {} votes, {} rewarded, {} points awarded",
        summary.validated, summary.rewarded, summary.points_awarded
    )
}

pub fn format_integrity(report: &IntegrityReport, use_colors: bool) -> String {
    if report.is_clean() {
        let ok = "Stored points match validated votes.";
        return if use_colors { ok.green().to_string() } else { ok.to_string() };
    }

    let mut lines = Vec::new();
    for m in &report.points_mismatches {
        lines.push(format!(
            "user {}: stored {} points, validated votes give {}",
            m.user_id, m.stored, m.recomputed
        ));
    }
    for match_id in &report.matches_without_scores {
        lines.push(format!("match {}: finished without scores", match_id));
    }

    if use_colors {
        lines.iter().map(|l| l.red().to_string()).collect::<Vec<_>>().join("\n")
    } else {
        lines.join("\n")
    }
}

/// Colors only when stdout is a terminal
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

fn paint_header(header: String, use_colors: bool) -> String {
    if use_colors {
        header.bold().to_string()
    } else {
        header
    }
}

fn truncate(value: &str, max_width: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max_width {
        return value.to_string();
    }

    let mut cut: String = chars[..max_width - 1].iter().collect();
    cut.push('…');
    cut
}

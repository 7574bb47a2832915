use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::PointSchedule;

// The active schedule is the most recently stored one
const SELECT_ACTIVE: &str = "SELECT match_winner_points, best_player_points, tournament_winner_points, description FROM point_schedules ORDER BY id DESC LIMIT 1";

pub fn load_active(conn: &Connection) -> Result<Option<PointSchedule>> {
    conn.query_row(SELECT_ACTIVE, [], parse_schedule_row)
        .optional()
        .context("Failed to query point schedule")
}

/// Returns the active schedule, storing `defaults` first if none exists yet
pub fn load_or_create(conn: &Connection, defaults: &PointSchedule) -> Result<PointSchedule> {
    if let Some(existing) = load_active(conn)? {
        return Ok(existing);
    }

    log::info!(
        "No point schedule stored, creating defaults ({}/{}/{})",
        defaults.match_winner_points,
        defaults.best_player_points,
        defaults.tournament_winner_points
    );
    store(conn, defaults)
}

/// Makes `schedule` the active one. Earlier schedules are kept as history.
pub fn store(conn: &Connection, schedule: &PointSchedule) -> Result<PointSchedule> {
    let sql = "INSERT INTO point_schedules (match_winner_points, best_player_points, tournament_winner_points, description) VALUES (?1, ?2, ?3, ?4) RETURNING match_winner_points, best_player_points, tournament_winner_points, description";

    conn.query_row(
        sql,
        params![
            schedule.match_winner_points,
            schedule.best_player_points,
            schedule.tournament_winner_points,
            schedule.description
        ],
        parse_schedule_row,
    )
    .context("Failed to store point schedule")
}

fn parse_schedule_row(row: &rusqlite::Row) -> rusqlite::Result<PointSchedule> {
    Ok(PointSchedule {
        match_winner_points: row.get(0)?,
        best_player_points: row.get(1)?,
        tournament_winner_points: row.get(2)?,
        description: row.get(3)?,
    })
}

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{Team, TeamId};

const COLUMNS: &str = "id, name, code, priority";

pub fn insert_team(conn: &Connection, name: &str, code: &str, priority: i32) -> Result<Team> {
    let sql = format!(
        "INSERT INTO teams (name, code, priority) VALUES (?1, ?2, ?3) RETURNING {}",
        COLUMNS
    );

    conn.query_row(&sql, params![name, code, priority], parse_team_row)
        .with_context(|| format!("Failed to insert team {}", name))
}

pub fn update_team(conn: &Connection, team: &Team) -> Result<bool> {
    let sql = "UPDATE teams SET name = ?1, code = ?2, priority = ?3 WHERE id = ?4";

    let changed = conn
        .execute(sql, params![team.name, team.code, team.priority, team.id])
        .context("Failed to update team")?;
    Ok(changed > 0)
}

pub fn delete_team(conn: &Connection, id: TeamId) -> Result<bool> {
    let changed = conn
        .execute("DELETE FROM teams WHERE id = ?1", params![id])
        .context("Failed to delete team")?;
    Ok(changed > 0)
}

fn parse_team_row(row: &rusqlite::Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        priority: row.get(3)?,
    })
}

pub fn find_by_id(conn: &Connection, id: TeamId) -> Result<Option<Team>> {
    let sql = format!("SELECT {} FROM teams WHERE id = ?1", COLUMNS);

    conn.query_row(&sql, params![id], parse_team_row)
        .optional()
        .context("Failed to query team by id")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Team>> {
    let sql = format!("SELECT {} FROM teams ORDER BY priority, name", COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_team_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

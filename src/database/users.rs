use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{Role, User, UserId};

pub fn insert_user(conn: &Connection, username: &str, role: Role) -> Result<User> {
    let sql = "INSERT INTO users (username, role) VALUES (?1, ?2) RETURNING id, username, role, points";

    conn.query_row(sql, params![username, role], parse_user_row)
        .with_context(|| format!("Failed to insert user {}", username))
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        role: row.get(2)?,
        points: row.get(3)?,
    })
}

pub fn find_by_id(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let sql = "SELECT id, username, role, points FROM users WHERE id = ?1";

    conn.query_row(sql, params![id], parse_user_row)
        .optional()
        .context("Failed to query user by id")
}

/// Every user taking part in the predictions game (admins excluded)
pub fn list_voters(conn: &Connection) -> Result<Vec<User>> {
    let sql = "SELECT id, username, role, points FROM users WHERE role = 'user' ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_user_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_voters_above(conn: &Connection, points: i64) -> Result<usize> {
    let sql = "SELECT COUNT(*) FROM users WHERE role = 'user' AND points > ?1";

    let count: i64 = conn
        .query_row(sql, params![points], |row| row.get(0))
        .context("Failed to count users ahead in ranking")?;
    Ok(count as usize)
}

/// Only called alongside the vote rows that justify the increment
pub(crate) fn add_points(conn: &Connection, id: UserId, points: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET points = points + ?1 WHERE id = ?2",
        params![points, id],
    )
    .context("Failed to update user points")?;
    Ok(())
}

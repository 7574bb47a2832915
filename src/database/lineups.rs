use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::domain::{LineupEntry, MatchId, PlayerId};

/// Replaces the whole lineup of a match
pub fn set_lineup(
    conn: &mut Connection,
    match_id: MatchId,
    entries: &[(PlayerId, String)],
) -> Result<()> {
    let tx = conn.transaction().context("Failed to start lineup transaction")?;

    tx.execute("DELETE FROM lineups WHERE match_id = ?1", params![match_id])
        .context("Failed to clear lineup")?;
    for (player_id, position) in entries {
        tx.execute(
            "INSERT INTO lineups (match_id, player_id, position) VALUES (?1, ?2, ?3)",
            params![match_id, player_id, position],
        )
        .with_context(|| format!("Failed to add player {} to lineup", player_id))?;
    }

    tx.commit().context("Failed to commit lineup")
}

pub fn list_by_match(conn: &Connection, match_id: MatchId) -> Result<Vec<LineupEntry>> {
    let sql = "
        SELECT l.match_id, l.player_id, p.name, p.team_id, l.position
        FROM lineups l
        JOIN players p ON p.id = l.player_id
        WHERE l.match_id = ?1
        ORDER BY p.team_id, l.id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![match_id], |row| {
            Ok(LineupEntry {
                match_id: row.get(0)?,
                player_id: row.get(1)?,
                player_name: row.get(2)?,
                team_id: row.get(3)?,
                position: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

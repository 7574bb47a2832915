use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{Player, PlayerId, TeamId};

pub fn insert_player(
    conn: &Connection,
    team_id: TeamId,
    name: &str,
    position: Option<&str>,
) -> Result<Player> {
    let sql = "INSERT INTO players (team_id, name, position) VALUES (?1, ?2, ?3) RETURNING id, team_id, name, position";

    conn.query_row(sql, params![team_id, name, position], parse_player_row)
        .context("Failed to insert new player")
}

pub fn delete_player(conn: &Connection, id: PlayerId) -> Result<bool> {
    let changed = conn
        .execute("DELETE FROM players WHERE id = ?1", params![id])
        .context("Failed to delete player")?;
    Ok(changed > 0)
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        team_id: row.get(1)?,
        name: row.get(2)?,
        position: row.get(3)?,
    })
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = "SELECT id, team_id, name, position FROM players WHERE id = ?1";

    conn.query_row(sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_by_team(conn: &Connection, team_id: TeamId) -> Result<Vec<Player>> {
    let sql = "SELECT id, team_id, name, position FROM players WHERE team_id = ?1 ORDER BY name";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![team_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{at, memory_connection};
    use crate::database::{matches, teams, users, votes, NewMatch, NewMatchVote};
    use crate::domain::Role;

    #[test]
    fn test_players_belong_to_team() {
        let conn = memory_connection();
        let france = teams::insert_team(&conn, "France", "FRA", 0).unwrap();
        let spain = teams::insert_team(&conn, "Spain", "ESP", 0).unwrap();

        insert_player(&conn, france.id, "Mbappe", Some("FW")).unwrap();
        insert_player(&conn, france.id, "Griezmann", None).unwrap();
        insert_player(&conn, spain.id, "Pedri", Some("MF")).unwrap();

        let names: Vec<String> = list_by_team(&conn, france.id)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Griezmann", "Mbappe"]);
    }

    #[test]
    fn test_unknown_team_is_rejected() {
        let conn = memory_connection();
        assert!(insert_player(&conn, 99, "Nobody", None).is_err());
    }

    #[test]
    fn test_delete_player_clears_picks() {
        let conn = memory_connection();
        let france = teams::insert_team(&conn, "France", "FRA", 0).unwrap();
        let spain = teams::insert_team(&conn, "Spain", "ESP", 0).unwrap();
        let striker = insert_player(&conn, france.id, "Mbappe", Some("FW")).unwrap();
        let fan = users::insert_user(&conn, "fan", Role::User).unwrap();
        let m = matches::insert_match(
            &conn,
            &NewMatch {
                team_a_id: france.id,
                team_b_id: spain.id,
                scheduled_at: at(3, 18, 0),
                compo_publique: false,
                notes: String::new(),
            },
        )
        .unwrap();
        votes::insert_match_vote(
            &conn,
            &NewMatchVote {
                user_id: fan.id,
                match_id: m.id,
                team_id: france.id,
                best_player_id: Some(striker.id),
            },
        )
        .unwrap();

        assert!(delete_player(&conn, striker.id).unwrap());
        assert!(!delete_player(&conn, striker.id).unwrap());
        assert!(find_by_id(&conn, striker.id).unwrap().is_none());

        let vote = votes::find_match_vote(&conn, fan.id, m.id).unwrap().unwrap();
        assert_eq!(vote.team_id, france.id);
        assert_eq!(vote.best_player_id, None);
    }
}

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{DeleteOutcome, MatchFilter, MatchResult, NewMatch};
use crate::domain::{Match, MatchId, MatchStatus};

const COLUMNS: &str = "id, team_a_id, team_b_id, scheduled_at, status, score_a, score_b, man_of_the_match_id, compo_publique, notes";

pub fn insert_match(conn: &Connection, new_match: &NewMatch) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (team_a_id, team_b_id, scheduled_at, compo_publique, notes) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {}",
        COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            new_match.team_a_id,
            new_match.team_b_id,
            new_match.scheduled_at,
            new_match.compo_publique,
            new_match.notes
        ],
        parse_match_row,
    )
    .context("Failed to insert match")
}

pub fn update_schedule(
    conn: &Connection,
    id: MatchId,
    scheduled_at: NaiveDateTime,
    compo_publique: bool,
    notes: &str,
) -> Result<bool> {
    let sql = "UPDATE matches SET scheduled_at = ?1, compo_publique = ?2, notes = ?3 WHERE id = ?4";

    let changed = conn
        .execute(sql, params![scheduled_at, compo_publique, notes, id])
        .context("Failed to update match schedule")?;
    Ok(changed > 0)
}

pub fn set_status(conn: &Connection, id: MatchId, status: MatchStatus) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE matches SET status = ?1 WHERE id = ?2",
            params![status, id],
        )
        .context("Failed to update match status")?;
    Ok(changed > 0)
}

/// Records the final score and marks the match finished.
///
/// Returns false when the match does not exist or is already finished.
pub fn set_result(conn: &Connection, id: MatchId, result: &MatchResult) -> Result<bool> {
    let sql = "UPDATE matches SET status = ?1, score_a = ?2, score_b = ?3, man_of_the_match_id = ?4 WHERE id = ?5 AND status <> ?1";

    let changed = conn
        .execute(
            sql,
            params![
                MatchStatus::Finished,
                result.score_a,
                result.score_b,
                result.man_of_the_match_id,
                id
            ],
        )
        .context("Failed to record match result")?;
    Ok(changed > 0)
}

/// Deletes a match with its lineup and pending votes.
/// Refused once any vote on it has been validated.
pub fn delete_match(conn: &Connection, id: MatchId) -> Result<DeleteOutcome> {
    let sql = "DELETE FROM matches WHERE id = ?1 AND NOT EXISTS (SELECT 1 FROM match_votes WHERE match_id = ?1 AND validated = 1)";

    let changed = conn
        .execute(sql, params![id])
        .context("Failed to delete match")?;
    if changed > 0 {
        return Ok(DeleteOutcome::Deleted);
    }

    match find_by_id(conn, id)? {
        Some(_) => Ok(DeleteOutcome::HasValidatedVotes),
        None => Ok(DeleteOutcome::NotFound),
    }
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        team_a_id: row.get(1)?,
        team_b_id: row.get(2)?,
        scheduled_at: row.get(3)?,
        status: row.get(4)?,
        score_a: row.get(5)?,
        score_b: row.get(6)?,
        man_of_the_match_id: row.get(7)?,
        compo_publique: row.get(8)?,
        notes: row.get(9)?,
    })
}

pub fn find_by_id(conn: &Connection, id: MatchId) -> Result<Option<Match>> {
    let sql = format!("SELECT {} FROM matches WHERE id = ?1", COLUMNS);

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn list(conn: &Connection, filter: &MatchFilter) -> Result<Vec<Match>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();

    if let Some(status) = &filter.status {
        values.push(status);
        clauses.push(format!("status = ?{}", values.len()));
    }
    if let Some(from) = &filter.scheduled_from {
        values.push(from);
        clauses.push(format!("scheduled_at >= ?{}", values.len()));
    }
    if let Some(until) = &filter.scheduled_until {
        values.push(until);
        clauses.push(format!("scheduled_at <= ?{}", values.len()));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    let sql = format!(
        "SELECT {} FROM matches{} ORDER BY scheduled_at, id",
        COLUMNS, where_clause
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(values.as_slice(), parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Kickoff of the earliest match of the tournament
pub fn first_kickoff(conn: &Connection) -> Result<Option<NaiveDateTime>> {
    conn.query_row("SELECT MIN(scheduled_at) FROM matches", [], |row| row.get(0))
        .context("Failed to query first kickoff")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewMatchVote;
    use crate::database::testing::{at, memory_connection};
    use crate::database::{teams, users, votes};
    use crate::domain::Role;

    fn new_match(team_a_id: i64, team_b_id: i64, day: u32) -> NewMatch {
        NewMatch {
            team_a_id,
            team_b_id,
            scheduled_at: at(day, 18, 0),
            compo_publique: false,
            notes: String::new(),
        }
    }

    #[test]
    fn test_same_team_on_both_sides_is_rejected() {
        let conn = memory_connection();
        let france = teams::insert_team(&conn, "France", "FRA", 0).unwrap();

        assert!(insert_match(&conn, &new_match(france.id, france.id, 1)).is_err());
    }

    #[test]
    fn test_result_finishes_match() {
        let conn = memory_connection();
        let a = teams::insert_team(&conn, "France", "FRA", 0).unwrap();
        let b = teams::insert_team(&conn, "Spain", "ESP", 0).unwrap();
        let m = insert_match(&conn, &new_match(a.id, b.id, 1)).unwrap();
        assert_eq!(m.status, MatchStatus::Scheduled);
        assert!(!m.has_scores());

        let result = MatchResult {
            score_a: 2,
            score_b: 1,
            man_of_the_match_id: None,
        };
        assert!(set_result(&conn, m.id, &result).unwrap());

        let stored = find_by_id(&conn, m.id).unwrap().unwrap();
        assert_eq!(stored.status, MatchStatus::Finished);
        assert_eq!((stored.score_a, stored.score_b), (Some(2), Some(1)));
        assert_eq!(stored.winner(), Some(a.id));
    }

    #[test]
    fn test_list_with_filter_and_first_kickoff() {
        let conn = memory_connection();
        let a = teams::insert_team(&conn, "France", "FRA", 0).unwrap();
        let b = teams::insert_team(&conn, "Spain", "ESP", 0).unwrap();
        assert_eq!(first_kickoff(&conn).unwrap(), None);

        let late = insert_match(&conn, &new_match(a.id, b.id, 20)).unwrap();
        let early = insert_match(&conn, &new_match(b.id, a.id, 3)).unwrap();
        let middle = insert_match(&conn, &new_match(a.id, b.id, 10)).unwrap();
        set_status(&conn, middle.id, MatchStatus::Finished).unwrap();

        let ids: Vec<i64> = list(&conn, &MatchFilter::all())
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![early.id, middle.id, late.id]);

        let finished = list(&conn, &MatchFilter::finished()).unwrap();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].id, middle.id);

        let window = MatchFilter::all().between(at(5, 0, 0), at(25, 0, 0));
        assert_eq!(list(&conn, &window).unwrap().len(), 2);

        assert_eq!(first_kickoff(&conn).unwrap(), Some(at(3, 18, 0)));
    }

    #[test]
    fn test_finished_result_is_final() {
        let conn = memory_connection();
        let a = teams::insert_team(&conn, "France", "FRA", 0).unwrap();
        let b = teams::insert_team(&conn, "Spain", "ESP", 0).unwrap();
        let m = insert_match(&conn, &new_match(a.id, b.id, 1)).unwrap();
        let first = MatchResult {
            score_a: 2,
            score_b: 0,
            man_of_the_match_id: None,
        };
        let rewrite = MatchResult {
            score_a: 0,
            score_b: 3,
            man_of_the_match_id: None,
        };

        assert!(set_result(&conn, m.id, &first).unwrap());
        assert!(!set_result(&conn, m.id, &rewrite).unwrap());
        assert!(!set_result(&conn, 999, &first).unwrap());

        let stored = find_by_id(&conn, m.id).unwrap().unwrap();
        assert_eq!((stored.score_a, stored.score_b), (Some(2), Some(0)));
        assert_eq!(stored.winner(), Some(a.id));
    }

    #[test]
    fn test_update_schedule() {
        let conn = memory_connection();
        let a = teams::insert_team(&conn, "France", "FRA", 0).unwrap();
        let b = teams::insert_team(&conn, "Spain", "ESP", 0).unwrap();
        let m = insert_match(&conn, &new_match(a.id, b.id, 1)).unwrap();

        assert!(update_schedule(&conn, m.id, at(2, 21, 0), true, "Moved to Lyon").unwrap());
        assert!(!update_schedule(&conn, 999, at(2, 21, 0), true, "").unwrap());

        let stored = find_by_id(&conn, m.id).unwrap().unwrap();
        assert_eq!(stored.scheduled_at, at(2, 21, 0));
        assert!(stored.compo_publique);
        assert_eq!(stored.notes, "Moved to Lyon");
        assert_eq!(first_kickoff(&conn).unwrap(), Some(at(2, 21, 0)));
    }

    #[test]
    fn test_delete_match_keeps_validated_votes() {
        let conn = memory_connection();
        let a = teams::insert_team(&conn, "France", "FRA", 0).unwrap();
        let b = teams::insert_team(&conn, "Spain", "ESP", 0).unwrap();
        let fan = users::insert_user(&conn, "fan", Role::User).unwrap();
        let pending = insert_match(&conn, &new_match(a.id, b.id, 1)).unwrap();
        let played = insert_match(&conn, &new_match(b.id, a.id, 2)).unwrap();

        for match_id in [pending.id, played.id] {
            votes::insert_match_vote(
                &conn,
                &NewMatchVote {
                    user_id: fan.id,
                    match_id,
                    team_id: a.id,
                    best_player_id: None,
                },
            )
            .unwrap();
        }
        let vote = votes::find_match_vote(&conn, fan.id, played.id).unwrap().unwrap();
        votes::mark_match_vote_validated(&conn, vote.id, 10).unwrap();

        assert_eq!(delete_match(&conn, pending.id).unwrap(), DeleteOutcome::Deleted);
        assert_eq!(delete_match(&conn, pending.id).unwrap(), DeleteOutcome::NotFound);
        assert_eq!(votes::find_match_vote(&conn, fan.id, pending.id).unwrap(), None);

        assert_eq!(delete_match(&conn, played.id).unwrap(), DeleteOutcome::HasValidatedVotes);
        assert!(find_by_id(&conn, played.id).unwrap().is_some());
        assert!(votes::find_match_vote(&conn, fan.id, played.id).unwrap().is_some());
    }
}

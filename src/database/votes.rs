use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{is_unique_violation, InsertOutcome, NewMatchVote};
use crate::domain::{MatchId, MatchVote, TeamId, TournamentVote, UserId, VoteId};

const MATCH_VOTE_COLUMNS: &str =
    "id, user_id, match_id, team_id, best_player_id, points, validated, created_at";
const TOURNAMENT_VOTE_COLUMNS: &str = "id, user_id, team_id, points, validated, created_at";

// --- Match votes ---

/// Inserts the vote unless one already exists for (user, match).
/// The UNIQUE constraint decides, so concurrent callers cannot both insert.
pub fn insert_match_vote(conn: &Connection, vote: &NewMatchVote) -> Result<InsertOutcome<MatchVote>> {
    let sql = format!(
        "INSERT INTO match_votes (user_id, match_id, team_id, best_player_id) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
        MATCH_VOTE_COLUMNS
    );

    let inserted = conn.query_row(
        &sql,
        params![vote.user_id, vote.match_id, vote.team_id, vote.best_player_id],
        parse_match_vote_row,
    );

    match inserted {
        Ok(row) => Ok(InsertOutcome::Inserted(row)),
        Err(e) if is_unique_violation(&e) => {
            let existing = find_match_vote(conn, vote.user_id, vote.match_id)?.ok_or_else(|| {
                anyhow!(
                    "Vote of user {} on match {} rejected as duplicate but not found",
                    vote.user_id,
                    vote.match_id
                )
            })?;
            Ok(InsertOutcome::AlreadyExists(existing))
        }
        Err(e) => Err(e).context("Failed to insert match vote"),
    }
}

fn parse_match_vote_row(row: &rusqlite::Row) -> rusqlite::Result<MatchVote> {
    Ok(MatchVote {
        id: row.get(0)?,
        user_id: row.get(1)?,
        match_id: row.get(2)?,
        team_id: row.get(3)?,
        best_player_id: row.get(4)?,
        points: row.get(5)?,
        validated: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn find_match_vote(
    conn: &Connection,
    user_id: UserId,
    match_id: MatchId,
) -> Result<Option<MatchVote>> {
    let sql = format!(
        "SELECT {} FROM match_votes WHERE user_id = ?1 AND match_id = ?2",
        MATCH_VOTE_COLUMNS
    );

    conn.query_row(&sql, params![user_id, match_id], parse_match_vote_row)
        .optional()
        .context("Failed to query match vote")
}

pub fn list_match_votes(conn: &Connection, validated_only: bool) -> Result<Vec<MatchVote>> {
    let sql = if validated_only {
        format!("SELECT {} FROM match_votes WHERE validated = 1 ORDER BY id", MATCH_VOTE_COLUMNS)
    } else {
        format!("SELECT {} FROM match_votes ORDER BY id", MATCH_VOTE_COLUMNS)
    };

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_match_vote_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_pending_for_match(conn: &Connection, match_id: MatchId) -> Result<Vec<MatchVote>> {
    let sql = format!(
        "SELECT {} FROM match_votes WHERE match_id = ?1 AND validated = 0 ORDER BY id",
        MATCH_VOTE_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![match_id], parse_match_vote_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Returns false when the vote was already validated
pub(crate) fn mark_match_vote_validated(conn: &Connection, id: VoteId, points: i64) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE match_votes SET points = ?1, validated = 1 WHERE id = ?2 AND validated = 0",
            params![points, id],
        )
        .context("Failed to validate match vote")?;
    Ok(changed > 0)
}

// --- Tournament votes ---

pub fn insert_tournament_vote(
    conn: &Connection,
    user_id: UserId,
    team_id: TeamId,
) -> Result<InsertOutcome<TournamentVote>> {
    let sql = format!(
        "INSERT INTO tournament_votes (user_id, team_id) VALUES (?1, ?2) RETURNING {}",
        TOURNAMENT_VOTE_COLUMNS
    );

    match conn.query_row(&sql, params![user_id, team_id], parse_tournament_vote_row) {
        Ok(row) => Ok(InsertOutcome::Inserted(row)),
        Err(e) if is_unique_violation(&e) => {
            let existing = find_tournament_vote(conn, user_id)?.ok_or_else(|| {
                anyhow!(
                    "Tournament vote of user {} rejected as duplicate but not found",
                    user_id
                )
            })?;
            Ok(InsertOutcome::AlreadyExists(existing))
        }
        Err(e) => Err(e).context("Failed to insert tournament vote"),
    }
}

fn parse_tournament_vote_row(row: &rusqlite::Row) -> rusqlite::Result<TournamentVote> {
    Ok(TournamentVote {
        id: row.get(0)?,
        user_id: row.get(1)?,
        team_id: row.get(2)?,
        points: row.get(3)?,
        validated: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn find_tournament_vote(conn: &Connection, user_id: UserId) -> Result<Option<TournamentVote>> {
    let sql = format!(
        "SELECT {} FROM tournament_votes WHERE user_id = ?1",
        TOURNAMENT_VOTE_COLUMNS
    );

    conn.query_row(&sql, params![user_id], parse_tournament_vote_row)
        .optional()
        .context("Failed to query tournament vote")
}

pub fn list_tournament_votes(conn: &Connection, validated_only: bool) -> Result<Vec<TournamentVote>> {
    let sql = if validated_only {
        format!(
            "SELECT {} FROM tournament_votes WHERE validated = 1 ORDER BY id",
            TOURNAMENT_VOTE_COLUMNS
        )
    } else {
        format!("SELECT {} FROM tournament_votes ORDER BY id", TOURNAMENT_VOTE_COLUMNS)
    };

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_tournament_vote_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub(crate) fn mark_tournament_vote_validated(
    conn: &Connection,
    id: VoteId,
    points: i64,
) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE tournament_votes SET points = ?1, validated = 1 WHERE id = ?2 AND validated = 0",
            params![points, id],
        )
        .context("Failed to validate tournament vote")?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewMatch;
    use crate::database::testing::{at, memory_connection};
    use crate::database::{matches, teams, users};
    use crate::domain::Role;

    struct Fixture {
        conn: Connection,
        user_id: UserId,
        match_id: MatchId,
        team_id: TeamId,
    }

    fn fixture() -> Fixture {
        let conn = memory_connection();
        let a = teams::insert_team(&conn, "France", "FRA", 0).unwrap();
        let b = teams::insert_team(&conn, "Spain", "ESP", 0).unwrap();
        let user = users::insert_user(&conn, "alice", Role::User).unwrap();
        let m = matches::insert_match(
            &conn,
            &NewMatch {
                team_a_id: a.id,
                team_b_id: b.id,
                scheduled_at: at(1, 21, 0),
                compo_publique: false,
                notes: String::new(),
            },
        )
        .unwrap();

        Fixture {
            conn,
            user_id: user.id,
            match_id: m.id,
            team_id: a.id,
        }
    }

    #[test]
    fn test_second_match_vote_returns_existing() {
        let f = fixture();
        let ballot = NewMatchVote {
            user_id: f.user_id,
            match_id: f.match_id,
            team_id: f.team_id,
            best_player_id: None,
        };

        let first = insert_match_vote(&f.conn, &ballot).unwrap();
        let InsertOutcome::Inserted(created) = first else {
            panic!("first vote should be inserted");
        };
        assert_eq!(created.points, 0);
        assert!(!created.validated);

        let second = insert_match_vote(&f.conn, &ballot).unwrap();
        assert_eq!(second, InsertOutcome::AlreadyExists(created));
        assert_eq!(list_match_votes(&f.conn, false).unwrap().len(), 1);
    }

    #[test]
    fn test_second_tournament_vote_returns_existing() {
        let f = fixture();

        assert!(insert_tournament_vote(&f.conn, f.user_id, f.team_id).unwrap().is_inserted());
        let again = insert_tournament_vote(&f.conn, f.user_id, f.team_id).unwrap();
        assert!(!again.is_inserted());
    }

    #[test]
    fn test_validation_marks_once() {
        let f = fixture();
        let ballot = NewMatchVote {
            user_id: f.user_id,
            match_id: f.match_id,
            team_id: f.team_id,
            best_player_id: None,
        };
        let InsertOutcome::Inserted(vote) = insert_match_vote(&f.conn, &ballot).unwrap() else {
            panic!("vote should be inserted");
        };

        assert_eq!(list_pending_for_match(&f.conn, f.match_id).unwrap().len(), 1);
        assert!(mark_match_vote_validated(&f.conn, vote.id, 10).unwrap());
        assert!(!mark_match_vote_validated(&f.conn, vote.id, 10).unwrap());

        assert!(list_pending_for_match(&f.conn, f.match_id).unwrap().is_empty());
        let validated = list_match_votes(&f.conn, true).unwrap();
        assert_eq!(validated[0].points, 10);
        assert!(validated[0].validated);
    }
}

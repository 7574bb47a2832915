use anyhow::Result;
use chrono::NaiveDateTime;

use super::connection::{get_connection, DbPool};
use super::models::{InsertOutcome, MatchFilter, NewMatchVote};
use super::{lineups, matches, players, point_schedule, teams, users, votes};
use crate::domain::{
    LineupEntry, Match, MatchId, MatchVote, Player, PlayerId, PointSchedule, Team, TeamId,
    TournamentVote, User, UserId,
};

/// Read-model consumed by the ranking engine, plus the atomic vote inserts
pub trait ScoringStore {
    fn teams(&self) -> Result<Vec<Team>>;
    fn team(&self, id: TeamId) -> Result<Option<Team>>;
    fn player(&self, id: PlayerId) -> Result<Option<Player>>;

    fn matches(&self, filter: &MatchFilter) -> Result<Vec<Match>>;
    fn match_by_id(&self, id: MatchId) -> Result<Option<Match>>;
    fn first_kickoff(&self) -> Result<Option<NaiveDateTime>>;
    fn lineup(&self, match_id: MatchId) -> Result<Vec<LineupEntry>>;

    fn match_votes(&self, validated_only: bool) -> Result<Vec<MatchVote>>;
    fn tournament_votes(&self, validated_only: bool) -> Result<Vec<TournamentVote>>;
    fn find_match_vote(&self, user_id: UserId, match_id: MatchId) -> Result<Option<MatchVote>>;
    fn find_tournament_vote(&self, user_id: UserId) -> Result<Option<TournamentVote>>;

    fn voters(&self) -> Result<Vec<User>>;
    fn user(&self, id: UserId) -> Result<Option<User>>;
    fn count_voters_above(&self, points: i64) -> Result<usize>;

    fn point_schedule(&self) -> Result<PointSchedule>;

    fn insert_match_vote(&self, vote: &NewMatchVote) -> Result<InsertOutcome<MatchVote>>;
    fn insert_tournament_vote(
        &self,
        user_id: UserId,
        team_id: TeamId,
    ) -> Result<InsertOutcome<TournamentVote>>;
}

/// `ScoringStore` backed by the SQLite pool
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
    default_points: PointSchedule,
}

impl SqliteStore {
    pub fn new(pool: DbPool, default_points: PointSchedule) -> Self {
        Self {
            pool,
            default_points,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl ScoringStore for SqliteStore {
    fn teams(&self) -> Result<Vec<Team>> {
        let conn = get_connection(&self.pool)?;
        teams::list_all(&conn)
    }

    fn team(&self, id: TeamId) -> Result<Option<Team>> {
        let conn = get_connection(&self.pool)?;
        teams::find_by_id(&conn, id)
    }

    fn player(&self, id: PlayerId) -> Result<Option<Player>> {
        let conn = get_connection(&self.pool)?;
        players::find_by_id(&conn, id)
    }

    fn matches(&self, filter: &MatchFilter) -> Result<Vec<Match>> {
        let conn = get_connection(&self.pool)?;
        matches::list(&conn, filter)
    }

    fn match_by_id(&self, id: MatchId) -> Result<Option<Match>> {
        let conn = get_connection(&self.pool)?;
        matches::find_by_id(&conn, id)
    }

    fn first_kickoff(&self) -> Result<Option<NaiveDateTime>> {
        let conn = get_connection(&self.pool)?;
        matches::first_kickoff(&conn)
    }

    fn lineup(&self, match_id: MatchId) -> Result<Vec<LineupEntry>> {
        let conn = get_connection(&self.pool)?;
        lineups::list_by_match(&conn, match_id)
    }

    fn match_votes(&self, validated_only: bool) -> Result<Vec<MatchVote>> {
        let conn = get_connection(&self.pool)?;
        votes::list_match_votes(&conn, validated_only)
    }

    fn tournament_votes(&self, validated_only: bool) -> Result<Vec<TournamentVote>> {
        let conn = get_connection(&self.pool)?;
        votes::list_tournament_votes(&conn, validated_only)
    }

    fn find_match_vote(&self, user_id: UserId, match_id: MatchId) -> Result<Option<MatchVote>> {
        let conn = get_connection(&self.pool)?;
        votes::find_match_vote(&conn, user_id, match_id)
    }

    fn find_tournament_vote(&self, user_id: UserId) -> Result<Option<TournamentVote>> {
        let conn = get_connection(&self.pool)?;
        votes::find_tournament_vote(&conn, user_id)
    }

    fn voters(&self) -> Result<Vec<User>> {
        let conn = get_connection(&self.pool)?;
        users::list_voters(&conn)
    }

    fn user(&self, id: UserId) -> Result<Option<User>> {
        let conn = get_connection(&self.pool)?;
        users::find_by_id(&conn, id)
    }

    fn count_voters_above(&self, points: i64) -> Result<usize> {
        let conn = get_connection(&self.pool)?;
        users::count_voters_above(&conn, points)
    }

    fn point_schedule(&self) -> Result<PointSchedule> {
        let conn = get_connection(&self.pool)?;
        point_schedule::load_or_create(&conn, &self.default_points)
    }

    fn insert_match_vote(&self, vote: &NewMatchVote) -> Result<InsertOutcome<MatchVote>> {
        let conn = get_connection(&self.pool)?;
        votes::insert_match_vote(&conn, vote)
    }

    fn insert_tournament_vote(
        &self,
        user_id: UserId,
        team_id: TeamId,
    ) -> Result<InsertOutcome<TournamentVote>> {
        let conn = get_connection(&self.pool)?;
        votes::insert_tournament_vote(&conn, user_id, team_id)
    }
}

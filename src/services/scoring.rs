use chrono::NaiveDateTime;
use log::{info, warn};
use serde::Serialize;

use crate::config::settings::AppConfig;
use crate::database::{MatchFilter, ScoringStore};
use crate::domain::{MatchId, MatchVote, TeamId, TournamentVote, UserId};
use crate::errors::{Entity, ScoringError, ScoringResult};
use crate::lineup::{composition_view, is_composition_visible, CompositionView};
use crate::ranking::standings::finished_without_scores;
use crate::ranking::{
    calculate_leaderboard, calculate_standings, find_points_mismatches, LeaderboardEntry,
    PointsMismatch, TeamStanding, UserRank,
};
use crate::voting::{attempt_match_vote, attempt_tournament_vote, MatchBallot};

/// Findings of a consistency pass over stored points and match results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub points_mismatches: Vec<PointsMismatch>,
    pub matches_without_scores: Vec<MatchId>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.points_mismatches.is_empty() && self.matches_without_scores.is_empty()
    }

    /// The findings as a single `DataIntegrity` error, if there are any
    pub fn into_result(self) -> ScoringResult<()> {
        if self.is_clean() {
            return Ok(());
        }

        Err(ScoringError::DataIntegrity(format!(
            "{} users with diverging points, {} finished matches without scores",
            self.points_mismatches.len(),
            self.matches_without_scores.len()
        )))
    }
}

/// Queries and vote commands of the ranking engine over a store snapshot
pub struct ScoringService<S> {
    store: S,
    config: AppConfig,
}

impl<S: ScoringStore> ScoringService<S> {
    pub fn new(store: S, config: AppConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn team_standings(&self) -> ScoringResult<Vec<TeamStanding>> {
        let teams = self.store.teams()?;
        let finished = self.store.matches(&MatchFilter::finished())?;
        let votes = self.store.match_votes(true)?;

        for match_id in finished_without_scores(&finished) {
            warn!("Match {} is finished without scores, counting them as 0", match_id);
        }

        Ok(calculate_standings(
            &teams,
            &finished,
            &votes,
            &self.config.ranking,
        ))
    }

    pub fn leaderboard(&self) -> ScoringResult<Vec<LeaderboardEntry>> {
        let users = self.store.voters()?;
        let match_votes = self.store.match_votes(false)?;
        let tournament_votes = self.store.tournament_votes(false)?;

        Ok(calculate_leaderboard(&users, &match_votes, &tournament_votes))
    }

    /// Rank from the stored running total, 1 + voters strictly ahead
    pub fn user_rank(&self, user_id: UserId) -> ScoringResult<UserRank> {
        let user = self
            .store
            .user(user_id)?
            .ok_or_else(|| ScoringError::not_found(Entity::User, user_id))?;
        let ahead = self.store.count_voters_above(user.points)?;

        Ok(UserRank {
            user_id,
            points: user.points,
            rank: ahead + 1,
        })
    }

    pub fn vote_on_match(
        &self,
        user_id: UserId,
        ballot: &MatchBallot,
        now: NaiveDateTime,
    ) -> ScoringResult<MatchVote> {
        attempt_match_vote(&self.store, user_id, ballot, now)
    }

    pub fn vote_on_tournament(
        &self,
        user_id: UserId,
        team_id: TeamId,
        now: NaiveDateTime,
    ) -> ScoringResult<TournamentVote> {
        attempt_tournament_vote(&self.store, user_id, team_id, now)
    }

    pub fn lineup(&self, match_id: MatchId, now: NaiveDateTime) -> ScoringResult<CompositionView> {
        let fixture = self
            .store
            .match_by_id(match_id)?
            .ok_or_else(|| ScoringError::not_found(Entity::Match, match_id))?;
        let window = self.config.lineup.disclosure_window();

        // Entries are only loaded when they may be shown
        if !is_composition_visible(&fixture, now, window) {
            return Ok(composition_view(&fixture, Vec::new(), now, window));
        }

        let entries = self.store.lineup(match_id)?;
        Ok(composition_view(&fixture, entries, now, window))
    }

    pub fn check_integrity(&self) -> ScoringResult<IntegrityReport> {
        let users = self.store.voters()?;
        let match_votes = self.store.match_votes(true)?;
        let tournament_votes = self.store.tournament_votes(true)?;
        let finished = self.store.matches(&MatchFilter::finished())?;

        let report = IntegrityReport {
            points_mismatches: find_points_mismatches(&users, &match_votes, &tournament_votes),
            matches_without_scores: finished_without_scores(&finished),
        };

        for mismatch in &report.points_mismatches {
            warn!(
                "User {} has {} stored points but {} from validated votes",
                mismatch.user_id, mismatch.stored, mismatch.recomputed
            );
        }
        for match_id in &report.matches_without_scores {
            warn!("Match {} is finished without scores", match_id);
        }
        if report.is_clean() {
            info!("Integrity check passed for {} users", users.len());
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rusqlite::params;

    use crate::database::testing::{at, file_pool, TempDb};
    use crate::database::{
        get_connection, lineups, matches, players, teams, users, MatchResult, NewMatch,
        SqliteStore,
    };
    use crate::domain::{MatchStatus, PointSchedule, Role};
    use crate::voting::validate_match;

    struct World {
        _db: TempDb,
        service: ScoringService<SqliteStore>,
        france: TeamId,
        spain: TeamId,
        italy: TeamId,
        opener: MatchId,
        striker: i64,
        alice: UserId,
        bob: UserId,
        carol: UserId,
    }

    fn world() -> World {
        let db = file_pool();
        let pool = db.pool();
        let mut conn = get_connection(&pool).unwrap();

        let france = teams::insert_team(&conn, "France", "FRA", 0).unwrap().id;
        let spain = teams::insert_team(&conn, "Spain", "ESP", 1).unwrap().id;
        let italy = teams::insert_team(&conn, "Italy", "ITA", 2).unwrap().id;
        let striker = players::insert_player(&conn, france, "Mbappe", Some("FW")).unwrap().id;
        let alice = users::insert_user(&conn, "alice", Role::User).unwrap().id;
        let bob = users::insert_user(&conn, "bob", Role::User).unwrap().id;
        let carol = users::insert_user(&conn, "carol", Role::User).unwrap().id;
        users::insert_user(&conn, "root", Role::Admin).unwrap();

        let opener = matches::insert_match(
            &conn,
            &NewMatch {
                team_a_id: france,
                team_b_id: spain,
                scheduled_at: at(11, 18, 0),
                compo_publique: false,
                notes: String::new(),
            },
        )
        .unwrap()
        .id;
        lineups::set_lineup(&mut conn, opener, &[(striker, "FW".to_string())]).unwrap();

        let service = ScoringService::new(
            SqliteStore::new(pool, PointSchedule::default()),
            AppConfig::new(),
        );

        World {
            _db: db,
            service,
            france,
            spain,
            italy,
            opener,
            striker,
            alice,
            bob,
            carol,
        }
    }

    fn ballot(match_id: MatchId, team_id: TeamId, best: Option<i64>) -> MatchBallot {
        MatchBallot {
            match_id,
            team_id,
            best_player_id: best,
        }
    }

    fn finish(w: &World, score_a: i32, score_b: i32, best: Option<i64>) {
        let mut conn = get_connection(w.service.store().pool()).unwrap();
        let result = MatchResult {
            score_a,
            score_b,
            man_of_the_match_id: best,
        };
        matches::set_result(&conn, w.opener, &result).unwrap();
        validate_match(&mut conn, w.opener, &PointSchedule::default()).unwrap();
    }

    #[test]
    fn test_standings_over_finished_matches() {
        let w = world();
        let before = at(11, 12, 0);
        w.service
            .vote_on_match(w.alice, &ballot(w.opener, w.france, None), before)
            .unwrap();
        finish(&w, 2, 1, None);

        let standings = w.service.team_standings().unwrap();

        let order: Vec<TeamId> = standings.iter().map(|s| s.team_id).collect();
        assert_eq!(order, vec![w.france, w.italy, w.spain]);
        assert_eq!(standings[0].points, 3);
        assert_eq!(standings[0].votes_won, 1);
        assert_eq!(standings[1].played, 0);
        assert_eq!(standings[2].goal_difference, -1);
    }

    #[test]
    fn test_user_rank_agrees_with_leaderboard_after_validation() {
        let w = world();
        let before = at(11, 12, 0);
        w.service
            .vote_on_match(w.alice, &ballot(w.opener, w.france, Some(w.striker)), before)
            .unwrap();
        w.service
            .vote_on_match(w.bob, &ballot(w.opener, w.france, None), before)
            .unwrap();
        w.service
            .vote_on_match(w.carol, &ballot(w.opener, w.spain, None), before)
            .unwrap();
        finish(&w, 3, 0, Some(w.striker));

        let board = w.service.leaderboard().unwrap();
        assert_eq!(board.len(), 3);
        for entry in &board {
            let rank = w.service.user_rank(entry.user_id).unwrap();
            assert_eq!(rank.rank, entry.rank);
            assert_eq!(rank.points, entry.points);
        }

        assert_eq!(board[0].user_id, w.alice);
        assert_eq!(board[0].points, 15);
        assert_eq!(board[2].accuracy, 0.0);
        assert!(w.service.check_integrity().unwrap().is_clean());
    }

    #[test]
    fn test_user_rank_unknown_user() {
        let w = world();

        let err = w.service.user_rank(404).unwrap_err();
        assert!(matches!(err, ScoringError::NotFound { entity: Entity::User, id: 404 }));
    }

    #[test]
    fn test_lineup_visibility() {
        let w = world();

        let early = w.service.lineup(w.opener, at(11, 16, 59)).unwrap();
        assert_eq!(
            early,
            CompositionView::Hidden {
                minutes_until_composition: 61
            }
        );

        match w.service.lineup(w.opener, at(11, 17, 1)).unwrap() {
            CompositionView::Visible { entries } => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].player_id, w.striker);
            }
            other => panic!("expected a visible lineup, got {:?}", other),
        }

        assert!(matches!(
            w.service.lineup(999, at(11, 17, 0)),
            Err(ScoringError::NotFound { entity: Entity::Match, .. })
        ));
    }

    #[test]
    fn test_integrity_reports_tampered_totals() {
        let w = world();
        let conn = get_connection(w.service.store().pool()).unwrap();
        conn.execute("UPDATE users SET points = 42 WHERE id = ?1", params![w.bob])
            .unwrap();
        matches::set_status(&conn, w.opener, MatchStatus::Finished).unwrap();

        let report = w.service.check_integrity().unwrap();

        assert_eq!(
            report.points_mismatches,
            vec![PointsMismatch {
                user_id: w.bob,
                stored: 42,
                recomputed: 0,
            }]
        );
        assert_eq!(report.matches_without_scores, vec![w.opener]);
        assert!(matches!(
            report.into_result(),
            Err(ScoringError::DataIntegrity(_))
        ));
    }

    #[test]
    fn test_tournament_vote_closes_at_first_kickoff() {
        let w = world();

        w.service
            .vote_on_tournament(w.alice, w.italy, at(11, 17, 59))
            .unwrap();
        let err = w
            .service
            .vote_on_tournament(w.bob, w.italy, at(11, 18, 0) + Duration::seconds(1))
            .unwrap_err();

        assert!(matches!(err, ScoringError::VotingClosed { .. }));
    }
}

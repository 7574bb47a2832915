use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::domain::{LineupEntry, Match};

/// What a viewer gets to see of a match lineup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CompositionView {
    Visible {
        entries: Vec<LineupEntry>,
    },
    #[serde(rename_all = "camelCase")]
    Hidden {
        minutes_until_composition: i64,
    },
}

/// A lineup is disclosed when the match is flagged public, or when kickoff
/// is at most `window` away in either direction.
pub fn is_composition_visible(fixture: &Match, now: NaiveDateTime, window: Duration) -> bool {
    if fixture.compo_publique {
        return true;
    }

    (fixture.scheduled_at - now).abs() <= window
}

/// Whole minutes left before kickoff, never negative
pub fn minutes_until_kickoff(fixture: &Match, now: NaiveDateTime) -> i64 {
    (fixture.scheduled_at - now).num_minutes().max(0)
}

pub fn composition_view(
    fixture: &Match,
    entries: Vec<LineupEntry>,
    now: NaiveDateTime,
    window: Duration,
) -> CompositionView {
    if is_composition_visible(fixture, now, window) {
        CompositionView::Visible { entries }
    } else {
        CompositionView::Hidden {
            minutes_until_composition: minutes_until_kickoff(fixture, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::at;
    use crate::domain::MatchStatus;

    fn fixture(kickoff: NaiveDateTime, public: bool) -> Match {
        Match {
            id: 1,
            team_a_id: 1,
            team_b_id: 2,
            scheduled_at: kickoff,
            status: MatchStatus::Scheduled,
            score_a: None,
            score_b: None,
            man_of_the_match_id: None,
            compo_publique: public,
            notes: String::new(),
        }
    }

    fn entry() -> LineupEntry {
        LineupEntry {
            match_id: 1,
            player_id: 7,
            player_name: "Griezmann".to_string(),
            team_id: 1,
            position: "MF".to_string(),
        }
    }

    #[test]
    fn test_hidden_more_than_an_hour_before_kickoff() {
        let now = at(10, 12, 0);
        let m = fixture(now + Duration::minutes(61), false);

        let view = composition_view(&m, vec![entry()], now, Duration::minutes(60));

        assert_eq!(
            view,
            CompositionView::Hidden {
                minutes_until_composition: 61
            }
        );
    }

    #[test]
    fn test_visible_within_the_hour() {
        let now = at(10, 12, 0);
        let window = Duration::minutes(60);

        assert!(is_composition_visible(&fixture(now + Duration::minutes(59), false), now, window));
        assert!(is_composition_visible(&fixture(now + Duration::minutes(60), false), now, window));
    }

    #[test]
    fn test_visible_after_kickoff() {
        let now = at(10, 12, 0);
        let m = fixture(now - Duration::minutes(30), false);

        let view = composition_view(&m, vec![entry()], now, Duration::minutes(60));

        assert_eq!(view, CompositionView::Visible { entries: vec![entry()] });
    }

    #[test]
    fn test_hidden_again_an_hour_after_kickoff() {
        let now = at(10, 12, 0);
        let window = Duration::minutes(60);

        let last_minute = fixture(now - Duration::minutes(60), false);
        assert_eq!(
            composition_view(&last_minute, vec![entry()], now, window),
            CompositionView::Visible { entries: vec![entry()] }
        );

        let over = fixture(now - Duration::minutes(61), false);
        assert_eq!(
            composition_view(&over, vec![entry()], now, window),
            CompositionView::Hidden {
                minutes_until_composition: 0
            }
        );
    }

    #[test]
    fn test_public_flag_overrides_schedule() {
        let now = at(10, 12, 0);
        let m = fixture(now + Duration::days(3), true);

        assert!(is_composition_visible(&m, now, Duration::minutes(60)));
    }

    #[test]
    fn test_hidden_view_serializes_minutes() {
        let view = CompositionView::Hidden {
            minutes_until_composition: 90,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "hidden");
        assert_eq!(json["minutesUntilComposition"], 90);
    }
}

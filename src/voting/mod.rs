pub mod admission;
pub mod validation;

pub use admission::{attempt_match_vote, attempt_tournament_vote, MatchBallot};
pub use validation::{validate_match, validate_tournament, ValidationSummary};

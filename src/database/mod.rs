pub mod connection;
pub mod lineups;
pub mod matches;
pub mod models;
pub mod players;
pub mod point_schedule;
pub mod setup;
pub mod store;
pub mod teams;
pub mod users;
pub mod votes;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
pub use models::*;
pub use store::{ScoringStore, SqliteStore};

pub mod settings;

pub use settings::{AppConfig, LineupSettings, RankingSettings};

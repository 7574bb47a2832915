use chrono::Duration;

use crate::domain::PointSchedule;

const DEFAULT_DATABASE_PATH: &str = "pronostics.db";

#[derive(Debug, Clone)]
pub struct RankingSettings {
    /// How many recent results make up a team's form
    pub form_length: usize,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self { form_length: 5 }
    }
}

#[derive(Debug, Clone)]
pub struct LineupSettings {
    /// Lineups become visible this many minutes around kickoff
    pub disclosure_window_minutes: i64,
}

impl LineupSettings {
    pub fn disclosure_window(&self) -> Duration {
        Duration::minutes(self.disclosure_window_minutes)
    }
}

impl Default for LineupSettings {
    fn default() -> Self {
        Self {
            disclosure_window_minutes: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub ranking: RankingSettings,
    pub lineup: LineupSettings,
    /// Seed values for the point schedule when none is stored yet
    pub default_points: PointSchedule,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            ranking: RankingSettings::default(),
            lineup: LineupSettings::default(),
            default_points: PointSchedule::default(),
        }
    }

    /// Same as `new`, with the database location taken from `DATABASE_PATH` when set
    pub fn from_env() -> Self {
        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());

        Self {
            database_path,
            ..Self::new()
        }
    }

    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.database_path = path.into();
        self
    }
}

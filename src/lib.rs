pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod lineup;
pub mod output;
pub mod ranking;
pub mod services;
pub mod voting;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::{point_schedule, setup, MatchResult, SqliteStore};
use crate::output::should_use_colors;
use crate::services::results::ResultsService;
use crate::services::scoring::ScoringService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_pool(config: &AppConfig) -> Result<database::DbPool> {
    let pool = database::create_pool(&config.database_path)?;
    let conn = database::get_connection(&pool)?;
    setup::ensure_schema(&conn)?;
    Ok(pool)
}

fn scoring_service(config: AppConfig) -> Result<ScoringService<SqliteStore>> {
    let pool = open_pool(&config)?;
    let store = SqliteStore::new(pool, config.default_points.clone());
    Ok(ScoringService::new(store, config))
}

fn results_service(config: &AppConfig) -> Result<ResultsService> {
    let pool = open_pool(config)?;
    Ok(ResultsService::new(pool, config.default_points.clone()))
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init(reset: bool) -> Result<()> {
    let config = AppConfig::from_env();
    let pool = database::create_pool(&config.database_path)?;
    let conn = database::get_connection(&pool)?;

    if reset {
        setup::reset_database(&conn)?;
        info!("Database {} reset", config.database_path);
    } else {
        setup::ensure_schema(&conn)?;
    }

    let schedule = point_schedule::load_or_create(&conn, &config.default_points)?;
    info!(
        "Active point schedule: {}/{}/{} ({})",
        schedule.match_winner_points,
        schedule.best_player_points,
        schedule.tournament_winner_points,
        schedule.description
    );
    Ok(())
}

pub fn handle_standings() -> Result<()> {
    let service = scoring_service(AppConfig::from_env())?;
    let standings = service.team_standings()?;
    println!("{}", output::format_standings(&standings, should_use_colors()));
    Ok(())
}

pub fn handle_leaderboard() -> Result<()> {
    let service = scoring_service(AppConfig::from_env())?;
    let board = service.leaderboard()?;
    println!("{}", output::format_leaderboard(&board, should_use_colors()));
    Ok(())
}

pub fn handle_rank(user_id: i64) -> Result<()> {
    let service = scoring_service(AppConfig::from_env())?;
    let rank = service.user_rank(user_id)?;
    println!(
        "User {} is ranked #{} with {} points",
        rank.user_id, rank.rank, rank.points
    );
    Ok(())
}

pub fn handle_finish_match(
    match_id: i64,
    score_a: i32,
    score_b: i32,
    man_of_the_match_id: Option<i64>,
) -> Result<()> {
    let service = results_service(&AppConfig::from_env())?;
    let result = MatchResult {
        score_a,
        score_b,
        man_of_the_match_id,
    };
    let summary = service.finish_match(match_id, &result)?;
    println!("{}", output::format_validation(&summary));
    Ok(())
}

pub fn handle_validate_match(match_id: i64) -> Result<()> {
    let service = results_service(&AppConfig::from_env())?;
    let summary = service.validate_match(match_id)?;
    println!("{}", output::format_validation(&summary));
    Ok(())
}

pub fn handle_validate_tournament(team_id: i64) -> Result<()> {
    let service = results_service(&AppConfig::from_env())?;
    let summary = service.validate_tournament(team_id)?;
    println!("{}", output::format_validation(&summary));
    Ok(())
}

/// Prints the findings and fails when there are any
pub fn handle_check() -> Result<()> {
    let service = scoring_service(AppConfig::from_env())?;
    let report = service.check_integrity()?;
    println!("{}", output::format_integrity(&report, should_use_colors()));
    Ok(report.into_result()?)
}

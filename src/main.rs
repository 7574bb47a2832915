use anyhow::Result;

use pronostics_ranking::cli::Command;
use pronostics_ranking::{
    handle_check, handle_finish_match, handle_init, handle_leaderboard, handle_rank,
    handle_serve, handle_standings, handle_validate_match, handle_validate_tournament, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Init { reset } => handle_init(*reset),
        Command::Standings => handle_standings(),
        Command::Leaderboard => handle_leaderboard(),
        Command::Rank { user_id } => handle_rank(*user_id),
        Command::FinishMatch {
            match_id,
            score_a,
            score_b,
            motm,
        } => handle_finish_match(*match_id, *score_a, *score_b, *motm),
        Command::ValidateMatch { match_id } => handle_validate_match(*match_id),
        Command::ValidateTournament { team_id } => handle_validate_tournament(*team_id),
        Command::Check => handle_check(),
    }
}

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "pronostics ranking engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema and the default point schedule
    Init {
        /// Drop every table first
        #[arg(long)]
        reset: bool,
    },
    /// Print the team standings
    Standings,
    /// Print the participant leaderboard
    Leaderboard,
    /// Print a single participant's rank
    Rank { user_id: i64 },
    /// Record a final score and validate the votes on the match
    FinishMatch {
        match_id: i64,
        score_a: i32,
        score_b: i32,
        /// Man of the match
        #[arg(long)]
        motm: Option<i64>,
    },
    /// Validate pending votes on a finished match
    ValidateMatch { match_id: i64 },
    /// Validate tournament votes against the winning team
    ValidateTournament { team_id: i64 },
    /// Compare stored points with validated votes
    Check,
}

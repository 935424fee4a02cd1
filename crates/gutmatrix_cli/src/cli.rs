use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gutmatrix")]
#[command(about = "Collaborative GUT (gravity, urgency, trend) prioritization", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database file shared by all participants
    #[arg(long, env = "GUTMATRIX_DB", default_value = "gutmatrix.db")]
    pub db: PathBuf,

    /// Absolute directory for rolling log files (logging is off when unset)
    #[arg(long, env = "GUTMATRIX_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GUTMATRIX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Act as administrator (checked upstream by the deployment's auth gate)
    #[arg(long, global = true)]
    pub admin: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage problem definitions
    Problem {
        #[command(subcommand)]
        action: ProblemAction,
    },
    /// Submit or replace a vote
    Vote {
        /// Problem id or name
        problem: String,
        /// Participant name
        participant: String,
        gravity: i64,
        urgency: i64,
        trend: i64,
    },
    /// Show every problem with the participant's current vote
    MyVotes { participant: String },
    /// Print the ranked priority report
    Report {
        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
    /// Print workspace counters
    Stats,
    /// Print export rows as JSON lines
    Export,
    /// Remove every problem and vote (admin)
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum ProblemAction {
    /// Create a problem, or update the one with the same name (admin)
    Add {
        name: String,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// List problems in creation order
    List,
    /// Remove a problem and its votes (admin)
    Remove {
        /// Problem id or name
        problem: String,
    },
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "leaderboard-harvest")]
#[command(about = "Collects daily leaderboards into one validated report")]
#[command(version)]
pub struct Args {
    /// JSON configuration file; defaults apply to anything it omits
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Visit every planned leaderboard page and save the report (default)
    Run,

    /// Fetch news headlines, drop duplicates and optionally summarize them
    Headlines {
        /// Pages to read; the configured headline URLs when omitted
        urls: Vec<String>,

        /// Ask the summarization provider for a briefing
        #[arg(long)]
        summarize: bool,
    },

    /// Validate a report payload produced elsewhere and save it if it conforms
    Validate {
        /// File holding the candidate JSON payload
        payload: PathBuf,
    },
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

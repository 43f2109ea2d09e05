use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tessera",
    version,
    about = "Infer the structure of a bank statement export before importing it"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Raise log verbosity (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TOML file overriding scan limits, thresholds or the header vocabulary.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Detect delimiter, header row, column suggestions and dialect.
    Analyze {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the analysis as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Print the header fingerprint and its digest.
    Fingerprint {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    /// Filter directive used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_with_flags() {
        let cli = Cli::parse_from(["tessera", "-vv", "analyze", "stmt.csv", "--json"]);
        assert_eq!(cli.log_level(), "debug");
        match cli.command {
            Command::Analyze { file, json } => {
                assert_eq!(file, PathBuf::from("stmt.csv"));
                assert!(json);
            }
            Command::Fingerprint { .. } => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn config_is_global() {
        let cli = Cli::parse_from(["tessera", "fingerprint", "a.csv", "--config", "t.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("t.toml")));
        assert_eq!(cli.log_level(), "warn");
    }
}

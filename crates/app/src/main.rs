use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let analyzer = commands::load_analyzer(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze { file, json } => {
            let report = commands::analyze_file(&file, &analyzer)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", commands::render_summary(&report));
            }
        }
        Command::Fingerprint { file } => {
            let (fingerprint, digest) = commands::fingerprint_file(&file, &analyzer)?;
            println!("{fingerprint}");
            println!("{digest}");
        }
    }

    Ok(())
}

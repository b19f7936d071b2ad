use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use dynamo_manager::cli::{Args, Command};
use dynamo_manager::client::DynamoRegistry;
use dynamo_manager::{CapacityUpdatePlanner, PlannerConfig, SearchEngine, UpdateOutcome};

fn main() -> ExitCode {
    let args = Args::parse();
    dynamo_manager::logging::init_logging(args.level);
    debug!(?args, "Parsed arguments");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    // Validate before touching AWS.
    let command = args.command()?;

    let registry = DynamoRegistry::connect(&args.client_config())
        .context("Failed to create DynamoDB client")?;

    match command {
        Command::Search(criteria, config) => {
            let tables = SearchEngine::new(&registry, config)
                .execute(&criteria)
                .context("Failed to search DynamoDB tables")?;
            println!("{}", serde_json::to_string_pretty(&tables)?);
        }
        Command::Update(intent) => {
            let outcome = CapacityUpdatePlanner::new(&registry, PlannerConfig::default())
                .execute(&intent)
                .with_context(|| format!("Failed to update DynamoDB table {}", intent.target))?;
            if outcome == UpdateOutcome::Unchanged {
                info!(table = %intent.target, "Table already has the requested configuration");
            }
        }
    }

    Ok(())
}

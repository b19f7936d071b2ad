//! Command-line arguments and their validation.

use clap::{Parser, ValueEnum};

use crate::capacity::UpdateIntent;
use crate::client::ClientConfig;
use crate::errors::{ManagerError, Result};
use crate::search::{DEFAULT_FUZZY_THRESHOLD, SearchConfig, SearchCriteria};

const USAGE: &str = "\
dynamo-manager --search <TABLE_NAME> [--profile <PROFILE>] [--level <LEVEL>]
    dynamo-manager --tag <TAG_VALUE> [--profile <PROFILE>] [--level <LEVEL>]
    dynamo-manager --search <TABLE_NAME> --tag <TAG_VALUE>
    dynamo-manager --update <TABLE_NAME> --rcu <RCU> --wcu <WCU>
    dynamo-manager --update <TABLE_NAME> --provisioned [--rcu <RCU>] [--wcu <WCU>]
    dynamo-manager --update <TABLE_NAME> --ondemand";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dynamo-manager", version)]
#[command(about = "Manage DynamoDB tables with fuzzy search and update capabilities")]
#[command(override_usage = USAGE)]
pub struct Args {
    /// Search term for DynamoDB table names
    #[arg(long, value_name = "TABLE_NAME")]
    pub search: Option<String>,

    /// Value of the tag for DynamoDB table search
    #[arg(long, value_name = "TAG_VALUE")]
    pub tag: Option<String>,

    /// Name of the DynamoDB table to update
    #[arg(long, value_name = "TABLE_NAME")]
    pub update: Option<String>,

    /// Read capacity units
    #[arg(long)]
    pub rcu: Option<u64>,

    /// Write capacity units
    #[arg(long)]
    pub wcu: Option<u64>,

    /// Provisioned capacity mode
    #[arg(long)]
    pub provisioned: bool,

    /// On-demand capacity mode
    #[arg(long)]
    pub ondemand: bool,

    /// Minimum similarity (0-100) for fuzzy name matches
    #[arg(
        long,
        value_name = "RATIO",
        default_value_t = i64::from(DEFAULT_FUZZY_THRESHOLD),
        allow_negative_numbers = true
    )]
    pub fuzzy_ratio: i64,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, env = "DYNAMO_MANAGER_LOG_LEVEL")]
    pub level: LogLevel,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom DynamoDB endpoint (e.g. http://localhost:8000)
    #[arg(long, value_name = "URL")]
    pub endpoint_url: Option<String>,
}

/// The one thing a run of the binary does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(SearchCriteria, SearchConfig),
    Update(UpdateIntent),
}

fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}

impl Args {
    /// Validate flag combinations and turn them into a [`Command`].
    pub fn command(&self) -> Result<Command> {
        let searching = is_set(self.search.as_deref()) || is_set(self.tag.as_deref());
        let updating = is_set(self.update.as_deref());
        let capacity_flags =
            self.rcu.is_some() || self.wcu.is_some() || self.provisioned || self.ondemand;

        if !searching && !updating {
            return Err(ManagerError::validation(
                "any of search or tag or update param must be provided",
            ));
        }
        if searching && capacity_flags {
            return Err(ManagerError::validation(
                "search or tag cannot be used together with rcu, wcu, provisioned, ondemand",
            ));
        }
        if updating && searching {
            return Err(ManagerError::validation(
                "update can't be used together with search or tag",
            ));
        }
        if updating && !capacity_flags {
            return Err(ManagerError::validation(
                "no rcu or wcu or provisioned or ondemand is provided",
            ));
        }
        if updating && self.ondemand && (self.rcu.is_some() || self.wcu.is_some()) {
            return Err(ManagerError::validation(
                "ondemand mode does not support rcu or wcu",
            ));
        }
        if self.provisioned && self.ondemand {
            return Err(ManagerError::validation(
                "provisioned and ondemand are mutually exclusive",
            ));
        }

        if searching {
            return Ok(Command::Search(
                SearchCriteria::new(self.search.clone(), self.tag.clone()),
                SearchConfig::with_threshold(self.fuzzy_ratio),
            ));
        }

        Ok(Command::Update(UpdateIntent {
            target: self.update.clone().unwrap_or_default(),
            switch_to_on_demand: self.ondemand,
            switch_to_provisioned: self.provisioned,
            read_units: self.rcu,
            write_units: self.wcu,
        }))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            region: self.region.clone(),
            profile: self.profile.clone().filter(|p| !p.is_empty()),
            endpoint_url: self.endpoint_url.clone(),
            ..Default::default()
        }
    }
}

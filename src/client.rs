//! DynamoDB client module.
//!
//! Provides a flexible DynamoDB client that supports multiple credential sources:
//! - Hardcoded credentials
//! - AWS profiles
//! - Environment variables / default chain
//!
//! [`DynamoRegistry`] wraps the async SDK client behind the blocking
//! [`Registry`] trait used by the search engine and the capacity planner.

use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::types::{self as ddb, ProvisionedThroughput};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::errors::{RegistryError, map_sdk_error};
use crate::registry::{
    BillingMode, CapacityConfig, CapacityUpdate, Registry, Tag, TableDescription,
};

/// Connection settings for the DynamoDB client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// AWS region (default: provider chain, then us-east-1).
    pub region: Option<String>,
    /// AWS profile name from ~/.aws/config and ~/.aws/credentials.
    pub profile: Option<String>,
    /// Custom endpoint URL for local testing (DynamoDB Local, localstack).
    pub endpoint_url: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
}

/// Build the AWS SDK DynamoDB client with the given configuration.
///
/// Credentials priority: hardcoded keys > profile > default chain
/// (env vars, web identity, instance profile, etc).
pub async fn build_client(config: &ClientConfig) -> Client {
    // Region priority: param > default provider > us-east-1
    let region_provider = RegionProviderChain::first_try(
        config
            .region
            .clone()
            .map(aws_sdk_dynamodb::config::Region::new),
    )
    .or_default_provider()
    .or_else("us-east-1");

    let mut config_loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    if let (Some(ak), Some(sk)) = (&config.access_key, &config.secret_key) {
        let creds = Credentials::new(
            ak,
            sk,
            config.session_token.clone(),
            None,
            "dynamo-manager-static",
        );
        config_loader = config_loader.credentials_provider(creds);
    } else if let Some(profile_name) = &config.profile {
        let profile_provider = ProfileFileCredentialsProvider::builder()
            .profile_name(profile_name)
            .build();
        config_loader = config_loader
            .profile_name(profile_name)
            .credentials_provider(profile_provider);
    }

    let sdk_config = config_loader.load().await;

    let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
    if let Some(url) = &config.endpoint_url {
        dynamo_config = dynamo_config.endpoint_url(url);
    }

    debug!(region = ?sdk_config.region(), "Instantiated DynamoDB client");
    Client::from_conf(dynamo_config.build())
}

/// [`Registry`] backed by the real DynamoDB API.
///
/// Every call blocks on the shared runtime.
pub struct DynamoRegistry {
    client: Client,
    runtime: Arc<Runtime>,
}

impl DynamoRegistry {
    /// Create a registry with its own multi-threaded runtime.
    pub fn connect(config: &ClientConfig) -> Result<Self, RegistryError> {
        let runtime = Runtime::new().map_err(|e| {
            RegistryError::Request(format!("Failed to create tokio runtime: {}", e))
        })?;
        let runtime = Arc::new(runtime);
        let client = runtime.block_on(build_client(config));
        Ok(Self::new(client, runtime))
    }

    pub fn new(client: Client, runtime: Arc<Runtime>) -> Self {
        Self { client, runtime }
    }
}

impl Registry for DynamoRegistry {
    fn list_table_names(&self) -> Result<Vec<String>, RegistryError> {
        let mut names = Vec::new();
        let mut start: Option<String> = None;

        loop {
            let request = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start.take());
            let output = self
                .runtime
                .block_on(async { request.send().await })
                .map_err(|e| map_sdk_error(e, None))?;

            names.extend(output.table_names().iter().cloned());
            match output.last_evaluated_table_name() {
                Some(last) => start = Some(last.to_string()),
                None => break,
            }
        }

        debug!(count = names.len(), "Listed tables");
        Ok(names)
    }

    fn describe_table(&self, name: &str) -> Result<TableDescription, RegistryError> {
        let request = self.client.describe_table().table_name(name);
        let output = self
            .runtime
            .block_on(async { request.send().await })
            .map_err(|e| map_sdk_error(e, Some(name)))?;

        let table = output.table().ok_or_else(|| {
            RegistryError::MalformedResponse(format!("no description returned for table {}", name))
        })?;
        let arn = table.table_arn().ok_or_else(|| {
            RegistryError::MalformedResponse(format!("no ARN returned for table {}", name))
        })?;

        let billing_mode = table
            .billing_mode_summary()
            .and_then(|summary| summary.billing_mode())
            .map(billing_mode_from_sdk)
            .unwrap_or(BillingMode::Unknown);

        let capacity = match billing_mode {
            BillingMode::Provisioned => table.provisioned_throughput().map(|throughput| {
                CapacityConfig::new(
                    units_from_sdk(throughput.read_capacity_units()),
                    units_from_sdk(throughput.write_capacity_units()),
                )
            }),
            _ => None,
        };

        Ok(TableDescription {
            arn: arn.to_string(),
            billing_mode,
            capacity,
        })
    }

    fn list_tags(&self, arn: &str) -> Result<Vec<Tag>, RegistryError> {
        let mut tags = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let request = self
                .client
                .list_tags_of_resource()
                .resource_arn(arn)
                .set_next_token(next_token.take());
            let output = self
                .runtime
                .block_on(async { request.send().await })
                .map_err(|e| map_sdk_error(e, None))?;

            tags.extend(
                output
                    .tags()
                    .iter()
                    .map(|tag| Tag::new(tag.key(), tag.value())),
            );
            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(tags)
    }

    fn update_capacity(&self, name: &str, update: &CapacityUpdate) -> Result<(), RegistryError> {
        let mut request = self.client.update_table().table_name(name);

        match *update {
            CapacityUpdate::OnDemand => {
                request = request.billing_mode(ddb::BillingMode::PayPerRequest);
            }
            CapacityUpdate::Provisioned {
                capacity,
                switch_mode,
            } => {
                let throughput = ProvisionedThroughput::builder()
                    .read_capacity_units(units_to_sdk(capacity.read_units)?)
                    .write_capacity_units(units_to_sdk(capacity.write_units)?)
                    .build()
                    .map_err(|e| RegistryError::Request(e.to_string()))?;
                request = request.provisioned_throughput(throughput);
                if switch_mode {
                    request = request.billing_mode(ddb::BillingMode::Provisioned);
                }
            }
        }

        self.runtime
            .block_on(async { request.send().await })
            .map_err(|e| map_sdk_error(e, Some(name)))?;
        Ok(())
    }
}

fn billing_mode_from_sdk(mode: &ddb::BillingMode) -> BillingMode {
    match mode {
        ddb::BillingMode::Provisioned => BillingMode::Provisioned,
        ddb::BillingMode::PayPerRequest => BillingMode::OnDemand,
        _ => BillingMode::Unknown,
    }
}

fn units_from_sdk(units: Option<i64>) -> u64 {
    units.and_then(|u| u64::try_from(u).ok()).unwrap_or(0)
}

fn units_to_sdk(units: u64) -> Result<i64, RegistryError> {
    i64::try_from(units)
        .map_err(|_| RegistryError::Request(format!("capacity units out of range: {}", units)))
}

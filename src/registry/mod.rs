//! Table registry capability.
//!
//! The search engine and the capacity planner never talk to AWS directly.
//! They are handed a [`Registry`] at construction time:
//! - `DynamoRegistry` (in `client`) for real tables
//! - `fake::FakeRegistry` for unit tests

#[cfg(test)]
pub(crate) mod fake;

use serde::Serialize;

use crate::errors::RegistryError;

/// A table found by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    pub name: String,
    pub arn: String,
}

/// A single key/value tag attached to a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Billing mode as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    Provisioned,
    OnDemand,
    /// No billing summary was returned.
    Unknown,
}

impl std::fmt::Display for BillingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BillingMode::Provisioned => "PROVISIONED",
            BillingMode::OnDemand => "PAY_PER_REQUEST",
            BillingMode::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Provisioned read/write capacity units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityConfig {
    pub read_units: u64,
    pub write_units: u64,
}

impl CapacityConfig {
    pub fn new(read_units: u64, write_units: u64) -> Self {
        Self {
            read_units,
            write_units,
        }
    }
}

/// What `describe_table` returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    pub arn: String,
    pub billing_mode: BillingMode,
    /// Only populated when `billing_mode` is `Provisioned`.
    pub capacity: Option<CapacityConfig>,
}

/// The one mutation a capacity update can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityUpdate {
    /// Switch to pay-per-request. Carries no capacity values.
    OnDemand,
    /// Set provisioned throughput, switching the billing mode when `switch_mode` is set.
    Provisioned {
        capacity: CapacityConfig,
        switch_mode: bool,
    },
}

/// Operations the engines need from the table registry.
///
/// Implementations are blocking. Listing may be paginated internally but is
/// returned as one sequence.
pub trait Registry: Send + Sync {
    /// Names of every table visible to the caller, in registry order.
    fn list_table_names(&self) -> Result<Vec<String>, RegistryError>;

    /// ARN, billing mode and provisioned capacity of one table.
    fn describe_table(&self, name: &str) -> Result<TableDescription, RegistryError>;

    /// Tags attached to the resource with the given ARN.
    fn list_tags(&self, arn: &str) -> Result<Vec<Tag>, RegistryError>;

    /// Apply a billing mode / capacity change to a table.
    fn update_capacity(&self, name: &str, update: &CapacityUpdate) -> Result<(), RegistryError>;
}

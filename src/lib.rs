//! Find DynamoDB tables by fuzzy name or tag value, and switch their
//! billing mode or provisioned capacity without redundant updates.
//!
//! The two engines, [`search::SearchEngine`] and
//! [`capacity::CapacityUpdatePlanner`], work against any
//! [`registry::Registry`]; [`client::DynamoRegistry`] is the AWS-backed one.

pub mod capacity;
pub mod cli;
pub mod client;
pub mod errors;
pub mod logging;
pub mod registry;
pub mod search;

pub use capacity::{CapacityUpdatePlanner, PlannerConfig, UpdateIntent, UpdateOutcome};
pub use errors::{ManagerError, RegistryError, Result};
pub use registry::{
    BillingMode, CapacityConfig, CapacityUpdate, Registry, ResourceDescriptor, TableDescription,
    Tag,
};
pub use search::{SearchConfig, SearchCriteria, SearchEngine};

//! Capacity management for DynamoDB tables.
//!
//! - `planner` - decide and apply billing mode / throughput changes

mod planner;

pub use planner::{
    CapacityUpdatePlanner, DEFAULT_READ_UNITS, DEFAULT_WRITE_UNITS, PlannerConfig, UpdateIntent,
    UpdateOutcome,
};

//! Table search for DynamoDB.
//!
//! This module provides:
//! - `similarity` - fuzzy score between two table names
//! - `engine` - name, tag and combined search over a registry

mod engine;
pub mod similarity;

pub use engine::{DEFAULT_FUZZY_THRESHOLD, SearchConfig, SearchCriteria, SearchEngine};

//! Table search by fuzzy name and/or tag value.

use tracing::{debug, info, warn};

use super::similarity::{normalize, score};
use crate::errors::{ManagerError, Result};
use crate::registry::{Registry, ResourceDescriptor};

/// Default minimum similarity for a fuzzy name match.
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Minimum [`score`] a non-substring name needs to be accepted.
    pub fuzzy_threshold: u8,
}

impl SearchConfig {
    /// Build a config from an externally supplied threshold, clamped into `0..=100`.
    pub fn with_threshold(threshold: i64) -> Self {
        Self {
            fuzzy_threshold: normalize(threshold),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

/// What to search for. Both fields set means both must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub fuzzy_name: Option<String>,
    pub tag_value: Option<String>,
}

impl SearchCriteria {
    /// Empty strings are treated as unset.
    pub fn new(fuzzy_name: Option<String>, tag_value: Option<String>) -> Self {
        Self {
            fuzzy_name: fuzzy_name.filter(|s| !s.is_empty()),
            tag_value: tag_value.filter(|s| !s.is_empty()),
        }
    }

    pub fn by_name(fuzzy_name: impl Into<String>) -> Self {
        Self::new(Some(fuzzy_name.into()), None)
    }

    pub fn by_tag(tag_value: impl Into<String>) -> Self {
        Self::new(None, Some(tag_value.into()))
    }
}

/// Resolves search criteria into tables using a [`Registry`].
pub struct SearchEngine<'a, R: Registry + ?Sized> {
    registry: &'a R,
    config: SearchConfig,
}

impl<'a, R: Registry + ?Sized> SearchEngine<'a, R> {
    pub fn new(registry: &'a R, config: SearchConfig) -> Self {
        Self { registry, config }
    }

    /// Run a search. Name and tag filters combine with AND semantics.
    ///
    /// # Errors
    ///
    /// `Validation` when neither field is set (the registry is not touched),
    /// `Registry` when the table listing fails. Per-table lookup failures are
    /// logged and skipped.
    pub fn execute(&self, criteria: &SearchCriteria) -> Result<Vec<ResourceDescriptor>> {
        let fuzzy_name = criteria.fuzzy_name.as_deref();
        let tag_value = criteria.tag_value.as_deref();

        let matches = match (fuzzy_name, tag_value) {
            (Some(name), Some(tag)) => {
                info!(fuzzy_name = name, tag_value = tag, "Searching tables by fuzzy name and tag");
                let names = self.registry.list_table_names()?;
                let by_name: Vec<String> = self
                    .match_by_name(&names, name)
                    .into_iter()
                    .map(|table| table.name)
                    .collect();
                self.match_by_tag(tag, Some(&by_name))?
            }
            (Some(name), None) => {
                info!(fuzzy_name = name, "Searching tables by fuzzy name");
                let names = self.registry.list_table_names()?;
                self.match_by_name(&names, name)
            }
            (None, Some(tag)) => {
                info!(tag_value = tag, "Searching tables by tag");
                self.match_by_tag(tag, None)?
            }
            (None, None) => {
                return Err(ManagerError::validation(
                    "search table name or tag value should not be empty",
                ));
            }
        };

        if matches.is_empty() {
            warn!(
                fuzzy_name = fuzzy_name.unwrap_or_default(),
                tag_value = tag_value.unwrap_or_default(),
                "Empty search results, check the search conditions"
            );
        }
        for table in &matches {
            info!(table = %table.name, arn = %table.arn, "Matched table");
        }

        Ok(matches)
    }

    /// Tables whose name contains `fuzzy_name`, or is similar enough to it.
    ///
    /// The substring check is case-sensitive; the similarity fallback is not.
    pub fn match_by_name(&self, names: &[String], fuzzy_name: &str) -> Vec<ResourceDescriptor> {
        let needle = fuzzy_name.to_lowercase();
        let mut matches = Vec::new();

        for name in names {
            if !name.contains(fuzzy_name) {
                let similarity = score(&needle, &name.to_lowercase());
                debug!(fuzzy_name, table = %name, similarity, "Calculated similarity");
                if similarity < self.config.fuzzy_threshold {
                    continue;
                }
            }

            match self.registry.describe_table(name) {
                Ok(description) => matches.push(ResourceDescriptor {
                    name: name.clone(),
                    arn: description.arn,
                }),
                Err(e) => warn!(table = %name, error = %e, "Skipping table: failed to get ARN"),
            }
        }

        matches
    }

    /// Tables carrying a tag whose value equals `tag_value`.
    ///
    /// Scans `candidates` when given, otherwise every table in the registry.
    /// Each table appears at most once.
    pub fn match_by_tag(
        &self,
        tag_value: &str,
        candidates: Option<&[String]>,
    ) -> Result<Vec<ResourceDescriptor>> {
        let listed;
        let names = match candidates {
            Some(names) => names,
            None => {
                listed = self.registry.list_table_names()?;
                &listed[..]
            }
        };

        let mut matches = Vec::new();
        for name in names {
            debug!(table = %name, "Checking tags");
            let arn = match self.registry.describe_table(name) {
                Ok(description) => description.arn,
                Err(e) => {
                    warn!(table = %name, error = %e, "Skipping table: failed to get ARN");
                    continue;
                }
            };

            let tags = match self.registry.list_tags(&arn) {
                Ok(tags) => tags,
                Err(e) => {
                    warn!(table = %name, arn = %arn, error = %e, "Skipping table: failed to get tags");
                    continue;
                }
            };

            if tags.iter().any(|tag| tag.value == tag_value) {
                matches.push(ResourceDescriptor {
                    name: name.clone(),
                    arn,
                });
            }
        }

        Ok(matches)
    }
}

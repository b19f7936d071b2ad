//! In-memory registry for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use super::{
    BillingMode, CapacityConfig, CapacityUpdate, Registry, Tag, TableDescription,
};
use crate::errors::RegistryError;

/// One recorded registry call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Describe(String),
    Tags(String),
    Update(String, CapacityUpdate),
}

pub struct FakeTable {
    pub name: String,
    pub arn: String,
    pub billing_mode: BillingMode,
    pub capacity: Option<CapacityConfig>,
    pub tags: Vec<Tag>,
}

impl FakeTable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            arn: format!("arn:aws:dynamodb:us-east-1:123456789012:table/{name}"),
            billing_mode: BillingMode::OnDemand,
            capacity: None,
            tags: Vec::new(),
        }
    }

    pub fn arn(mut self, arn: &str) -> Self {
        self.arn = arn.to_string();
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }

    pub fn provisioned(mut self, read_units: u64, write_units: u64) -> Self {
        self.billing_mode = BillingMode::Provisioned;
        self.capacity = Some(CapacityConfig::new(read_units, write_units));
        self
    }

    pub fn billing(mut self, mode: BillingMode) -> Self {
        self.billing_mode = mode;
        self
    }
}

#[derive(Default)]
pub struct FakeRegistry {
    tables: Vec<FakeTable>,
    fail_list: bool,
    fail_describe: HashSet<String>,
    fail_tags: HashSet<String>,
    fail_update: Option<RegistryError>,
    calls: Mutex<Vec<Call>>,
}

impl FakeRegistry {
    pub fn new(tables: Vec<FakeTable>) -> Self {
        Self {
            tables,
            ..Default::default()
        }
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_describe(mut self, name: &str) -> Self {
        self.fail_describe.insert(name.to_string());
        self
    }

    pub fn failing_tags(mut self, arn: &str) -> Self {
        self.fail_tags.insert(arn.to_string());
        self
    }

    pub fn failing_update(mut self, err: RegistryError) -> Self {
        self.fail_update = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn updates(&self) -> Vec<(String, CapacityUpdate)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update(name, update) => Some((name, update)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Registry for FakeRegistry {
    fn list_table_names(&self) -> Result<Vec<String>, RegistryError> {
        self.record(Call::List);
        if self.fail_list {
            return Err(RegistryError::Connection("list failed".to_string()));
        }
        Ok(self.tables.iter().map(|t| t.name.clone()).collect())
    }

    fn describe_table(&self, name: &str) -> Result<TableDescription, RegistryError> {
        self.record(Call::Describe(name.to_string()));
        if self.fail_describe.contains(name) {
            return Err(RegistryError::AccessDenied(format!("describe {name}")));
        }
        let table = self
            .tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        Ok(TableDescription {
            arn: table.arn.clone(),
            billing_mode: table.billing_mode,
            capacity: table.capacity,
        })
    }

    fn list_tags(&self, arn: &str) -> Result<Vec<Tag>, RegistryError> {
        self.record(Call::Tags(arn.to_string()));
        if self.fail_tags.contains(arn) {
            return Err(RegistryError::Throttled(format!("tags {arn}")));
        }
        Ok(self
            .tables
            .iter()
            .find(|t| t.arn == arn)
            .map(|t| t.tags.clone())
            .unwrap_or_default())
    }

    fn update_capacity(&self, name: &str, update: &CapacityUpdate) -> Result<(), RegistryError> {
        self.record(Call::Update(name.to_string(), *update));
        match &self.fail_update {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

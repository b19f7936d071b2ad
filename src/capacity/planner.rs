//! Billing mode / capacity update planner.
//!
//! Reads the table's current billing configuration and issues at most one
//! `UpdateTable` call. Requests that would not change anything are no-ops.

use tracing::{info, warn};

use crate::errors::{ManagerError, Result};
use crate::registry::{BillingMode, CapacityConfig, CapacityUpdate, Registry};

/// Read capacity units used when the caller omits `--rcu`.
pub const DEFAULT_READ_UNITS: u64 = 5;

/// Write capacity units used when the caller omits `--wcu`.
pub const DEFAULT_WRITE_UNITS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    pub default_read_units: u64,
    pub default_write_units: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_read_units: DEFAULT_READ_UNITS,
            default_write_units: DEFAULT_WRITE_UNITS,
        }
    }
}

/// A requested change to one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateIntent {
    pub target: String,
    pub switch_to_on_demand: bool,
    pub switch_to_provisioned: bool,
    pub read_units: Option<u64>,
    pub write_units: Option<u64>,
}

impl UpdateIntent {
    pub fn on_demand(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            switch_to_on_demand: true,
            ..Default::default()
        }
    }

    pub fn provisioned(
        target: impl Into<String>,
        read_units: Option<u64>,
        write_units: Option<u64>,
    ) -> Self {
        Self {
            target: target.into(),
            switch_to_provisioned: true,
            read_units,
            write_units,
            ..Default::default()
        }
    }

    pub fn capacity(
        target: impl Into<String>,
        read_units: Option<u64>,
        write_units: Option<u64>,
    ) -> Self {
        Self {
            target: target.into(),
            read_units,
            write_units,
            ..Default::default()
        }
    }

    fn has_capacity(&self) -> bool {
        self.read_units.is_some() || self.write_units.is_some()
    }

    /// Checks that need no registry round trip.
    fn validate(&self) -> Result<()> {
        if self.target.is_empty() {
            return Err(ManagerError::validation("table name to update must not be empty"));
        }
        if self.switch_to_on_demand && self.switch_to_provisioned {
            return Err(ManagerError::validation(
                "provisioned and ondemand are mutually exclusive",
            ));
        }
        if self.switch_to_on_demand && self.has_capacity() {
            return Err(ManagerError::validation(
                "ondemand mode does not support rcu or wcu",
            ));
        }
        if !self.switch_to_on_demand && !self.switch_to_provisioned && !self.has_capacity() {
            return Err(ManagerError::validation(
                "no rcu or wcu or provisioned or ondemand is provided",
            ));
        }
        Ok(())
    }
}

/// Result of a successful planner run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The table already had the requested configuration.
    Unchanged,
    /// This mutation was sent to the registry.
    Applied(CapacityUpdate),
}

pub struct CapacityUpdatePlanner<'a, R: Registry + ?Sized> {
    registry: &'a R,
    config: PlannerConfig,
}

impl<'a, R: Registry + ?Sized> CapacityUpdatePlanner<'a, R> {
    pub fn new(registry: &'a R, config: PlannerConfig) -> Self {
        Self { registry, config }
    }

    /// Bring the target table to the requested billing mode / capacity.
    ///
    /// # Errors
    ///
    /// `Validation` for contradictory intents and for capacity changes on a
    /// table that is not provisioned unless `switch_to_provisioned` is set.
    /// `Registry` when the describe or the update call fails; the update is
    /// never retried.
    pub fn execute(&self, intent: &UpdateIntent) -> Result<UpdateOutcome> {
        intent.validate()?;

        let table = intent.target.as_str();
        let current = self.registry.describe_table(table)?;

        if intent.switch_to_on_demand {
            if current.billing_mode == BillingMode::OnDemand {
                warn!(table, "No need to switch, table is already in on-demand mode");
                return Ok(UpdateOutcome::Unchanged);
            }
            return self.apply(table, CapacityUpdate::OnDemand);
        }

        if current.billing_mode != BillingMode::Provisioned && !intent.switch_to_provisioned {
            return Err(ManagerError::validation(format!(
                "table {} is in {} mode, which does not support modification of rcu or wcu; \
                 pass --provisioned to switch",
                table, current.billing_mode
            )));
        }

        let desired = CapacityConfig::new(
            intent.read_units.unwrap_or(self.config.default_read_units),
            intent.write_units.unwrap_or(self.config.default_write_units),
        );

        if current.billing_mode == BillingMode::Provisioned && current.capacity == Some(desired) {
            warn!(
                table,
                read_units = desired.read_units,
                write_units = desired.write_units,
                "No need to update, table is already provisioned with the same rcu and wcu"
            );
            return Ok(UpdateOutcome::Unchanged);
        }

        self.apply(
            table,
            CapacityUpdate::Provisioned {
                capacity: desired,
                switch_mode: intent.switch_to_provisioned,
            },
        )
    }

    fn apply(&self, table: &str, update: CapacityUpdate) -> Result<UpdateOutcome> {
        self.registry.update_capacity(table, &update)?;
        match update {
            CapacityUpdate::OnDemand => info!(table, "Switched to on-demand capacity"),
            CapacityUpdate::Provisioned { capacity, switch_mode } => info!(
                table,
                read_units = capacity.read_units,
                write_units = capacity.write_units,
                switch_mode,
                "Provisioned capacity updated"
            ),
        }
        Ok(UpdateOutcome::Applied(update))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RegistryError;
    use crate::registry::fake::{Call, FakeRegistry, FakeTable};

    fn provisioned_table(read: u64, write: u64) -> FakeRegistry {
        FakeRegistry::new(vec![FakeTable::new("test_table").provisioned(read, write)])
    }

    fn on_demand_table() -> FakeRegistry {
        FakeRegistry::new(vec![FakeTable::new("test_table")])
    }

    fn run(registry: &FakeRegistry, intent: UpdateIntent) -> Result<UpdateOutcome> {
        CapacityUpdatePlanner::new(registry, PlannerConfig::default()).execute(&intent)
    }

    #[test]
    fn switch_provisioned_table_to_on_demand() {
        let registry = provisioned_table(10, 10);

        let outcome = run(&registry, UpdateIntent::on_demand("test_table")).unwrap();
        assert_eq!(outcome, UpdateOutcome::Applied(CapacityUpdate::OnDemand));
        assert_eq!(
            registry.updates(),
            vec![("test_table".to_string(), CapacityUpdate::OnDemand)]
        );
    }

    #[test]
    fn on_demand_table_stays_on_demand() {
        let registry = on_demand_table();

        let outcome = run(&registry, UpdateIntent::on_demand("test_table")).unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert!(registry.updates().is_empty());
    }

    #[test]
    fn unknown_mode_switches_to_on_demand() {
        let registry =
            FakeRegistry::new(vec![FakeTable::new("test_table").billing(BillingMode::Unknown)]);

        let outcome = run(&registry, UpdateIntent::on_demand("test_table")).unwrap();
        assert_eq!(outcome, UpdateOutcome::Applied(CapacityUpdate::OnDemand));
    }

    #[test]
    fn same_capacity_is_a_no_op() {
        let registry = provisioned_table(10, 10);

        let outcome = run(
            &registry,
            UpdateIntent::capacity("test_table", Some(10), Some(10)),
        )
        .unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert!(registry.updates().is_empty());
    }

    #[test]
    fn new_capacity_is_applied() {
        let registry = provisioned_table(10, 10);

        let outcome =
            run(&registry, UpdateIntent::capacity("test_table", Some(5), Some(5))).unwrap();
        let expected = CapacityUpdate::Provisioned {
            capacity: CapacityConfig::new(5, 5),
            switch_mode: false,
        };
        assert_eq!(outcome, UpdateOutcome::Applied(expected));
        assert_eq!(registry.updates(), vec![("test_table".to_string(), expected)]);
    }

    #[test]
    fn omitted_value_falls_back_to_default() {
        let registry = provisioned_table(10, 10);

        let outcome = run(&registry, UpdateIntent::capacity("test_table", Some(20), None)).unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Applied(CapacityUpdate::Provisioned {
                capacity: CapacityConfig::new(20, DEFAULT_WRITE_UNITS),
                switch_mode: false,
            })
        );
    }

    #[test]
    fn omitted_value_matching_default_is_a_no_op() {
        let registry = provisioned_table(7, 5);

        let outcome = run(&registry, UpdateIntent::capacity("test_table", Some(7), None)).unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);
    }

    #[test]
    fn capacity_on_on_demand_table_without_switch_is_rejected() {
        let registry = on_demand_table();

        let err = run(&registry, UpdateIntent::capacity("test_table", Some(10), Some(10)))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("does not support modification of rcu or wcu"));
        assert!(registry.updates().is_empty());
    }

    #[test]
    fn explicit_switch_applies_defaults() {
        let registry = on_demand_table();

        let outcome = run(&registry, UpdateIntent::provisioned("test_table", None, None)).unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Applied(CapacityUpdate::Provisioned {
                capacity: CapacityConfig::new(DEFAULT_READ_UNITS, DEFAULT_WRITE_UNITS),
                switch_mode: true,
            })
        );
    }

    #[test]
    fn explicit_switch_with_values() {
        let registry = on_demand_table();

        let outcome =
            run(&registry, UpdateIntent::provisioned("test_table", Some(50), Some(25))).unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Applied(CapacityUpdate::Provisioned {
                capacity: CapacityConfig::new(50, 25),
                switch_mode: true,
            })
        );
    }

    #[test]
    fn explicit_switch_on_already_provisioned_table_with_defaults_is_a_no_op() {
        let registry = provisioned_table(DEFAULT_READ_UNITS, DEFAULT_WRITE_UNITS);

        let outcome = run(&registry, UpdateIntent::provisioned("test_table", None, None)).unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);
    }

    #[test]
    fn custom_defaults() {
        let registry = on_demand_table();
        let config = PlannerConfig {
            default_read_units: 1,
            default_write_units: 2,
        };

        let outcome = CapacityUpdatePlanner::new(&registry, config)
            .execute(&UpdateIntent::provisioned("test_table", None, None))
            .unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Applied(CapacityUpdate::Provisioned {
                capacity: CapacityConfig::new(1, 2),
                switch_mode: true,
            })
        );
    }

    #[test]
    fn contradictory_intents_never_reach_registry() {
        let registry = provisioned_table(10, 10);

        let both_switches = UpdateIntent {
            target: "test_table".to_string(),
            switch_to_on_demand: true,
            switch_to_provisioned: true,
            ..Default::default()
        };
        let on_demand_with_capacity = UpdateIntent {
            read_units: Some(10),
            ..UpdateIntent::on_demand("test_table")
        };
        let nothing = UpdateIntent::capacity("test_table", None, None);
        let no_target = UpdateIntent::on_demand("");

        for intent in [both_switches, on_demand_with_capacity, nothing, no_target] {
            let err = run(&registry, intent).unwrap_err();
            assert!(err.is_validation(), "{err}");
        }
        assert!(registry.calls().is_empty());
    }

    #[test]
    fn describe_failure_aborts() {
        let registry = provisioned_table(10, 10).failing_describe("test_table");

        let err = run(&registry, UpdateIntent::on_demand("test_table")).unwrap_err();
        assert!(matches!(err, ManagerError::Registry(RegistryError::AccessDenied(_))));
        assert!(registry.updates().is_empty());
    }

    #[test]
    fn missing_table_aborts() {
        let registry = FakeRegistry::new(Vec::new());

        let err = run(&registry, UpdateIntent::on_demand("ghost")).unwrap_err();
        assert!(matches!(err, ManagerError::Registry(RegistryError::NotFound(_))));
    }

    #[test]
    fn update_failure_is_surfaced_once() {
        let registry = provisioned_table(10, 10)
            .failing_update(RegistryError::InUse("test_table".to_string()));

        let err =
            run(&registry, UpdateIntent::capacity("test_table", Some(1), Some(1))).unwrap_err();
        assert!(matches!(err, ManagerError::Registry(RegistryError::InUse(_))));
        let update_calls = registry
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Update(..)))
            .count();
        assert_eq!(update_calls, 1);
    }
}

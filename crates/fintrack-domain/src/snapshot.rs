use serde::{Deserialize, Serialize};

use crate::{budget::Budget, error::ValidationError, settings::Settings, transaction::Transaction};

/// Schema version written into exported snapshots.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Complete exportable state: transactions, budgets and settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "Snapshot::default_schema_version")]
    pub schema_version: u32,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub settings: Settings,
}

impl Snapshot {
    pub fn new(transactions: Vec<Transaction>, budgets: Vec<Budget>, settings: Settings) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            transactions,
            budgets,
            settings,
        }
    }

    fn default_schema_version() -> u32 {
        SNAPSHOT_SCHEMA_VERSION
    }

    /// Validates every record, reporting the first violation with its position.
    pub fn validate(&self) -> Result<(), (String, ValidationError)> {
        for (index, txn) in self.transactions.iter().enumerate() {
            txn.validate()
                .map_err(|err| (format!("transactions[{index}]"), err))?;
        }
        for (index, budget) in self.budgets.iter().enumerate() {
            budget
                .validate()
                .map_err(|err| (format!("budgets[{index}]"), err))?;
        }
        Ok(())
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Settings::default())
    }
}

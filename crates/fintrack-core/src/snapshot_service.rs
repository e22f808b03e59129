//! Export and import of the complete tracked state.

use std::collections::HashSet;

use tracing::info;
use uuid::Uuid;

use fintrack_domain::{Budget, Settings, Snapshot, Transaction, SNAPSHOT_SCHEMA_VERSION};

use crate::{budget_service::BudgetStore, transaction_service::TransactionStore, CoreError};

pub struct SnapshotService;

impl SnapshotService {
    /// Serialises the state as pretty-printed JSON.
    pub fn export(
        transactions: &[Transaction],
        budgets: &[Budget],
        settings: &Settings,
    ) -> Result<String, CoreError> {
        let snapshot = Snapshot::new(transactions.to_vec(), budgets.to_vec(), settings.clone());
        let json = serde_json::to_string_pretty(&snapshot)?;
        info!(
            transactions = transactions.len(),
            budgets = budgets.len(),
            "exported snapshot"
        );
        Ok(json)
    }

    /// Parses and fully validates a snapshot document.
    pub fn parse(json: &str) -> Result<Snapshot, CoreError> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|err| CoreError::InvalidFormat(format!("malformed snapshot: {err}")))?;
        if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(CoreError::InvalidFormat(format!(
                "unsupported schema version {} (expected {})",
                snapshot.schema_version, SNAPSHOT_SCHEMA_VERSION
            )));
        }
        snapshot
            .validate()
            .map_err(|(location, err)| CoreError::InvalidFormat(format!("{location}: {err}")))?;
        Ok(snapshot)
    }

    /// Replaces both collections with the snapshot's content.
    ///
    /// Nothing is mutated unless the whole document parses and validates.
    /// Returns the snapshot's settings for the caller to persist.
    pub fn import(
        json: &str,
        transactions: &mut TransactionStore,
        budgets: &mut BudgetStore,
    ) -> Result<Settings, CoreError> {
        let snapshot = Self::parse(json)?;
        if let Some(id) = first_duplicate(snapshot.transactions.iter().map(|txn| txn.id)) {
            return Err(CoreError::InvalidFormat(format!(
                "transaction id {id} appears more than once"
            )));
        }
        if let Some(id) = first_duplicate(snapshot.budgets.iter().map(|budget| budget.id)) {
            return Err(CoreError::InvalidFormat(format!(
                "budget id {id} appears more than once"
            )));
        }
        if let Some((a, b)) = first_overlap(&snapshot.budgets) {
            return Err(CoreError::InvalidFormat(format!(
                "budgets {a} and {b} overlap for the same category"
            )));
        }
        info!(
            transactions = snapshot.transactions.len(),
            budgets = snapshot.budgets.len(),
            "importing snapshot"
        );
        transactions.replace_all(snapshot.transactions);
        budgets.replace_all(snapshot.budgets);
        Ok(snapshot.settings)
    }
}

fn first_duplicate(ids: impl Iterator<Item = Uuid>) -> Option<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

fn first_overlap(budgets: &[Budget]) -> Option<(String, String)> {
    budgets.iter().enumerate().find_map(|(index, budget)| {
        budgets[index + 1..]
            .iter()
            .find(|other| budget.overlaps(other))
            .map(|other| (budget.id.to_string(), other.id.to_string()))
    })
}

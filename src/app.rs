//! Application façade wiring configuration, persistence and reports together.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use fintrack_config::{AppConfig, StorageKind};
use fintrack_core::{
    storage::{clear_all, load_settings, save_settings},
    BudgetOverview, BudgetService, BudgetStatus, BudgetStore, CashFlowBucket, CashFlowService,
    CategorySpending, CategoryTrend, Clock, CoreError, KeyValueStore, MemoryStore, MonthlyChange,
    MonthlyStats, SnapshotService, SummaryService, SystemClock, TransactionStore,
};
use fintrack_domain::{Budget, BudgetPatch, Settings, TimeFrame, Transaction, TransactionPatch};
use fintrack_storage_json::{BackupInfo, JsonFileStore};

use crate::errors::{FinError, Result};

/// Owns one session's stores, settings and clock over a single backend.
pub struct FinanceApp {
    config: AppConfig,
    backend: Arc<dyn KeyValueStore>,
    files: Option<Arc<JsonFileStore>>,
    clock: Arc<dyn Clock>,
    transactions: TransactionStore,
    budgets: BudgetStore,
    settings: Settings,
}

impl FinanceApp {
    pub fn open(config: AppConfig) -> Result<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Opens the configured backend and loads every collection from it.
    pub fn open_with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let (backend, files): (Arc<dyn KeyValueStore>, Option<Arc<JsonFileStore>>) =
            match config.storage {
                StorageKind::Memory => (Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>, None),
                StorageKind::Json => {
                    let store = Arc::new(JsonFileStore::with_retention(
                        config.resolve_data_dir(),
                        config.backup_retention,
                    )?);
                    (store.clone() as Arc<dyn KeyValueStore>, Some(store))
                }
            };
        info!(backend = %backend.describe(), "opening finance data");

        let transactions = TransactionStore::load(backend.clone())?;
        let budgets = BudgetStore::load(backend.clone(), clock.clone())?;
        let settings = load_settings(backend.as_ref())?;
        Ok(Self {
            config,
            backend,
            files,
            clock,
            transactions,
            budgets,
            settings,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn transactions(&self) -> &TransactionStore {
        &self.transactions
    }

    pub fn budgets(&self) -> &BudgetStore {
        &self.budgets
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn backend_name(&self) -> String {
        self.backend.describe()
    }

    // Transactions

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<Uuid> {
        Ok(self.transactions.add(transaction)?)
    }

    pub fn update_transaction(&mut self, id: Uuid, patch: TransactionPatch) -> Result<Transaction> {
        Ok(self.transactions.update(id, patch)?.clone())
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction> {
        Ok(self.transactions.remove(id)?)
    }

    pub fn recent_transactions(&self) -> Vec<&Transaction> {
        self.transactions.recent(self.config.recent_limit)
    }

    // Budgets

    pub fn add_budget(&mut self, budget: Budget) -> Result<Uuid> {
        Ok(self.budgets.add(budget)?)
    }

    pub fn update_budget(&mut self, id: Uuid, patch: BudgetPatch) -> Result<Budget> {
        Ok(self.budgets.update(id, patch)?.clone())
    }

    pub fn remove_budget(&mut self, id: Uuid) -> Result<Budget> {
        Ok(self.budgets.remove(id)?)
    }

    pub fn budget_status(&self, id: Uuid) -> Result<BudgetStatus> {
        let budget = self
            .budgets
            .get(id)
            .ok_or_else(|| CoreError::budget_not_found(id))?;
        Ok(BudgetService::status(budget, self.transactions.as_slice()))
    }

    pub fn budget_overview(&self) -> BudgetOverview {
        BudgetService::overview(self.budgets.all(), self.transactions.as_slice(), self.today())
    }

    // Reports

    pub fn total_balance(&self) -> f64 {
        SummaryService::total_balance(self.transactions.as_slice())
    }

    pub fn monthly_change(&self) -> MonthlyChange {
        SummaryService::monthly_change(self.transactions.as_slice(), self.today())
    }

    pub fn category_spending(&self) -> Vec<CategorySpending> {
        SummaryService::category_spending(self.transactions.as_slice())
    }

    pub fn monthly_stats(&self) -> MonthlyStats {
        SummaryService::monthly_stats(self.transactions.as_slice(), self.today())
    }

    /// Cash-flow series for `frame`, or the configured default frame.
    pub fn cash_flow(&self, frame: Option<TimeFrame>) -> Vec<CashFlowBucket> {
        let frame = frame.unwrap_or(self.config.default_time_frame);
        CashFlowService::series(self.transactions.as_slice(), frame, self.now())
    }

    pub fn monthly_overview(&self) -> Vec<CashFlowBucket> {
        CashFlowService::monthly_overview(self.transactions.as_slice(), self.now())
    }

    pub fn category_trend(&self, months: usize) -> Vec<CategoryTrend> {
        CashFlowService::category_trend(self.transactions.as_slice(), self.now(), months)
    }

    // Snapshots and settings

    pub fn export_snapshot(&self) -> Result<String> {
        Ok(SnapshotService::export(
            self.transactions.as_slice(),
            self.budgets.all(),
            &self.settings,
        )?)
    }

    /// Replaces all data with the snapshot; nothing changes when it is invalid.
    pub fn import_snapshot(&mut self, json: &str) -> Result<()> {
        let settings = SnapshotService::import(json, &mut self.transactions, &mut self.budgets)?;
        self.update_settings(settings)
    }

    /// Applies a decrypted remote-sync payload shaped like an export.
    pub fn apply_sync_payload(&mut self, json: &str) -> Result<()> {
        info!("applying sync payload");
        self.import_snapshot(json)
    }

    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        save_settings(self.backend.as_ref(), &settings)?;
        self.settings = settings;
        Ok(())
    }

    /// Sets one setting by key, rejecting unknown keys or values.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.settings.clone();
        if !updated.set(key, value) {
            return Err(FinError::InvalidInput(format!(
                "unknown setting or value: {key} = {value}"
            )));
        }
        self.update_settings(updated)
    }

    /// Removes every stored collection and returns to defaults.
    pub fn reset(&mut self) -> Result<()> {
        clear_all(self.backend.as_ref())?;
        self.reload()?;
        info!("all data reset");
        Ok(())
    }

    /// Re-reads every collection from the backend.
    pub fn reload(&mut self) -> Result<()> {
        self.transactions.reload()?;
        self.budgets.reload()?;
        self.settings = load_settings(self.backend.as_ref())?;
        Ok(())
    }

    /// Writes both collections and reports persistence errors.
    pub fn flush(&self) -> Result<()> {
        self.transactions.flush()?;
        self.budgets.flush()?;
        save_settings(self.backend.as_ref(), &self.settings)?;
        Ok(())
    }

    // Backups

    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo> {
        self.flush()?;
        Ok(self.file_store()?.backup(note)?)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        Ok(self.file_store()?.list_backups()?)
    }

    pub fn restore_backup(&mut self, name: &str) -> Result<BackupInfo> {
        let info = self.file_store()?.restore(name)?;
        self.reload()?;
        Ok(info)
    }

    fn file_store(&self) -> Result<&JsonFileStore> {
        self.files.as_deref().ok_or(FinError::BackupsUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fintrack_core::FixedClock;
    use fintrack_domain::Category;

    fn app() -> FinanceApp {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap());
        FinanceApp::open_with_clock(AppConfig::ephemeral(), Arc::new(clock)).unwrap()
    }

    #[test]
    fn memory_sessions_reject_backups() {
        let app = app();
        assert!(matches!(app.backup(None), Err(FinError::BackupsUnavailable)));
    }

    #[test]
    fn set_setting_validates_keys() {
        let mut app = app();
        app.set_setting("currency", "€").unwrap();
        assert_eq!(app.settings().currency, "€");
        assert!(matches!(
            app.set_setting("colour", "blue"),
            Err(FinError::InvalidInput(_))
        ));
    }

    #[test]
    fn reset_clears_everything() {
        let mut app = app();
        app.add_transaction(Transaction::income(
            10.0,
            Category::Income,
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        ))
        .unwrap();
        app.set_setting("dark_mode", "on").unwrap();
        app.reset().unwrap();
        assert!(app.transactions().is_empty());
        assert_eq!(app.settings(), &Settings::default());
    }

    #[test]
    fn budget_status_reports_unknown_ids() {
        let app = app();
        let err = app.budget_status(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, FinError::Core(ref core) if core.is_not_found()));
    }
}

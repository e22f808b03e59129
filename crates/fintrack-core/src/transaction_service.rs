//! Persistent collection of income and expense transactions.

use std::{cmp::Ordering, sync::Arc};

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use fintrack_domain::{same_month, Category, Transaction, TransactionPatch};

use crate::{
    storage::{load_json, save_json, KeyValueStore, TRANSACTIONS_KEY},
    CoreError,
};

/// Owns the in-memory transaction list and mirrors it to a [`KeyValueStore`].
///
/// Mutations update the in-memory view first. Persistence failures are logged
/// and never roll the mutation back; call [`TransactionStore::flush`] when the
/// caller needs an acknowledged write.
pub struct TransactionStore {
    backend: Arc<dyn KeyValueStore>,
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    /// Loads the stored list, starting empty when nothing was saved yet.
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Result<Self, CoreError> {
        let transactions: Vec<Transaction> =
            load_json(backend.as_ref(), TRANSACTIONS_KEY)?.unwrap_or_default();
        debug!(count = transactions.len(), "loaded transactions");
        Ok(Self {
            backend,
            transactions,
        })
    }

    /// Validates and inserts a transaction, returning its identifier.
    pub fn add(&mut self, transaction: Transaction) -> Result<Uuid, CoreError> {
        if self.get(transaction.id).is_some() {
            return Err(CoreError::duplicate_transaction(transaction.id));
        }
        transaction.validate()?;
        let id = transaction.id;
        self.transactions.push(transaction);
        debug!(%id, "added transaction");
        self.persist();
        Ok(id)
    }

    /// Applies `patch` to the transaction identified by `id`.
    ///
    /// The patched record is validated before it replaces the stored one.
    pub fn update(&mut self, id: Uuid, patch: TransactionPatch) -> Result<&Transaction, CoreError> {
        let index = self.position(id)?;
        let mut candidate = self.transactions[index].clone();
        candidate.apply(patch);
        candidate.validate()?;
        self.transactions[index] = candidate;
        debug!(%id, "updated transaction");
        self.persist();
        Ok(&self.transactions[index])
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(&mut self, id: Uuid) -> Result<Transaction, CoreError> {
        let index = self.position(id)?;
        let removed = self.transactions.remove(index);
        debug!(%id, "removed transaction");
        self.persist();
        Ok(removed)
    }

    pub fn get(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// Returns every transaction, newest first.
    pub fn list(&self) -> Vec<&Transaction> {
        let mut sorted: Vec<&Transaction> = self.transactions.iter().collect();
        sorted.sort_by(|a, b| newest_first(a, b));
        sorted
    }

    /// Returns at most `limit` of the newest transactions.
    pub fn recent(&self, limit: usize) -> Vec<&Transaction> {
        let mut sorted = self.list();
        sorted.truncate(limit);
        sorted
    }

    /// Groups transactions by calendar day, newest day first.
    pub fn group_by_day(&self) -> Vec<(NaiveDate, Vec<&Transaction>)> {
        let mut groups: Vec<(NaiveDate, Vec<&Transaction>)> = Vec::new();
        for txn in self.list() {
            match groups.last_mut() {
                Some((day, entries)) if *day == txn.day() => entries.push(txn),
                _ => groups.push((txn.day(), vec![txn])),
            }
        }
        groups
    }

    /// Transactions in `category` that fall in the calendar month containing `month`.
    pub fn by_category_in_month(&self, category: Category, month: NaiveDate) -> Vec<&Transaction> {
        self.list()
            .into_iter()
            .filter(|txn| txn.category == category && same_month(txn.day(), month))
            .collect()
    }

    /// Raw, unordered view used by the aggregation services.
    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Replaces the whole collection. Callers validate the incoming list first.
    pub fn replace_all(&mut self, transactions: Vec<Transaction>) {
        debug!(count = transactions.len(), "replacing transactions");
        self.transactions = transactions;
        self.persist();
    }

    /// Re-reads the backend, discarding the in-memory view.
    pub fn reload(&mut self) -> Result<(), CoreError> {
        self.transactions = load_json(self.backend.as_ref(), TRANSACTIONS_KEY)?.unwrap_or_default();
        Ok(())
    }

    /// Writes the current list and reports any persistence error.
    pub fn flush(&self) -> Result<(), CoreError> {
        save_json(self.backend.as_ref(), TRANSACTIONS_KEY, &self.transactions)
    }

    fn persist(&self) {
        if let Err(err) = self.flush() {
            warn!(error = %err, backend = %self.backend.describe(), "failed to persist transactions");
        }
    }

    fn position(&self, id: Uuid) -> Result<usize, CoreError> {
        self.transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or_else(|| CoreError::transaction_not_found(id))
    }
}

fn newest_first(a: &Transaction, b: &Transaction) -> Ordering {
    b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn store() -> (Arc<MemoryStore>, TransactionStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = TransactionStore::load(backend.clone()).expect("load empty store");
        (backend, store)
    }

    #[test]
    fn add_persists_and_lists_newest_first() {
        let (backend, mut store) = store();
        store
            .add(Transaction::expense(10.0, Category::Food, at(2024, 1, 5, 9)))
            .unwrap();
        store
            .add(Transaction::income(2000.0, Category::Income, at(2024, 1, 1, 9)))
            .unwrap();
        store
            .add(Transaction::expense(4.5, Category::Transport, at(2024, 1, 5, 18)))
            .unwrap();

        let days: Vec<_> = store.list().iter().map(|txn| txn.date).collect();
        assert_eq!(days, vec![at(2024, 1, 5, 18), at(2024, 1, 5, 9), at(2024, 1, 1, 9)]);

        let reopened = TransactionStore::load(backend).unwrap();
        assert_eq!(reopened.len(), 3);
    }

    #[test]
    fn add_rejects_zero_amount() {
        let (_, mut store) = store();
        let err = store
            .add(Transaction::expense(0.0, Category::Food, at(2024, 1, 5, 9)))
            .expect_err("zero amount must fail");
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_an_id_already_stored() {
        let (_, mut store) = store();
        let txn = Transaction::expense(12.0, Category::Food, at(2024, 1, 5, 9));
        let id = store.add(txn.clone()).unwrap();
        let err = store.add(txn).expect_err("duplicate id must fail");
        assert!(matches!(err, CoreError::DuplicateId { id: dup, .. } if dup == id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_fails_for_missing_transaction() {
        let (_, mut store) = store();
        let err = store
            .update(Uuid::new_v4(), TransactionPatch::default())
            .expect_err("update must fail for unknown id");
        assert!(err.is_not_found(), "unexpected error: {err:?}");
    }

    #[test]
    fn invalid_update_leaves_record_untouched() {
        let (_, mut store) = store();
        let id = store
            .add(Transaction::expense(10.0, Category::Food, at(2024, 1, 5, 9)))
            .unwrap();
        let patch = TransactionPatch {
            amount: Some(0.0),
            ..TransactionPatch::default()
        };
        assert!(store.update(id, patch).is_err());
        assert_eq!(store.get(id).map(|txn| txn.amount), Some(10.0));
    }

    #[test]
    fn remove_returns_deleted_transaction() {
        let (_, mut store) = store();
        let id = store
            .add(Transaction::expense(10.0, Category::Food, at(2024, 1, 5, 9)))
            .unwrap();
        let removed = store.remove(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(store.get(id).is_none());
        assert!(store.remove(id).unwrap_err().is_not_found());
    }

    #[test]
    fn group_by_day_and_category_month_filters() {
        let (_, mut store) = store();
        store
            .add(Transaction::expense(10.0, Category::Food, at(2024, 1, 5, 9)))
            .unwrap();
        store
            .add(Transaction::expense(12.0, Category::Food, at(2024, 1, 5, 20)))
            .unwrap();
        store
            .add(Transaction::expense(30.0, Category::Food, at(2024, 2, 2, 8)))
            .unwrap();

        let groups = store.group_by_day();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
        assert_eq!(groups[1].1.len(), 2);
        assert_eq!(groups[1].1[0].amount, 12.0);

        let january = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(store.by_category_in_month(Category::Food, january).len(), 2);
        assert!(store
            .by_category_in_month(Category::Travel, january)
            .is_empty());
        assert_eq!(store.recent(1)[0].amount, 30.0);
    }

    #[test]
    fn reload_picks_up_external_writes() {
        let (backend, mut store) = store();
        let mut other = TransactionStore::load(backend).unwrap();
        other
            .add(Transaction::income(5.0, Category::Income, at(2024, 1, 1, 0)))
            .unwrap();
        assert!(store.is_empty());
        store.reload().unwrap();
        assert_eq!(store.len(), 1);
    }
}

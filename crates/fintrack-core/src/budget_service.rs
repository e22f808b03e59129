//! Budget persistence plus per-budget and period-wide spending status.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use fintrack_domain::{days_in_month, Budget, BudgetPatch, Transaction, ValidationError};

use crate::{
    storage::{load_json, save_json, KeyValueStore, BUDGETS_KEY},
    time::Clock,
    CoreError,
};

/// Owns the budget list and mirrors it to a [`KeyValueStore`].
///
/// Budgets of the same category may not cover intersecting date ranges.
pub struct BudgetStore {
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    budgets: Vec<Budget>,
}

impl BudgetStore {
    pub fn load(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Result<Self, CoreError> {
        let budgets: Vec<Budget> = load_json(backend.as_ref(), BUDGETS_KEY)?.unwrap_or_default();
        debug!(count = budgets.len(), "loaded budgets");
        Ok(Self {
            backend,
            clock,
            budgets,
        })
    }

    /// Validates and inserts a budget, returning its identifier.
    ///
    /// An id that is already stored is rejected.
    pub fn add(&mut self, budget: Budget) -> Result<Uuid, CoreError> {
        if self.get(budget.id).is_some() {
            return Err(CoreError::duplicate_budget(budget.id));
        }
        budget.validate()?;
        self.ensure_no_overlap(&budget)?;
        let id = budget.id;
        self.budgets.push(budget);
        debug!(%id, "added budget");
        self.persist();
        Ok(id)
    }

    /// Applies `patch` and re-validates the result, overlap rule included.
    pub fn update(&mut self, id: Uuid, patch: BudgetPatch) -> Result<&Budget, CoreError> {
        let index = self.position(id)?;
        let mut candidate = self.budgets[index].clone();
        candidate.apply(patch);
        candidate.validate()?;
        self.ensure_no_overlap(&candidate)?;
        self.budgets[index] = candidate;
        debug!(%id, "updated budget");
        self.persist();
        Ok(&self.budgets[index])
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Budget, CoreError> {
        let index = self.position(id)?;
        let removed = self.budgets.remove(index);
        debug!(%id, "removed budget");
        self.persist();
        Ok(removed)
    }

    pub fn get(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    /// Budgets active on `as_of`, or on today's date when `None`.
    pub fn list(&self, as_of: Option<NaiveDate>) -> Vec<&Budget> {
        let as_of = as_of.unwrap_or_else(|| self.clock.today());
        let mut active: Vec<&Budget> = self
            .budgets
            .iter()
            .filter(|budget| budget.is_active(as_of))
            .collect();
        active.sort_by(|a, b| a.category.cmp(&b.category));
        active
    }

    pub fn all(&self) -> &[Budget] {
        &self.budgets
    }

    /// Replaces the whole collection. Callers validate the incoming list first.
    pub fn replace_all(&mut self, budgets: Vec<Budget>) {
        debug!(count = budgets.len(), "replacing budgets");
        self.budgets = budgets;
        self.persist();
    }

    pub fn reload(&mut self) -> Result<(), CoreError> {
        self.budgets = load_json(self.backend.as_ref(), BUDGETS_KEY)?.unwrap_or_default();
        Ok(())
    }

    pub fn flush(&self) -> Result<(), CoreError> {
        save_json(self.backend.as_ref(), BUDGETS_KEY, &self.budgets)
    }

    fn persist(&self) {
        if let Err(err) = self.flush() {
            warn!(error = %err, backend = %self.backend.describe(), "failed to persist budgets");
        }
    }

    fn ensure_no_overlap(&self, candidate: &Budget) -> Result<(), ValidationError> {
        match self
            .budgets
            .iter()
            .find(|existing| existing.id != candidate.id && existing.overlaps(candidate))
        {
            Some(existing) => Err(ValidationError::OverlappingBudget {
                category: candidate.category.id().to_string(),
                existing: existing.id.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn position(&self, id: Uuid) -> Result<usize, CoreError> {
        self.budgets
            .iter()
            .position(|budget| budget.id == id)
            .ok_or_else(|| CoreError::budget_not_found(id))
    }
}

/// Spending against a single budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub spent: f64,
    pub remaining: f64,
    /// Whole percent of the cap consumed, capped at 100.
    pub percentage: f64,
}

/// Aggregate picture over every budget active on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetOverview {
    pub total_budget: f64,
    pub remaining_budget: f64,
    pub remaining_percentage: f64,
    pub days_remaining: u32,
    pub daily_allowance: f64,
}

/// Pure budget calculations over transaction slices.
pub struct BudgetService;

impl BudgetService {
    /// Computes spent/remaining/percentage for `budget`.
    ///
    /// Only expenses in the budget's category and inclusive date range count.
    pub fn status(budget: &Budget, transactions: &[Transaction]) -> BudgetStatus {
        let spent: f64 = transactions
            .iter()
            .filter(|txn| {
                txn.is_expense() && txn.category == budget.category && budget.covers(txn.day())
            })
            .map(Transaction::magnitude)
            .sum();
        let remaining = (budget.amount - spent).max(0.0);
        let percentage = if budget.amount > 0.0 {
            (spent / budget.amount * 100.0).round().min(100.0)
        } else {
            0.0
        };
        BudgetStatus {
            spent,
            remaining,
            percentage,
        }
    }

    /// Totals over the budgets active on `today`.
    pub fn overview(budgets: &[Budget], transactions: &[Transaction], today: NaiveDate) -> BudgetOverview {
        let active: Vec<&Budget> = budgets.iter().filter(|b| b.is_active(today)).collect();
        let total_budget: f64 = active.iter().map(|b| b.amount).sum();
        let remaining_budget: f64 = active
            .iter()
            .map(|b| Self::status(b, transactions).remaining)
            .sum();
        let remaining_percentage = if total_budget > 0.0 {
            (remaining_budget / total_budget * 100.0).round()
        } else {
            0.0
        };
        let days_remaining = days_in_month(today.year(), today.month()) - today.day();
        let daily_allowance = remaining_budget / f64::from(days_remaining.max(1));
        BudgetOverview {
            total_budget,
            remaining_budget,
            remaining_percentage,
            days_remaining,
            daily_allowance,
        }
    }
}

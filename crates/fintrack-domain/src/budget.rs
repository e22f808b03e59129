//! Category spending caps over bounded date ranges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    category::Category,
    common::{month_start, shift_month},
    error::{ensure_positive, ValidationError},
};

/// A spending cap for one category over an inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub category: Category,
    pub amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Budget {
    pub fn new(category: Category, amount: f64, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            amount,
            start_date,
            end_date,
        }
    }

    /// Budget spanning the whole calendar month that contains `date`.
    pub fn for_month(category: Category, amount: f64, date: NaiveDate) -> Self {
        let start = month_start(date);
        let end = shift_month(start, 1).pred_opt().unwrap_or(start);
        Self::new(category, amount, start, end)
    }

    /// Returns `true` when `date` lies inside the inclusive range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// A budget is active when `as_of` lies within its range.
    pub fn is_active(&self, as_of: NaiveDate) -> bool {
        self.covers(as_of)
    }

    /// Returns `true` when both budgets target the same category over intersecting ranges.
    pub fn overlaps(&self, other: &Budget) -> bool {
        self.category == other.category
            && self.start_date <= other.end_date
            && other.start_date <= self.end_date
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("amount", self.amount)?;
        if self.start_date > self.end_date {
            return Err(ValidationError::InvertedRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    pub fn apply(&mut self, patch: BudgetPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(start) = patch.start_date {
            self.start_date = start;
        }
        if let Some(end) = patch.end_date {
            self.end_date = end;
        }
    }
}

/// Partial update for a [`Budget`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetPatch {
    pub category: Option<Category>,
    pub amount: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let budget = Budget::new(Category::Food, 100.0, date(2024, 1, 1), date(2024, 1, 31));
        assert!(budget.is_active(date(2024, 1, 1)));
        assert!(budget.is_active(date(2024, 1, 31)));
        assert!(!budget.is_active(date(2024, 2, 1)));
        assert!(!budget.is_active(date(2023, 12, 31)));
    }

    #[test]
    fn for_month_spans_calendar_month() {
        let budget = Budget::for_month(Category::Food, 100.0, date(2024, 2, 17));
        assert_eq!(budget.start_date, date(2024, 2, 1));
        assert_eq!(budget.end_date, date(2024, 2, 29));
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let budget = Budget::new(Category::Food, 100.0, date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(
            budget.validate(),
            Err(ValidationError::InvertedRange { .. })
        ));
    }

    #[test]
    fn overlap_requires_same_category() {
        let january = Budget::for_month(Category::Food, 100.0, date(2024, 1, 1));
        let mid = Budget::new(Category::Food, 50.0, date(2024, 1, 20), date(2024, 2, 10));
        let other = Budget::new(Category::Travel, 50.0, date(2024, 1, 20), date(2024, 2, 10));
        let february = Budget::for_month(Category::Food, 100.0, date(2024, 2, 1));
        assert!(january.overlaps(&mid));
        assert!(!january.overlaps(&other));
        assert!(!january.overlaps(&february));
    }
}

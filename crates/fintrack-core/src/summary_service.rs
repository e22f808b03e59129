//! Balance, month-over-month and category roll-ups over transaction slices.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use fintrack_domain::{month_start, same_month, shift_month, Category, Transaction};

/// Signed balances of the current and preceding calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyChange {
    pub current: f64,
    pub previous: f64,
    /// Relative change against `|previous|`; zero when the previous month nets to zero.
    pub change_percent: f64,
}

/// Expense total for a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category: Category,
    pub amount: f64,
    pub count: usize,
    pub percentage: f64,
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MonthlyStats {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub savings: f64,
}

/// Stateless aggregation helpers; every function is total over its input.
pub struct SummaryService;

impl SummaryService {
    /// Sum of signed amounts.
    pub fn total_balance(transactions: &[Transaction]) -> f64 {
        transactions.iter().map(Transaction::signed_amount).sum()
    }

    /// Signed balance of the calendar month containing `month`.
    pub fn month_balance(transactions: &[Transaction], month: NaiveDate) -> f64 {
        transactions
            .iter()
            .filter(|txn| same_month(txn.day(), month))
            .map(Transaction::signed_amount)
            .sum()
    }

    pub fn monthly_change(transactions: &[Transaction], today: NaiveDate) -> MonthlyChange {
        let current = Self::month_balance(transactions, today);
        let previous = Self::month_balance(transactions, shift_month(month_start(today), -1));
        let change_percent = if previous == 0.0 {
            0.0
        } else {
            (current - previous) / previous.abs() * 100.0
        };
        MonthlyChange {
            current,
            previous,
            change_percent,
        }
    }

    /// Expenses grouped by category, largest first.
    pub fn category_spending(transactions: &[Transaction]) -> Vec<CategorySpending> {
        let mut totals: BTreeMap<Category, (f64, usize)> = BTreeMap::new();
        for txn in transactions.iter().filter(|txn| txn.is_expense()) {
            let entry = totals.entry(txn.category).or_insert((0.0, 0));
            entry.0 += txn.magnitude();
            entry.1 += 1;
        }
        let total: f64 = totals.values().map(|(amount, _)| amount).sum();

        let mut spending: Vec<CategorySpending> = totals
            .into_iter()
            .map(|(category, (amount, count))| CategorySpending {
                category,
                amount,
                count,
                percentage: if total > 0.0 { amount / total * 100.0 } else { 0.0 },
            })
            .collect();
        spending.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.id().cmp(b.category.id()))
        });
        spending
    }

    /// Income, expenses, net and savings for the month containing `today`.
    pub fn monthly_stats(transactions: &[Transaction], today: NaiveDate) -> MonthlyStats {
        let mut stats = MonthlyStats::default();
        for txn in transactions.iter().filter(|txn| same_month(txn.day(), today)) {
            if txn.is_income() {
                stats.income += txn.magnitude();
            } else {
                stats.expenses += txn.magnitude();
                if txn.category == Category::Savings {
                    stats.savings += txn.magnitude();
                }
            }
        }
        stats.net = stats.income - stats.expenses;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_input_yields_zeroes() {
        assert_eq!(SummaryService::total_balance(&[]), 0.0);
        assert!(SummaryService::category_spending(&[]).is_empty());
        let change = SummaryService::monthly_change(&[], date(2024, 3, 1));
        assert_eq!(change.change_percent, 0.0);
        assert_eq!(SummaryService::monthly_stats(&[], date(2024, 3, 1)), MonthlyStats::default());
    }

    #[test]
    fn balance_and_spending_for_mixed_month() {
        let txns = vec![
            Transaction::expense(50.0, Category::Food, at(2024, 1, 5)),
            Transaction::income(2000.0, Category::Other, at(2024, 1, 1)),
        ];
        assert_eq!(SummaryService::total_balance(&txns), 1950.0);
        let spending = SummaryService::category_spending(&txns);
        assert_eq!(spending.len(), 1);
        assert_eq!(spending[0].category, Category::Food);
        assert_eq!(spending[0].amount, 50.0);
        assert_eq!(spending[0].percentage, 100.0);
    }

    #[test]
    fn change_is_zero_without_previous_month() {
        let txns = vec![Transaction::income(500.0, Category::Income, at(2024, 2, 10))];
        let change = SummaryService::monthly_change(&txns, date(2024, 2, 20));
        assert_eq!(change.current, 500.0);
        assert_eq!(change.previous, 0.0);
        assert_eq!(change.change_percent, 0.0);
    }

    #[test]
    fn change_uses_absolute_previous_balance() {
        let txns = vec![
            Transaction::expense(200.0, Category::Housing, at(2023, 12, 31)),
            Transaction::income(100.0, Category::Income, at(2024, 1, 2)),
        ];
        let change = SummaryService::monthly_change(&txns, date(2024, 1, 15));
        assert_eq!(change.previous, -200.0);
        assert_eq!(change.change_percent, 150.0);
    }

    #[test]
    fn spending_orders_by_amount_then_category_id() {
        let txns = vec![
            Transaction::expense(30.0, Category::Transport, at(2024, 1, 1)),
            Transaction::expense(30.0, Category::Food, at(2024, 1, 2)),
            Transaction::expense(40.0, Category::Travel, at(2024, 1, 3)),
            Transaction::expense(10.0, Category::Travel, at(2024, 1, 4)),
        ];
        let spending = SummaryService::category_spending(&txns);
        let order: Vec<_> = spending.iter().map(|s| s.category).collect();
        assert_eq!(order, vec![Category::Travel, Category::Food, Category::Transport]);
        assert_eq!(spending[0].count, 2);
        assert_eq!(spending[0].percentage, 50.0);
    }

    #[test]
    fn monthly_stats_tracks_savings_category() {
        let txns = vec![
            Transaction::income(1000.0, Category::Income, at(2024, 3, 1)),
            Transaction::expense(200.0, Category::Savings, at(2024, 3, 2)),
            Transaction::expense(100.0, Category::Food, at(2024, 3, 3)),
            Transaction::expense(999.0, Category::Food, at(2024, 2, 28)),
        ];
        let stats = SummaryService::monthly_stats(&txns, date(2024, 3, 15));
        assert_eq!(stats.income, 1000.0);
        assert_eq!(stats.expenses, 300.0);
        assert_eq!(stats.net, 700.0);
        assert_eq!(stats.savings, 200.0);
    }
}

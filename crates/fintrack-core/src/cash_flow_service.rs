//! Time-bucketed income/expense series for charts and reports.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use fintrack_domain::{
    month_start, shift_month, start_of_day_utc, week_start, Category, TimeFrame, Transaction,
};

/// Months covered by [`CashFlowService::monthly_overview`], the current month included.
pub const OVERVIEW_MONTHS: usize = 7;

/// Longest window accepted by [`CashFlowService::category_trend`].
pub const MAX_TREND_MONTHS: usize = 120;

/// Income and expense magnitudes for a half-open `[start, end)` interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowBucket {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub income: f64,
    pub expense: f64,
}

impl CashFlowBucket {
    fn empty(start: NaiveDate, end: NaiveDate, label_format: &str) -> Self {
        Self {
            label: start.format(label_format).to_string(),
            start: start_of_day_utc(start),
            end: start_of_day_utc(end),
            income: 0.0,
            expense: 0.0,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }

    fn record(&mut self, txn: &Transaction) {
        if txn.is_income() {
            self.income += txn.magnitude();
        } else {
            self.expense += txn.magnitude();
        }
    }
}

/// Monthly expense totals for one category, oldest month first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTrend {
    pub category: Category,
    pub totals: Vec<f64>,
}

impl CategoryTrend {
    pub fn total(&self) -> f64 {
        self.totals.iter().sum()
    }
}

pub struct CashFlowService;

impl CashFlowService {
    /// Dense, oldest-first series ending with the bucket that contains `now`.
    ///
    /// Always returns [`TimeFrame::bucket_count`] buckets, zero-filled where no
    /// transaction falls.
    pub fn series(transactions: &[Transaction], frame: TimeFrame, now: DateTime<Utc>) -> Vec<CashFlowBucket> {
        let mut buckets = Self::buckets(frame, now.date_naive());
        for txn in transactions {
            if let Some(bucket) = buckets.iter_mut().find(|b| b.contains(txn.date)) {
                bucket.record(txn);
            }
        }
        buckets
    }

    /// Seven monthly buckets whose totals accumulate from the oldest month.
    pub fn monthly_overview(transactions: &[Transaction], now: DateTime<Utc>) -> Vec<CashFlowBucket> {
        let mut buckets = month_windows(now.date_naive(), OVERVIEW_MONTHS)
            .into_iter()
            .map(|(start, end)| CashFlowBucket::empty(start, end, "%b"))
            .collect::<Vec<_>>();
        for txn in transactions {
            if let Some(bucket) = buckets.iter_mut().find(|b| b.contains(txn.date)) {
                bucket.record(txn);
            }
        }
        for index in 1..buckets.len() {
            let (income, expense) = (buckets[index - 1].income, buckets[index - 1].expense);
            buckets[index].income += income;
            buckets[index].expense += expense;
        }
        buckets
    }

    /// Per-category expense totals for the trailing `months` calendar months.
    ///
    /// Categories without expenses in the window are omitted; the rest are
    /// ordered by window total, largest first. `months` is clamped to
    /// [`MAX_TREND_MONTHS`].
    pub fn category_trend(transactions: &[Transaction], now: DateTime<Utc>, months: usize) -> Vec<CategoryTrend> {
        let months = months.min(MAX_TREND_MONTHS);
        let windows: Vec<(DateTime<Utc>, DateTime<Utc>)> = month_windows(now.date_naive(), months)
            .into_iter()
            .map(|(start, end)| (start_of_day_utc(start), start_of_day_utc(end)))
            .collect();
        let mut totals: BTreeMap<Category, Vec<f64>> = BTreeMap::new();
        for txn in transactions.iter().filter(|txn| txn.is_expense()) {
            let slot = windows
                .iter()
                .position(|(start, end)| *start <= txn.date && txn.date < *end);
            if let Some(slot) = slot {
                totals.entry(txn.category).or_insert_with(|| vec![0.0; months])[slot] += txn.magnitude();
            }
        }
        let mut trends: Vec<CategoryTrend> = totals
            .into_iter()
            .map(|(category, totals)| CategoryTrend { category, totals })
            .collect();
        trends.sort_by(|a, b| {
            b.total()
                .total_cmp(&a.total())
                .then_with(|| a.category.id().cmp(b.category.id()))
        });
        trends
    }

    fn buckets(frame: TimeFrame, today: NaiveDate) -> Vec<CashFlowBucket> {
        let count = frame.bucket_count();
        let format = frame.label_format();
        let windows: Vec<(NaiveDate, NaiveDate)> = match frame {
            TimeFrame::Daily => (0..count)
                .rev()
                .map(|back| {
                    let start = today - Duration::days(back as i64);
                    (start, start + Duration::days(1))
                })
                .collect(),
            TimeFrame::Weekly => {
                let current = week_start(today);
                (0..count)
                    .rev()
                    .map(|back| {
                        let start = current - Duration::weeks(back as i64);
                        (start, start + Duration::weeks(1))
                    })
                    .collect()
            }
            TimeFrame::Monthly => month_windows(today, count),
        };
        windows
            .into_iter()
            .map(|(start, end)| CashFlowBucket::empty(start, end, format))
            .collect()
    }
}

/// `count` calendar months ending with the month containing `today`, oldest first.
fn month_windows(today: NaiveDate, count: usize) -> Vec<(NaiveDate, NaiveDate)> {
    let current = month_start(today);
    (0..count as i32)
        .rev()
        .map(|back| {
            let start = shift_month(current, -back);
            (start, shift_month(start, 1))
        })
        .collect()
}

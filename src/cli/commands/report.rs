use serde::Serialize;

use fintrack_core::{
    BudgetOverview, CashFlowBucket, CategorySpending, CategoryTrend, CurrencyFormatter,
    MonthlyChange, MonthlyStats, SymbolFormatter, MAX_TREND_MONTHS,
};

use crate::cli::args::{invalid, parse_frame, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "report balance [--json]
report change [--json]
report categories [--json]
report cashflow [daily|weekly|monthly] [--json]
report overview [--json]
report budget [--json]
report stats [--json]
report trend [months] [--json]";

const DEFAULT_TREND_MONTHS: usize = 6;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "report",
        "Show balances, spending breakdowns and cash flow",
        USAGE,
        cmd_report,
    )]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["json"])?;
    let Some(sub) = parsed.positional.first() else {
        return Err(invalid(format!("usage:\n{USAGE}")));
    };
    let json = parsed.switch("json");
    let arg = parsed.positional.get(1).copied();
    let formatter = SymbolFormatter::from_settings(context.app.settings());
    let app = &context.app;

    match sub.to_ascii_lowercase().as_str() {
        "balance" => emit(json, &app.total_balance(), |balance| {
            output::info(format!(
                "Total balance: {}",
                output::signed(*balance, formatter.format_signed(*balance))
            ));
        }),
        "change" => emit(json, &app.monthly_change(), |change| print_change(change, &formatter)),
        "categories" => emit(json, &app.category_spending(), |spending| {
            print_categories(spending, &formatter)
        }),
        "cashflow" => {
            let frame = arg.map(parse_frame).transpose()?;
            emit(json, &app.cash_flow(frame), |buckets| print_buckets(buckets, &formatter))
        }
        "overview" => emit(json, &app.monthly_overview(), |buckets| {
            print_buckets(buckets, &formatter)
        }),
        "budget" => emit(json, &app.budget_overview(), |overview| {
            print_budget_overview(overview, &formatter)
        }),
        "stats" => emit(json, &app.monthly_stats(), |stats| print_stats(stats, &formatter)),
        "trend" => {
            let months = match arg {
                Some(raw) => raw
                    .parse::<usize>()
                    .ok()
                    .filter(|m| (1..=MAX_TREND_MONTHS).contains(m))
                    .ok_or_else(|| {
                        invalid(format!(
                            "`{raw}` is not a month count between 1 and {MAX_TREND_MONTHS}"
                        ))
                    })?,
                None => DEFAULT_TREND_MONTHS,
            };
            emit(json, &app.category_trend(months), |trends| print_trends(trends, &formatter))
        }
        other => Err(invalid(format!("unknown report `{other}`"))),
    }
}

/// Prints `value` as pretty JSON or through `render`.
fn emit<T: Serialize>(json: bool, value: &T, render: impl FnOnce(&T)) -> CommandResult {
    if json {
        let text = serde_json::to_string_pretty(value)
            .map_err(|err| CommandError::Message(format!("could not encode report: {err}")))?;
        println!("{text}");
    } else {
        render(value);
    }
    Ok(())
}

fn print_change(change: &MonthlyChange, formatter: &SymbolFormatter) {
    output::section("Month over month");
    output::info(format!("  This month : {}", formatter.format_signed(change.current)));
    output::info(format!("  Last month : {}", formatter.format_signed(change.previous)));
    output::info(format!("  Change     : {:+.1}%", change.change_percent));
}

fn print_categories(spending: &[CategorySpending], formatter: &SymbolFormatter) {
    if spending.is_empty() {
        output::info("No expenses recorded.");
        return;
    }
    let rows: Vec<Vec<String>> = spending
        .iter()
        .map(|entry| {
            vec![
                format!("{} {}", entry.category.icon(), entry.category.display_name()),
                formatter.format_amount(entry.amount),
                entry.count.to_string(),
                format!("{:.1}%", entry.percentage),
            ]
        })
        .collect();
    output::info(output::render_table(
        &["Category", "Spent", "Count", "Share"],
        &rows,
    ));
}

fn print_buckets(buckets: &[CashFlowBucket], formatter: &SymbolFormatter) {
    let rows: Vec<Vec<String>> = buckets
        .iter()
        .map(|bucket| {
            vec![
                bucket.label.clone(),
                formatter.format_amount(bucket.income),
                formatter.format_amount(bucket.expense),
                formatter.format_signed(bucket.net()),
            ]
        })
        .collect();
    output::info(output::render_table(
        &["Period", "Income", "Expense", "Net"],
        &rows,
    ));
}

fn print_budget_overview(overview: &BudgetOverview, formatter: &SymbolFormatter) {
    output::section("Budget overview");
    output::info(format!(
        "  Total budget    : {}",
        formatter.format_amount(overview.total_budget)
    ));
    output::info(format!(
        "  Remaining       : {} ({:.0}%)",
        formatter.format_signed(overview.remaining_budget),
        overview.remaining_percentage
    ));
    output::info(format!("  Days remaining  : {}", overview.days_remaining));
    output::info(format!(
        "  Daily allowance : {}",
        formatter.format_signed(overview.daily_allowance)
    ));
}

fn print_stats(stats: &MonthlyStats, formatter: &SymbolFormatter) {
    output::section("This month");
    output::info(format!("  Income   : {}", formatter.format_amount(stats.income)));
    output::info(format!("  Expenses : {}", formatter.format_amount(stats.expenses)));
    output::info(format!("  Net      : {}", formatter.format_signed(stats.net)));
    output::info(format!("  Savings  : {}", formatter.format_signed(stats.savings)));
}

fn print_trends(trends: &[CategoryTrend], formatter: &SymbolFormatter) {
    if trends.is_empty() {
        output::info("No expenses in that window.");
    }
    for trend in trends {
        let cells: Vec<String> = trend
            .totals
            .iter()
            .map(|value| formatter.format_amount(*value))
            .collect();
        output::info(format!(
            "  {:<18} {}  (total {})",
            trend.category.display_name(),
            cells.join(" "),
            formatter.format_amount(trend.total())
        ));
    }
}

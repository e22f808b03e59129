use fintrack_core::{CurrencyFormatter, DateFormatter, PatternDateFormatter, SymbolFormatter};
use fintrack_domain::{start_of_day_utc, Transaction, TransactionPatch};

use crate::cli::args::{
    invalid, parse_amount, parse_category, parse_date, parse_kind, parse_method, parse_month,
    ParsedArgs,
};
use crate::cli::core::{short_id, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "txn add <income|expense> <amount> <category> [--date YYYY-MM-DD] [--desc TEXT] [--method ID]
txn edit <id> [--amount N] [--type T] [--category C] [--date D] [--desc TEXT | --clear-desc] [--method ID]
txn remove <id>
txn list [--category C] [--month YYYY-MM]
txn recent [count]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "txn",
        "Record, edit and list transactions",
        USAGE,
        cmd_txn,
    )
    .with_aliases(&["transaction", "transactions"])]
}

fn cmd_txn(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((sub, rest)) = args.split_first() else {
        return Err(invalid(format!("usage:\n{USAGE}")));
    };
    match sub.to_ascii_lowercase().as_str() {
        "add" => add(context, rest),
        "edit" => edit(context, rest),
        "remove" | "rm" => remove(context, rest),
        "list" | "ls" => list(context, rest),
        "recent" => recent(context, rest),
        other => Err(invalid(format!("unknown txn subcommand `{other}`"))),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    let kind = parse_kind(parsed.positional(0, "transaction type")?)?;
    let amount = parse_amount(parsed.positional(1, "amount")?)?;
    let category = parse_category(parsed.positional(2, "category")?)?;
    let date = match parsed.flag("date") {
        Some(raw) => start_of_day_utc(parse_date(raw, context.app.today())?),
        None => context.app.now(),
    };

    let mut txn = Transaction::new(kind, amount, category, date);
    if let Some(desc) = parsed.flag("desc").map(str::to_string).or_else(|| parsed.rest(3)) {
        txn = txn.with_description(desc);
    }
    match parsed.flag("method") {
        Some(raw) => txn = txn.with_payment_method(parse_method(raw)?),
        None => {
            if let Some(method) = context.app.settings().default_payment_method {
                txn = txn.with_payment_method(method);
            }
        }
    }

    let id = context.app.add_transaction(txn)?;
    output::success(format!("Transaction {} added.", short_id(id)));
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["clear-desc"])?;
    let id = context.resolve_transaction(parsed.positional(0, "transaction id")?)?;
    let mut patch = TransactionPatch::default();
    if let Some(raw) = parsed.flag("amount") {
        patch.amount = Some(parse_amount(raw)?);
    }
    if let Some(raw) = parsed.flag("type") {
        patch.kind = Some(parse_kind(raw)?);
    }
    if let Some(raw) = parsed.flag("category") {
        patch.category = Some(parse_category(raw)?);
    }
    if let Some(raw) = parsed.flag("date") {
        patch.date = Some(start_of_day_utc(parse_date(raw, context.app.today())?));
    }
    if let Some(desc) = parsed.flag("desc") {
        patch.description = Some(Some(desc.to_string()));
    } else if parsed.switch("clear-desc") {
        patch.description = Some(None);
    }
    if let Some(raw) = parsed.flag("method") {
        patch.payment_method = Some(Some(parse_method(raw)?));
    }
    if patch.is_empty() {
        return Err(invalid("nothing to change; pass at least one flag"));
    }
    context.app.update_transaction(id, patch)?;
    output::success(format!("Transaction {} updated.", short_id(id)));
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| invalid("missing transaction id"))?;
    let id = context.resolve_transaction(raw)?;
    if !context.confirm("Remove this transaction?")? {
        output::info("Cancelled.");
        return Ok(());
    }
    let removed = context.app.remove_transaction(id)?;
    output::success(format!("Transaction {} removed.", short_id(removed.id)));
    Ok(())
}

const DAY_HEADER_PATTERN: &str = "%a %d %b %Y";

fn list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    let category = parsed.flag("category").map(parse_category).transpose()?;
    let month = parsed.flag("month").map(parse_month).transpose()?;
    let formatter = SymbolFormatter::from_settings(context.app.settings());
    let headers = PatternDateFormatter::new(DAY_HEADER_PATTERN);
    let dates = PatternDateFormatter::default();

    let groups = context.app.transactions().group_by_day();
    let mut shown = 0;
    for (day, entries) in groups {
        if month.is_some_and(|m| !fintrack_domain::same_month(day, m)) {
            continue;
        }
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|txn| category.map_or(true, |c| txn.category == c))
            .collect();
        if entries.is_empty() {
            continue;
        }
        output::section(headers.format_date(day));
        for txn in entries {
            print_line(txn, &formatter, &dates);
            shown += 1;
        }
    }
    if shown == 0 {
        output::info("No transactions recorded.");
    }
    Ok(())
}

fn recent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let formatter = SymbolFormatter::from_settings(context.app.settings());
    let dates = PatternDateFormatter::default();
    let entries = match args.first() {
        Some(raw) => {
            let limit = raw
                .parse::<usize>()
                .map_err(|_| invalid(format!("`{raw}` is not a count")))?;
            context.app.transactions().recent(limit)
        }
        None => context.app.recent_transactions(),
    };
    if entries.is_empty() {
        output::info("No transactions recorded.");
    }
    for txn in entries {
        print_line(txn, &formatter, &dates);
    }
    Ok(())
}

fn print_line(txn: &Transaction, formatter: &impl CurrencyFormatter, dates: &impl DateFormatter) {
    let amount = formatter.format_signed(txn.signed_amount());
    let mut line = format!(
        "  {}  {}  {:<18} {}",
        short_id(txn.id),
        dates.format_date(txn.day()),
        txn.category.display_name(),
        output::signed(txn.signed_amount(), amount)
    );
    if let Some(desc) = &txn.description {
        line.push_str(&format!("  {desc}"));
    }
    if let Some(method) = txn.payment_method {
        line.push_str(&format!(" [{}]", method.display_name()));
    }
    output::info(line);
}

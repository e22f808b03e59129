use fintrack_core::{BudgetService, CurrencyFormatter, SymbolFormatter};
use fintrack_domain::{Budget, BudgetPatch};

use crate::cli::args::{invalid, parse_amount, parse_category, parse_date, parse_month, ParsedArgs};
use crate::cli::core::{short_id, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "budget add <category> <amount> [--month YYYY-MM | --from YYYY-MM-DD --to YYYY-MM-DD]
budget edit <id> [--amount N] [--category C] [--from D] [--to D]
budget remove <id>
budget list [--date YYYY-MM-DD | --all]
budget status <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "budget",
        "Manage category budgets",
        USAGE,
        cmd_budget,
    )]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((sub, rest)) = args.split_first() else {
        return Err(invalid(format!("usage:\n{USAGE}")));
    };
    match sub.to_ascii_lowercase().as_str() {
        "add" => add(context, rest),
        "edit" => edit(context, rest),
        "remove" | "rm" => remove(context, rest),
        "list" | "ls" => list(context, rest),
        "status" => status(context, rest),
        other => Err(invalid(format!("unknown budget subcommand `{other}`"))),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    let category = parse_category(parsed.positional(0, "category")?)?;
    let amount = parse_amount(parsed.positional(1, "amount")?)?;
    let today = context.app.today();

    let budget = match (parsed.flag("from"), parsed.flag("to")) {
        (Some(from), Some(to)) => Budget::new(
            category,
            amount,
            parse_date(from, today)?,
            parse_date(to, today)?,
        ),
        (None, None) => {
            let month = parsed.flag("month").map(parse_month).transpose()?;
            Budget::for_month(category, amount, month.unwrap_or(today))
        }
        _ => return Err(invalid("--from and --to must be given together")),
    };
    let (start, end) = (budget.start_date, budget.end_date);
    let id = context.app.add_budget(budget)?;
    output::success(format!(
        "Budget {} added for {} ({start} .. {end}).",
        short_id(id),
        category.display_name()
    ));
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    let id = context.resolve_budget(parsed.positional(0, "budget id")?)?;
    let today = context.app.today();
    let patch = BudgetPatch {
        category: parsed.flag("category").map(parse_category).transpose()?,
        amount: parsed.flag("amount").map(parse_amount).transpose()?,
        start_date: parsed
            .flag("from")
            .map(|raw| parse_date(raw, today))
            .transpose()?,
        end_date: parsed
            .flag("to")
            .map(|raw| parse_date(raw, today))
            .transpose()?,
    };
    if patch == BudgetPatch::default() {
        return Err(invalid("nothing to change; pass at least one flag"));
    }
    context.app.update_budget(id, patch)?;
    output::success(format!("Budget {} updated.", short_id(id)));
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| invalid("missing budget id"))?;
    let id = context.resolve_budget(raw)?;
    if !context.confirm("Remove this budget?")? {
        output::info("Cancelled.");
        return Ok(());
    }
    context.app.remove_budget(id)?;
    output::success(format!("Budget {} removed.", short_id(id)));
    Ok(())
}

fn list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["all"])?;
    let budgets: Vec<&Budget> = if parsed.switch("all") {
        context.app.budgets().all().iter().collect()
    } else {
        let as_of = parsed
            .flag("date")
            .map(|raw| parse_date(raw, context.app.today()))
            .transpose()?;
        context.app.budgets().list(as_of)
    };
    if budgets.is_empty() {
        output::info("No budgets found.");
        return Ok(());
    }
    let formatter = SymbolFormatter::from_settings(context.app.settings());
    let transactions = context.app.transactions().as_slice();
    let rows: Vec<Vec<String>> = budgets
        .iter()
        .map(|budget| {
            let status = BudgetService::status(budget, transactions);
            vec![
                short_id(budget.id),
                budget.category.id().to_string(),
                formatter.format_amount(budget.amount),
                formatter.format_amount(status.spent),
                format!("{}%", status.percentage),
                format!("{} .. {}", budget.start_date, budget.end_date),
            ]
        })
        .collect();
    output::info(output::render_table(
        &["Id", "Category", "Budget", "Spent", "Used", "Range"],
        &rows,
    ));
    Ok(())
}

fn status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| invalid("missing budget id"))?;
    let id = context.resolve_budget(raw)?;
    let status = context.app.budget_status(id)?;
    let formatter = SymbolFormatter::from_settings(context.app.settings());
    output::section("Budget status");
    output::info(format!("  Spent     : {}", formatter.format_amount(status.spent)));
    output::info(format!("  Remaining : {}", formatter.format_amount(status.remaining)));
    output::info(format!("  Used      : {}%", status.percentage));
    Ok(())
}

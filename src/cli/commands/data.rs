use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::cli::args::invalid;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write a JSON snapshot to a file or stdout",
            "export [path]",
            cmd_export,
        ),
        CommandEntry::new(
            "import",
            "Replace all data with a JSON snapshot (`-` reads stdin)",
            "import <path|->",
            cmd_import,
        ),
        CommandEntry::new(
            "backup",
            "Create, list or restore data backups",
            "backup [note]\nbackup list\nbackup restore <name>",
            cmd_backup,
        ),
        CommandEntry::new("reset", "Delete every transaction, budget and setting", "reset", cmd_reset),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let json = context.app.export_snapshot()?;
    match args.first() {
        Some(path) => {
            fs::write(path, json)?;
            output::success(format!("Snapshot written to {path}."));
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let source = args.first().ok_or_else(|| invalid("usage: import <path|->"))?;
    let json = if *source == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(Path::new(source))?
    };
    if !context.confirm("Importing replaces all current data. Continue?")? {
        output::info("Import cancelled.");
        return Ok(());
    }
    context.app.import_snapshot(&json)?;
    output::success(format!(
        "Imported {} transactions and {} budgets.",
        context.app.transactions().len(),
        context.app.budgets().all().len()
    ));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["list"] => {
            let backups = context.app.list_backups()?;
            if backups.is_empty() {
                output::info("No backups found.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = backups
                .iter()
                .map(|backup| {
                    let created = backup
                        .created_at
                        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".into());
                    vec![backup.name.clone(), created, backup.files.to_string()]
                })
                .collect();
            output::info(output::render_table(&["Name", "Created", "Files"], &rows));
            Ok(())
        }
        ["restore", name] => {
            if !context.confirm(&format!("Restore backup `{name}`? Current data is replaced."))? {
                output::info("Restore cancelled.");
                return Ok(());
            }
            let info = context.app.restore_backup(name)?;
            output::success(format!("Restored {} ({} files).", info.name, info.files));
            Ok(())
        }
        ["restore"] => Err(invalid("usage: backup restore <name>")),
        note => {
            let note = (!note.is_empty()).then(|| note.join(" "));
            let info = context.app.backup(note.as_deref())?;
            output::success(format!("Backup {} created ({} files).", info.name, info.files));
            Ok(())
        }
    }
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Delete all transactions, budgets and settings?")? {
        output::info("Reset cancelled.");
        return Ok(());
    }
    context.app.reset()?;
    output::success("All data cleared.");
    Ok(())
}

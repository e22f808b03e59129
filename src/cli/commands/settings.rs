use fintrack_config::ConfigManager;

use crate::cli::args::invalid;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "settings show
settings set <key> <value>   (keys: language, currency, dark_mode, reminders, cloud_sync, payment_method)";

const CONFIG_USAGE: &str = "config show
config backup [note]
config list
config restore <name>   (applies on next start)";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("settings", "Show or change preferences", USAGE, cmd_settings),
        CommandEntry::new(
            "config",
            "Inspect, back up or restore the application config",
            CONFIG_USAGE,
            cmd_config,
        ),
    ]
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            let settings = context.app.settings();
            let method = settings
                .default_payment_method
                .map(|m| m.id())
                .unwrap_or("none");
            output::section("Settings");
            output::info(format!("  language       : {}", settings.language));
            output::info(format!("  currency       : {}", settings.currency));
            output::info(format!("  dark_mode      : {}", settings.dark_mode));
            output::info(format!("  reminders      : {}", settings.reminder_enabled));
            output::info(format!("  cloud_sync     : {}", settings.cloud_sync_enabled));
            output::info(format!("  payment_method : {method}"));
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            context.app.set_setting(key, &value.join(" "))?;
            output::success(format!("{key} updated."));
            Ok(())
        }
        _ => Err(invalid(format!("usage:\n{USAGE}"))),
    }
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let config = context.app.config().clone();
    let manager = ConfigManager::with_base_dir(config.resolve_data_dir())?;
    match args {
        [] | ["show"] => {
            output::section("Config");
            output::info(format!("  file             : {}", manager.config_path().display()));
            output::info(format!("  storage          : {}", config.storage));
            output::info(format!("  data_dir         : {}", config.resolve_data_dir().display()));
            output::info(format!("  backup_retention : {}", config.backup_retention));
            output::info(format!("  log_filter       : {}", config.log_filter));
            output::info(format!("  time_frame       : {}", config.default_time_frame));
            output::info(format!("  recent_limit     : {}", config.recent_limit));
            output::info(format!("  color            : {}", config.ui_color_enabled));
        }
        ["list"] => {
            let backups = manager.list_backups()?;
            if backups.is_empty() {
                output::info("No config backups found.");
            }
            for name in backups {
                output::info(format!("  {name}"));
            }
        }
        ["backup", note @ ..] => {
            let note = (!note.is_empty()).then(|| note.join(" "));
            let name = manager.backup(&config, note.as_deref())?;
            output::success(format!("Config backup {name} created."));
        }
        ["restore", name] => {
            let restored = manager.restore(name)?;
            manager.save(&restored)?;
            output::success(format!("Config restored from {name}; restart to apply."));
        }
        _ => return Err(invalid(format!("usage:\n{CONFIG_USAGE}"))),
    }
    Ok(())
}

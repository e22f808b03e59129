pub mod budget;
pub mod data;
pub mod report;
pub mod settings;
pub mod system;
pub mod transaction;

use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(transaction::definitions());
    commands.extend(budget::definitions());
    commands.extend(report::definitions());
    commands.extend(settings::definitions());
    commands.extend(data::definitions());
    commands.extend(system::definitions());
    commands
}

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            description,
            usage,
            handler,
        }
    }

    /// Extra words that dispatch to this command.
    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    fn keys(&self) -> impl Iterator<Item = &'static str> {
        let aliases: &'static [&'static str] = self.aliases;
        std::iter::once(self.name).chain(aliases.iter().copied())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("command word `{0}` is already registered")]
pub struct DuplicateCommand(pub String);

/// Command table keyed by lower-cased name and alias.
///
/// Entries keep registration order for help output.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Builds the table, skipping any entry whose name or alias is taken.
    pub fn new(entries: Vec<CommandEntry>) -> Self {
        let mut registry = Self::default();
        for entry in entries {
            let name = entry.name;
            if let Err(err) = registry.register(entry) {
                warn!(command = name, %err, "skipping command");
            }
        }
        registry
    }

    /// Adds `entry`; nothing is registered when one of its words collides.
    pub fn register(&mut self, entry: CommandEntry) -> Result<(), DuplicateCommand> {
        let keys: Vec<String> = entry.keys().map(normalize).collect();
        for (index, key) in keys.iter().enumerate() {
            if self.lookup.contains_key(key) || keys[..index].contains(key) {
                return Err(DuplicateCommand(key.clone()));
            }
        }
        let index = self.entries.len();
        self.entries.push(entry);
        self.lookup.extend(keys.into_iter().map(|key| (key, index)));
        Ok(())
    }

    /// Finds a command by name or alias, ignoring case.
    pub fn get(&self, word: &str) -> Option<&CommandEntry> {
        self.lookup
            .get(&normalize(word))
            .and_then(|index| self.entries.get(*index))
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.entries.iter().collect()
    }

    /// Canonical command names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Every word that dispatches, aliases included.
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().flat_map(|entry| entry.keys())
    }

    pub fn handler(&self, word: &str) -> Option<CommandHandler> {
        self.get(word).map(|entry| entry.handler)
    }
}

fn normalize(word: &str) -> String {
    word.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    fn sample() -> CommandRegistry {
        CommandRegistry::new(vec![
            CommandEntry::new("help", "Show help", "help", noop),
            CommandEntry::new("exit", "Leave", "exit", noop).with_aliases(&["quit", "q"]),
        ])
    }

    #[test]
    fn lookups_ignore_case_and_follow_aliases() {
        let registry = sample();
        assert_eq!(registry.get("EXIT").map(|entry| entry.name), Some("exit"));
        assert_eq!(registry.get(" Quit ").map(|entry| entry.name), Some("exit"));
        assert_eq!(registry.get("q").map(|entry| entry.name), Some("exit"));
        assert!(registry.get("leave").is_none());
        assert!(registry.handler("Help").is_some());
    }

    #[test]
    fn help_order_lists_each_command_once() {
        let registry = sample();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["help", "exit"]);
        assert_eq!(registry.list().len(), 2);
        assert_eq!(
            registry.words().collect::<Vec<_>>(),
            vec!["help", "exit", "quit", "q"]
        );
    }

    #[test]
    fn colliding_words_are_refused_whole() {
        let mut registry = sample();
        let err = registry
            .register(CommandEntry::new("stop", "Stop", "stop", noop).with_aliases(&["QUIT"]))
            .unwrap_err();
        assert_eq!(err, DuplicateCommand("quit".into()));
        assert!(registry.get("stop").is_none());

        let err = registry
            .register(CommandEntry::new("Help", "Again", "help", noop))
            .unwrap_err();
        assert_eq!(err, DuplicateCommand("help".into()));
        assert_eq!(registry.list().len(), 2);
    }
}

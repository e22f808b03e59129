//! Shell state, dispatch and error reporting.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    app::FinanceApp,
    cli::{commands, output, registry::CommandRegistry},
    errors::{CliError, FinError},
};

use super::registry::CommandEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Fin(#[from] FinError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<fintrack_core::CoreError> for CommandError {
    fn from(err: fintrack_core::CoreError) -> Self {
        CommandError::Fin(FinError::from(err))
    }
}

impl From<fintrack_config::ConfigError> for CommandError {
    fn from(err: fintrack_config::ConfigError) -> Self {
        CommandError::Fin(FinError::from(err))
    }
}

/// Shared runtime state for one shell session.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub app: FinanceApp,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode, app: FinanceApp) -> Self {
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            app,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        "fintrack> ".to_string()
    }

    /// Names and aliases offered for completion.
    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.words().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(&mut self, command: &str, raw: &str, args: &[&str]) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        tracing::debug!(command, args = args.len(), "dispatching command");
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    /// Prints the closest known command name, if any is close enough.
    pub fn suggest_command(&self, input: &str) {
        let needle = input.to_ascii_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(&needle, name), name))
            .min();
        match best {
            Some((distance, name)) if distance <= 2 => {
                output::warning(format!("Unknown command `{input}`. Did you mean `{name}`?"))
            }
            _ => output::warning(format!(
                "Unknown command `{input}`. Type `help` for the list of commands."
            )),
        }
    }

    /// Reports a command failure. Script sessions keep going after errors.
    pub fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::InvalidArguments(message) => output::error(format!("Invalid arguments: {message}")),
            CommandError::Io(io) => return Err(CliError::Io(io)),
            other => output::error(other.to_string()),
        }
        Ok(())
    }

    /// Asks for confirmation interactively; script sessions always proceed.
    pub fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    pub fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm("Exit fintrack?")
            .map_err(|err| CliError::Command(err.to_string()))
    }

    /// Resolves a full transaction id or a unique prefix of one.
    pub fn resolve_transaction(&self, raw: &str) -> Result<Uuid, CommandError> {
        let ids = self.app.transactions().as_slice().iter().map(|txn| txn.id);
        resolve_id(raw, ids, "transaction")
    }

    pub fn resolve_budget(&self, raw: &str) -> Result<Uuid, CommandError> {
        let ids = self.app.budgets().all().iter().map(|budget| budget.id);
        resolve_id(raw, ids, "budget")
    }
}

fn resolve_id(raw: &str, ids: impl Iterator<Item = Uuid>, entity: &str) -> Result<Uuid, CommandError> {
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(id);
    }
    let prefix = raw.trim().to_ascii_lowercase();
    if prefix.len() < 4 {
        return Err(CommandError::InvalidArguments(format!(
            "{entity} id `{raw}` is too short; use at least 4 characters"
        )));
    }
    let matches: Vec<Uuid> = ids.filter(|id| id.to_string().starts_with(&prefix)).collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CommandError::Message(format!("no {entity} matches `{raw}`"))),
        _ => Err(CommandError::Message(format!(
            "`{raw}` matches {} {entity}s; use a longer prefix",
            matches.len()
        ))),
    }
}

/// First eight characters of an id, as shown in listings.
pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

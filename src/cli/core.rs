//! Core CLI loop state, dispatch, and shell context helpers.

use std::{io, sync::Arc};

use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::cli::card::CardState;
use crate::cli::forms::{ExpenseForm, FormError, FormField};
use crate::cli::list::ExpenseList;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::ui::formatting::Formatter;
use crate::cli::ui::header::Header;
use crate::cli::ui::summary::{render_breakdown, render_summary};
use crate::config::{Config, ConfigManager, CONFIG_KEYS};
use crate::core::services::{ExpenseService, ServiceError, SummaryService};
use crate::core::{Clock, ExpenseStore, SystemClock};
use crate::currency::DisplayFormat;
use crate::domain::{ExpenseData, ExpenseId};
use crate::errors::TrackerError;
pub use crate::errors::CliError;

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

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

/// Everything a command handler can reach. The store is the only owner of
/// expense data; the form and list hold UI state only.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub store: ExpenseStore,
    pub form: ExpenseForm,
    pub list: ExpenseList,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub format: DisplayFormat,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager, Arc::new(SystemClock))
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        let store = if config.seed_sample_data {
            let sample = ExpenseStore::with_sample_data();
            match sample.check_currency(&config.currency_code()) {
                Ok(()) => sample,
                Err(err) => {
                    warn!(error = %err, "sample data skipped");
                    ExpenseStore::new()
                }
            }
        } else {
            ExpenseStore::new()
        };

        let mut app = ShellContext {
            mode,
            registry,
            store,
            form: ExpenseForm::new(clock),
            list: ExpenseList::new(),
            format: DisplayFormat::default(),
            config,
            config_manager,
            last_command: None,
            running: true,
        };
        app.apply_config()?;
        debug!(
            expenses = app.store.len(),
            config = %app.config_manager.path().display(),
            "shell context ready"
        );
        Ok(app)
    }

    fn apply_config(&mut self) -> Result<(), TrackerError> {
        let locale = self.config.locale_config()?;
        let currency = self.config.currency_code();
        self.store.set_currency(currency.clone())?;
        self.form.set_precision(currency.minor_units());
        self.format = DisplayFormat::new(currency, locale);
        output::set_preferences(OutputPreferences {
            plain_mode: self.config.plain_mode,
            ..output::current_preferences()
        });
        Ok(())
    }

    pub(crate) fn prompt(&self) -> String {
        "expense> ".to_string()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.resolve(name)
    }

    pub(crate) fn print_banner(&self) {
        let formatter = Formatter::new();
        formatter.print_block(Header::from_config(&self.config).render(&formatter));
        cli_io::print_hint("Type `help` to see available commands.");
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.resolve(command).map(|entry| entry.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        if let Some(name) = self.registry.closest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", name));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action("Exit shell?").map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Form(form_error) => {
                for error in &form_error.errors {
                    cli_io::print_error(format!(
                        "{}: {}",
                        error.field.label().trim_end_matches(" *"),
                        error.message
                    ));
                }
                cli_io::print_hint("Use `help add` or `help set` for the expected values.");
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    /// Validates the draft and hands the payload to the store.
    pub(crate) fn submit_form(&mut self) -> CommandResult {
        let data = self.form.submit()?;
        self.add_expense(data)
    }

    pub(crate) fn add_expense(&mut self, data: ExpenseData) -> CommandResult {
        let summary = format!("{} ({})", data.description, self.format.amount(data.amount));
        let id = ExpenseService::add(&mut self.store, data)?;
        cli_io::print_success(format!("Added expense #{}: {}", id, summary));
        Ok(())
    }

    pub(crate) fn show_form(&self) {
        let formatter = Formatter::new();
        formatter.print_header("Add New Expense");
        let draft = self.form.draft();
        let entries: Vec<(&str, &str)> = FormField::ALL
            .iter()
            .map(|field| {
                let value = draft.field(*field);
                (field.label(), if value.is_empty() { "(empty)" } else { value })
            })
            .collect();
        formatter.print_two_column(&entries);
    }

    pub(crate) fn show_list(&self) -> CommandResult {
        let formatter = Formatter::new();
        let panel = self
            .list
            .render(self.store.expenses(), &self.format, formatter.preferences())?;
        formatter.print_header("Expenses");
        formatter.print_block(panel);
        Ok(())
    }

    pub(crate) fn show_summary(&self) -> CommandResult {
        let formatter = Formatter::new();
        let summary = SummaryService::summarize(&self.store, Some(&self.config.period))?;
        let breakdown =
            SummaryService::by_category(self.store.expenses(), self.format.precision())?;
        formatter.print_block(Header::from_config(&self.config).render(&formatter));
        formatter.print_block(render_summary(&summary, &self.format, &formatter));
        if !breakdown.is_empty() {
            println!();
            formatter.print_block(render_breakdown(&breakdown, &self.format, &formatter));
        }
        Ok(())
    }

    pub(crate) fn toggle_highlight(&mut self, id: ExpenseId) -> Result<CardState, CommandError> {
        let expense = self
            .store
            .get(id)
            .ok_or(TrackerError::ExpenseNotFound(id))?;
        Ok(self.list.toggle_highlight(expense))
    }

    pub(crate) fn toggle_category_visible(
        &mut self,
        id: ExpenseId,
    ) -> Result<CardState, CommandError> {
        let expense = self
            .store
            .get(id)
            .ok_or(TrackerError::ExpenseNotFound(id))?;
        Ok(self.list.toggle_category_visible(expense))
    }

    /// Routes a delete through the expense's card, then removes whatever id
    /// the card handed to its handler.
    pub(crate) fn delete_expense(&mut self, id: ExpenseId) -> CommandResult {
        if self.store.get(id).is_none() {
            return Err(TrackerError::ExpenseNotFound(id).into());
        }
        if self.mode == CliMode::Interactive
            && !cli_io::confirm_action(&format!("Delete expense #{}?", id))?
        {
            cli_io::print_info("Operation cancelled.");
            return Ok(());
        }

        let mut requested = None;
        if let Some(expense) = self.store.get(id) {
            let mut card = self
                .list
                .card(expense)
                .on_delete(|target| requested = Some(target));
            card.request_delete();
        }

        if let Some(target) = requested {
            let removed = ExpenseService::remove(&mut self.store, target)?;
            self.list.forget(target);
            cli_io::print_success(format!(
                "Deleted expense #{}: {}",
                removed.id, removed.description
            ));
        }
        Ok(())
    }

    pub(crate) fn show_config(&self) -> CommandResult {
        let formatter = Formatter::new();
        formatter.print_header("Configuration");
        let values = CONFIG_KEYS
            .iter()
            .map(|key| self.config.value(key).map(|value| (*key, value)))
            .collect::<Result<Vec<_>, _>>()?;
        let path = self.config_manager.path().display().to_string();
        let mut entries: Vec<(&str, &str)> = values
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect();
        entries.push(("file", path.as_str()));
        formatter.print_two_column(&entries);
        Ok(())
    }

    /// Validates, saves, then applies. A currency whose precision cannot
    /// express a stored amount is refused before anything is written.
    pub(crate) fn set_config_value(&mut self, key: &str, value: &str) -> CommandResult {
        let mut updated = self.config.clone();
        updated.set_value(key, value)?;
        self.store.check_currency(&updated.currency_code())?;
        self.config_manager.save(&updated)?;
        self.config = updated;
        self.apply_config()?;
        cli_io::print_success(format!("Updated `{}`.", key));
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Tracker(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let manager = ConfigManager::with_base_dir(base.to_path_buf())?;
    let clock = crate::core::FixedClock::on(chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    let mut app = ShellContext::with_config_manager(CliMode::Script, manager, Arc::new(clock))?;
    let script = lines.join("\n");
    let mut source = crate::cli::shell::ScriptSource::new(io::Cursor::new(script));
    crate::cli::shell::run_loop(&mut app, &mut source)?;
    Ok(app)
}

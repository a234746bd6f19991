use std::{
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::forms::FormField;
use crate::cli::output::info as output_info;
use crate::cli::registry::{ArgCompletion, CommandRegistry};
use crate::config::CONFIG_KEYS;
use crate::domain::Category;

pub const SCRIPT_ENV: &str = "EXPENSE_TRACKER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => {
            let mut source = EditorSource::new(&context.registry)?;
            context.print_banner();
            run_loop(&mut context, &mut source)
        }
        CliMode::Script => run_loop(&mut context, &mut ScriptSource::new(io::stdin().lock())),
    }
}

/// One read from a line source.
pub(crate) enum Input {
    Line(String),
    Interrupted,
    Eof,
}

/// Where shell lines come from: the line editor or a script on stdin.
pub(crate) trait LineSource {
    fn next_line(&mut self, prompt: &str) -> Result<Input, CliError>;

    /// Called with every non-blank line before it is dispatched.
    fn remember(&mut self, _line: &str) {}
}

struct EditorSource {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl EditorSource {
    fn new(registry: &CommandRegistry) -> Result<Self, CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper::new(registry.clone())));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn next_line(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(err) => Err(err.into()),
        }
    }

    fn remember(&mut self, line: &str) {
        self.editor.add_history_entry(line).ok();
    }
}

/// Newline-separated commands with no prompt and no history.
pub(crate) struct ScriptSource<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> ScriptSource<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for ScriptSource<R> {
    fn next_line(&mut self, _prompt: &str) -> Result<Input, CliError> {
        match self.lines.next() {
            Some(line) => Ok(Input::Line(line?)),
            None => Ok(Input::Eof),
        }
    }
}

/// Reads and dispatches lines until `exit`, end of input, or a confirmed
/// interrupt. Command failures are reported and the loop carries on.
pub(crate) fn run_loop(
    context: &mut ShellContext,
    source: &mut impl LineSource,
) -> Result<(), CliError> {
    while context.running {
        let prompt = context.prompt();
        let line = match source.next_line(&prompt)? {
            Input::Line(line) => line,
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
                continue;
            }
            Input::Eof => {
                if context.mode == CliMode::Interactive {
                    output_info("Exiting shell.");
                }
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        source.remember(trimmed);

        match handle_line(context, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };

    if tokens.is_empty() {
        return Ok(LoopControl::Continue);
    }

    let raw = &tokens[0];
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    context.last_command = Some(line.trim().to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Completion and usage hints for the line editor. Works from a snapshot of
/// the command table; expense data is never consulted.
struct CommandHelper {
    registry: CommandRegistry,
}

impl CommandHelper {
    fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    /// Start offset of the word under the cursor and its replacements.
    fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let current = &prefix[start..];
        let before: Vec<&str> = prefix[..start].split_whitespace().collect();

        let Some((command, args)) = before.split_first() else {
            let names = self.registry.completions(current);
            return (start, names.into_iter().map(String::from).collect());
        };
        let Some(entry) = self.registry.resolve(command) else {
            return (start, Vec::new());
        };

        let options: Vec<String> = match (entry.completion, args) {
            (ArgCompletion::Filter, []) => std::iter::once("all")
                .chain(Category::labels())
                .map(String::from)
                .collect(),
            (ArgCompletion::FormField, []) => FormField::ALL
                .iter()
                .map(|field| field.key().to_string())
                .collect(),
            (ArgCompletion::FormField, [field]) if field.eq_ignore_ascii_case("category") => {
                Category::labels().into_iter().map(String::from).collect()
            }
            (ArgCompletion::Config, []) => vec!["show".into(), "set".into()],
            (ArgCompletion::Config, [action]) if action.eq_ignore_ascii_case("set") => {
                CONFIG_KEYS.iter().map(|key| key.to_string()).collect()
            }
            (ArgCompletion::Command, []) => self
                .registry
                .completions(current)
                .into_iter()
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        };
        let needle = current.to_ascii_lowercase();
        let matches = options
            .into_iter()
            .filter(|option| option.to_ascii_lowercase().starts_with(&needle))
            .collect();
        (start, matches)
    }

    /// Usage text for the arguments not typed yet, once the line ends in a space.
    fn usage_hint(&self, line: &str) -> Option<String> {
        if !line.ends_with(char::is_whitespace) {
            return None;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let (command, typed) = words.split_first()?;
        let entry = self.registry.resolve(command)?;
        let remaining: Vec<&str> = entry
            .arguments()
            .split_whitespace()
            .skip(typed.len())
            .collect();
        if remaining.is_empty() {
            None
        } else {
            Some(remaining.join(" "))
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn helper() -> CommandHelper {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        CommandHelper::new(registry)
    }

    fn words(helper: &CommandHelper, prefix: &str) -> (usize, Vec<String>) {
        helper.candidates(prefix)
    }

    #[test]
    fn completes_command_names_and_aliases() {
        let helper = helper();
        assert_eq!(words(&helper, "f"), (0, vec!["filter".into(), "form".into()]));
        assert_eq!(words(&helper, "  qu"), (2, vec!["exit".into()]));
    }

    #[test]
    fn completes_arguments_by_command() {
        let helper = helper();
        assert_eq!(words(&helper, "filter sh"), (7, vec!["Shopping".into()]));
        assert_eq!(words(&helper, "set am"), (4, vec!["amount".into()]));
        assert_eq!(
            words(&helper, "set category ent").1,
            vec!["Entertainment".to_string()]
        );
        assert_eq!(words(&helper, "config set cu").1, vec!["currency".to_string()]);
        assert_eq!(words(&helper, "help to").1, vec!["toggle-category".to_string()]);
        assert!(words(&helper, "add Co").1.is_empty());
        assert!(words(&helper, "nothing he").1.is_empty());
    }

    #[test]
    fn hints_the_arguments_still_missing() {
        let helper = helper();
        assert_eq!(helper.usage_hint("delete "), Some("<id>".into()));
        assert_eq!(
            helper.usage_hint("add Coffee "),
            Some("<amount> [category] [date]".into())
        );
        assert_eq!(helper.usage_hint("rm 3 "), None);
        assert_eq!(helper.usage_hint("delete"), None);
        assert_eq!(helper.usage_hint("list "), None);
    }

    #[test]
    fn script_source_skips_blank_lines_and_stops_at_exit() {
        let dir = tempfile::tempdir().unwrap();
        let script = "\n   \nadd Coffee 3.50\nquit\nadd Late 1\n";
        let app = crate::cli::core::process_script(dir.path(), &[script]).unwrap();
        assert_eq!(app.store.len(), 3);
        assert!(!app.running);
        assert_eq!(app.last_command.as_deref(), Some("quit"));
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line("add \"Coffee 3").is_err());
    }
}

use strsim::levenshtein;

use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Largest edit distance still offered as a "did you mean" suggestion.
const SUGGESTION_DISTANCE: usize = 3;

/// What the arguments of a command complete to in the interactive shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgCompletion {
    #[default]
    Nothing,
    /// `all` or a category label.
    Filter,
    /// A form field name, then a category label when the field is `category`.
    FormField,
    /// `show`/`set`, then a config key.
    Config,
    /// Another command's name.
    Command,
}

#[derive(Clone)]
pub struct CommandEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub completion: ArgCompletion,
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
            completion: ArgCompletion::Nothing,
            handler,
        }
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn completes(mut self, completion: ArgCompletion) -> Self {
        self.completion = completion;
        self
    }

    /// Case-insensitive match on the name or any alias.
    pub fn answers_to(&self, word: &str) -> bool {
        self.spellings()
            .any(|spelling| spelling.eq_ignore_ascii_case(word))
    }

    /// The usage text after the command name, e.g. `<id>` for `delete <id>`.
    pub fn arguments(&self) -> &'static str {
        self.usage
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim_start())
            .unwrap_or("")
    }

    fn spellings(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// Command table in registration order. Registering a name twice replaces
/// the earlier entry in place.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        match self.entries.iter_mut().find(|known| known.name == entry.name) {
            Some(known) => *known = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn resolve(&self, word: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.answers_to(word))
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Canonical names starting with `prefix`, sorted; an alias match yields
    /// the command it stands for.
    pub fn completions(&self, prefix: &str) -> Vec<&'static str> {
        let needle = prefix.to_ascii_lowercase();
        let mut names: Vec<&'static str> = self
            .entries
            .iter()
            .filter(|entry| entry.spellings().any(|spelling| spelling.starts_with(&needle)))
            .map(|entry| entry.name)
            .collect();
        names.sort_unstable();
        names
    }

    /// Nearest command name by edit distance, if it is close enough to be
    /// a plausible typo.
    pub fn closest(&self, word: &str) -> Option<&'static str> {
        let needle = word.to_lowercase();
        self.entries
            .iter()
            .flat_map(|entry| {
                let needle = needle.as_str();
                entry
                    .spellings()
                    .map(move |spelling| (levenshtein(spelling, needle), entry.name))
            })
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .map(|(_, name)| name)
    }
}

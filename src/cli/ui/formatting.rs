use std::fmt;

use colored::Colorize;

use crate::cli::output::{current_preferences, OutputPreferences};

pub struct Formatter {
    prefs: OutputPreferences,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {
            prefs: current_preferences(),
        }
    }

    pub fn with_preferences(prefs: OutputPreferences) -> Self {
        Self { prefs }
    }

    pub fn preferences(&self) -> &OutputPreferences {
        &self.prefs
    }

    pub fn print_header(&self, title: impl fmt::Display) {
        println!("\n{}", self.header_text(title));
    }

    pub fn header_text(&self, title: impl fmt::Display) -> String {
        let text = format!("=== {} ===", title);
        if self.prefs.plain_mode {
            text
        } else {
            text.bold().to_string()
        }
    }

    pub fn print_block(&self, block: impl fmt::Display) {
        println!("{}", block);
    }

    pub fn two_column_text(&self, entries: &[(&str, &str)]) -> String {
        let label_width = entries
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        entries
            .iter()
            .map(|(label, value)| format!("  {:<width$}  {}", label, value, width = label_width))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn print_two_column(&self, entries: &[(&str, &str)]) {
        if entries.is_empty() {
            return;
        }
        println!("{}", self.two_column_text(entries));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_columns_align_on_longest_label() {
        let formatter = Formatter::with_preferences(OutputPreferences::default());
        let text = formatter.two_column_text(&[("Total Spent", "$1.00"), ("Expenses", "1")]);
        assert_eq!(text, "  Total Spent  $1.00\n  Expenses     1");
    }
}

use crate::cli::ui::formatting::Formatter;
use crate::config::Config;

/// Application title block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    pub subtitle: Option<String>,
}

impl Header {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
        }
    }

    pub fn render(&self, formatter: &Formatter) -> String {
        match &self.subtitle {
            Some(subtitle) => format!("{}\n{}", formatter.header_text(&self.title), subtitle),
            None => formatter.header_text(&self.title),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    core::utils::{app_data_dir, config_file_in, ensure_dir},
    currency::{CurrencyCode, LocaleConfig},
    errors::TrackerError,
};

const TMP_SUFFIX: &str = "tmp";

/// Keys accepted by [`Config::set_value`], in display order.
pub const CONFIG_KEYS: [&str; 7] = [
    "locale",
    "currency",
    "title",
    "subtitle",
    "period",
    "seed_sample_data",
    "plain_mode",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub period: String,
    pub seed_sample_data: bool,
    pub plain_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            title: "Expense Tracker".into(),
            subtitle: Some("Manage your spending with confidence".into()),
            period: "This Month".into(),
            seed_sample_data: true,
            plain_mode: false,
        }
    }
}

impl Config {
    pub fn locale_config(&self) -> Result<LocaleConfig, TrackerError> {
        LocaleConfig::for_tag(&self.locale)
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.as_str())
    }

    /// Current value of `key` rendered as text.
    pub fn value(&self, key: &str) -> Result<String, TrackerError> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "title" => self.title.clone(),
            "subtitle" => self.subtitle.clone().unwrap_or_default(),
            "period" => self.period.clone(),
            "seed_sample_data" => self.seed_sample_data.to_string(),
            "plain_mode" => self.plain_mode.to_string(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), TrackerError> {
        let trimmed = value.trim();
        match key {
            "locale" => {
                LocaleConfig::for_tag(trimmed)?;
                self.locale = trimmed.to_string();
            }
            "currency" => {
                if trimmed.len() != 3 || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
                    return Err(TrackerError::Config(format!(
                        "currency must be a three-letter ISO code, got `{}`",
                        trimmed
                    )));
                }
                self.currency = trimmed.to_uppercase();
            }
            "title" => {
                if trimmed.is_empty() {
                    return Err(TrackerError::Config("title cannot be empty".into()));
                }
                self.title = trimmed.to_string();
            }
            "subtitle" => {
                self.subtitle = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            "period" => self.period = trimmed.to_string(),
            "seed_sample_data" => self.seed_sample_data = parse_flag(key, trimmed)?,
            "plain_mode" => self.plain_mode = parse_flag(key, trimmed)?,
            other => return Err(unknown_key(other)),
        }
        debug!(key, value = trimmed, "config value updated");
        Ok(())
    }
}

fn unknown_key(key: &str) -> TrackerError {
    TrackerError::Config(format!(
        "unknown config key `{}` (keys: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, TrackerError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(TrackerError::Config(format!(
            "`{}` expects true/false, got `{}`",
            key, value
        ))),
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, TrackerError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, TrackerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, TrackerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), TrackerError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), TrackerError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix() {
        let tmp = tmp_path(Path::new("/data/config.json"));
        assert_eq!(tmp, PathBuf::from("/data/config.json.tmp"));
    }

    #[test]
    fn set_value_validates_input() {
        let mut config = Config::default();
        config.set_value("currency", "eur").unwrap();
        assert_eq!(config.currency, "EUR");
        assert!(config.set_value("currency", "euro").is_err());
        assert!(config.set_value("plain_mode", "maybe").is_err());
        assert!(config.set_value("colour", "blue").is_err());
        config.set_value("subtitle", "").unwrap();
        assert_eq!(config.subtitle, None);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"title":"Household"}"#).unwrap();
        assert_eq!(config.title, "Household");
        assert_eq!(config.currency, "USD");
        assert!(config.seed_sample_data);
    }
}

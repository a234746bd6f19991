//! Currency and date presentation helpers plus exact minor-unit arithmetic.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of fractional digits the currency is accounted in.
    pub fn minor_units(&self) -> u8 {
        minor_units_for(self.as_str())
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub date_format: DateFormatStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            date_format: DateFormatStyle::Medium,
        }
    }
}

impl LocaleConfig {
    /// Resolves the separators for a handful of known language tags.
    pub fn for_tag(tag: &str) -> Result<Self, TrackerError> {
        let (decimal_separator, grouping_separator) = match tag {
            "en-US" | "en-GB" | "en-CA" | "en-AU" => ('.', ','),
            "de-DE" | "es-ES" | "it-IT" | "pt-BR" | "pt-PT" => (',', '.'),
            "fr-FR" => (',', ' '),
            "de-CH" => ('.', '\''),
            other => {
                return Err(TrackerError::Config(format!(
                    "unsupported locale `{}`",
                    other
                )))
            }
        };
        Ok(Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
            date_format: DateFormatStyle::Medium,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatOptions {
    pub currency_display: CurrencyDisplay,
    pub negative_style: NegativeStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            currency_display: CurrencyDisplay::Symbol,
            negative_style: NegativeStyle::Sign,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CurrencyDisplay {
    Symbol,
    Code,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFormatStyle {
    Short,
    Medium,
    Long,
}

/// Bundles the currency and locale settings every panel formats with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayFormat {
    pub currency: CurrencyCode,
    pub locale: LocaleConfig,
    pub options: FormatOptions,
}

impl DisplayFormat {
    pub fn new(currency: CurrencyCode, locale: LocaleConfig) -> Self {
        Self {
            currency,
            locale,
            options: FormatOptions::default(),
        }
    }

    pub fn precision(&self) -> u8 {
        self.currency.minor_units()
    }

    pub fn amount(&self, value: f64) -> String {
        format_currency_value(value, &self.currency, &self.locale, &self.options)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        format_date(&self.locale, date)
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Largest amount a single expense may carry, in currency units.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Why an amount cannot be recorded in a given currency.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be greater than 0")]
    NotPositive,
    #[error("Amount cannot exceed 1,000,000,000")]
    TooLarge,
    #[error("Use whole amounts for this currency")]
    Fractional,
    #[error("Use at most {0} decimal places")]
    TooPrecise(u8),
}

/// Accepts positive amounts up to [`MAX_AMOUNT`] that are stated exactly in
/// the currency's minor units (`12.50` in USD, `12` in JPY).
pub fn validate_amount(amount: f64, precision: u8) -> Result<(), AmountError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AmountError::NotPositive);
    }
    if amount > MAX_AMOUNT {
        return Err(AmountError::TooLarge);
    }
    let rounded: f64 = format!("{:.*}", precision as usize, amount)
        .parse()
        .map_err(|_| AmountError::NotPositive)?;
    if rounded != amount {
        return Err(match precision {
            0 => AmountError::Fractional,
            places => AmountError::TooPrecise(places),
        });
    }
    Ok(())
}

fn scale(precision: u8) -> f64 {
    10f64.powi(precision as i32)
}

/// Converts an amount in currency units to rounded integer minor units.
/// Amounts whose minor-unit value does not fit an `i64` are rejected.
pub fn to_minor_units(amount: f64, precision: u8) -> Result<i64, TrackerError> {
    let scaled = (amount * scale(precision)).round();
    if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
        return Err(TrackerError::AmountOutOfRange(amount.to_string()));
    }
    Ok(scaled as i64)
}

pub fn from_minor_units(minor: i64, precision: u8) -> f64 {
    minor as f64 / scale(precision)
}

/// Sums amounts in minor units so the result is exact to the smallest unit
/// and independent of iteration order. Fails instead of saturating.
pub fn sum_amounts<I>(amounts: I, precision: u8) -> Result<f64, TrackerError>
where
    I: IntoIterator<Item = f64>,
{
    let mut total: i128 = 0;
    for amount in amounts {
        total += i128::from(to_minor_units(amount, precision)?);
    }
    let total = i64::try_from(total)
        .map_err(|_| TrackerError::AmountOutOfRange("total exceeds the supported range".into()))?;
    Ok(from_minor_units(total, precision))
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let grouped = group_digits(int_part, locale.grouping_separator);
    match frac_part {
        Some(frac) => format!("{}{}{}", grouped, locale.decimal_separator, frac),
        None => grouped,
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    format!("{}{}", sign, grouped)
}

pub fn format_currency_value(
    amount: f64,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    options: &FormatOptions,
) -> String {
    let precision = code.minor_units();
    let mut body = format_number(locale, amount.abs(), precision);
    let negative = (amount * scale(precision)).round() < 0.0;
    if negative && options.negative_style == NegativeStyle::Parentheses {
        body = format!("({})", body);
    }
    let formatted = match options.currency_display {
        CurrencyDisplay::Symbol => format!("{}{}", symbol_for(code.as_str()), body),
        CurrencyDisplay::Code => format!("{} {}", code.as_str(), body),
    };
    if negative && options.negative_style == NegativeStyle::Sign {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    match locale.date_format {
        DateFormatStyle::Short => date.format("%Y-%m-%d").to_string(),
        DateFormatStyle::Medium => format!(
            "{} {}, {}",
            month_label(date.month()),
            date.day(),
            date.year()
        ),
        DateFormatStyle::Long => date.format("%A, %B %-d, %Y").to_string(),
    }
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_is_exact_to_the_cent() {
        let total = sum_amounts(vec![0.1, 0.2, 0.3], 2).unwrap();
        assert_eq!(total, 0.6);
        assert_eq!(to_minor_units(total, 2).unwrap(), 60);
    }

    #[test]
    fn huge_values_are_errors_not_saturated() {
        assert!(matches!(
            to_minor_units(1e17, 2),
            Err(TrackerError::AmountOutOfRange(_))
        ));
        assert!(sum_amounts(vec![6e16, 6e16], 2).is_err());
        assert!(sum_amounts(vec![9.0e16; 2], 0).is_ok());
    }

    #[test]
    fn amounts_must_fit_the_currency() {
        assert_eq!(validate_amount(12.5, 2), Ok(()));
        assert_eq!(validate_amount(999_999_999.99, 2), Ok(()));
        assert_eq!(validate_amount(MAX_AMOUNT, 0), Ok(()));
        assert_eq!(validate_amount(0.0, 2), Err(AmountError::NotPositive));
        assert_eq!(validate_amount(f64::NAN, 2), Err(AmountError::NotPositive));
        assert_eq!(validate_amount(1e17, 2), Err(AmountError::TooLarge));
        assert_eq!(validate_amount(0.001, 2), Err(AmountError::TooPrecise(2)));
        assert_eq!(validate_amount(12.5, 0), Err(AmountError::Fractional));
        assert_eq!(validate_amount(0.125, 3), Ok(()));
    }

    #[test]
    fn groups_thousands() {
        let locale = LocaleConfig::default();
        assert_eq!(format_number(&locale, 1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(&locale, 12.5, 2), "12.50");
        assert_eq!(format_number(&locale, 999.0, 0), "999");
    }

    #[test]
    fn unknown_locale_is_rejected() {
        assert!(LocaleConfig::for_tag("xx-YY").is_err());
        let german = LocaleConfig::for_tag("de-DE").unwrap();
        assert_eq!(german.decimal_separator, ',');
    }
}

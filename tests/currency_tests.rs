use chrono::NaiveDate;
use expense_tracker::currency::{
    format_currency_value, format_date, sum_amounts, CurrencyCode, CurrencyDisplay,
    DateFormatStyle, DisplayFormat, FormatOptions, LocaleConfig, NegativeStyle,
};

#[test]
fn formats_currency_with_locale() {
    let locale = LocaleConfig::for_tag("fr-FR").unwrap();
    let options = FormatOptions {
        currency_display: CurrencyDisplay::Symbol,
        negative_style: NegativeStyle::Parentheses,
    };
    let formatted = format_currency_value(-1234.5, &CurrencyCode::new("EUR"), &locale, &options);
    assert_eq!(formatted, "€(1 234,50)");
}

#[test]
fn default_format_is_us_dollars() {
    let format = DisplayFormat::default();
    assert_eq!(format.amount(1234.5), "$1,234.50");
    assert_eq!(format.amount(12.5), "$12.50");
    assert_eq!(
        format.date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
        "Jan 15, 2024"
    );
}

#[test]
fn code_display_and_zero_decimal_currency() {
    let options = FormatOptions {
        currency_display: CurrencyDisplay::Code,
        negative_style: NegativeStyle::Sign,
    };
    let formatted = format_currency_value(
        1500.0,
        &CurrencyCode::new("jpy"),
        &LocaleConfig::default(),
        &options,
    );
    assert_eq!(formatted, "JPY 1,500");
}

#[test]
fn short_and_long_dates() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let mut locale = LocaleConfig::default();
    locale.date_format = DateFormatStyle::Short;
    assert_eq!(format_date(&locale, date), "2024-01-15");
    locale.date_format = DateFormatStyle::Long;
    assert_eq!(format_date(&locale, date), "Monday, January 15, 2024");
}

#[test]
fn minor_unit_sums_do_not_drift() {
    let amounts = vec![0.1; 10];
    assert_eq!(sum_amounts(amounts, 2).unwrap(), 1.0);
    assert_eq!(sum_amounts(Vec::<f64>::new(), 2).unwrap(), 0.0);
    assert!(sum_amounts(vec![6e16, 6e16], 2).is_err());
}

#[test]
fn unknown_locale_is_rejected() {
    assert!(LocaleConfig::for_tag("xx-XX").is_err());
}

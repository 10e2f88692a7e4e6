//! Display formatting for prices, timestamps and card text.
//!
//! These are pure functions used by every card and table in the front end.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency glyph prefixed to formatted amounts.
pub const CURRENCY_SIGN: &str = "₦";

/// Rendered when a timestamp cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Fraction digits kept by [`format_currency`].
const MAX_FRACTION_DIGITS: u32 = 3;

/// Format an amount with thousands separators and the currency glyph.
///
/// At most three fraction digits are kept (rounded half away from zero) and
/// trailing zeros are dropped, so `1500.50` renders as `₦1,500.5`.
///
/// ```
/// use serenity_core::format_currency;
///
/// assert_eq!(format_currency(1_234_567, false), "₦1,234,567");
/// assert_eq!(format_currency(0, true), "0");
/// ```
#[must_use]
pub fn format_currency(amount: impl Into<Decimal>, no_sign: bool) -> String {
    let rounded = amount
        .into()
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + 8);
    if negative {
        out.push('-');
    }
    if !no_sign {
        out.push_str(CURRENCY_SIGN);
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an ISO-8601 timestamp as `DD/MM/YY HH:MM:SSam|pm`.
///
/// Empty input gives an empty string. Timestamps carrying an offset are shown
/// in that offset; unparseable input renders as `Invalid Date`.
///
/// ```
/// use serenity_core::format_timestamp;
///
/// assert_eq!(format_timestamp(""), "");
/// assert_eq!(format_timestamp("2024-03-05T13:05:09Z"), "05/03/24 01:05:09pm");
/// ```
#[must_use]
pub fn format_timestamp(iso: &str) -> String {
    let iso = iso.trim();
    if iso.is_empty() {
        return String::new();
    }

    parse_local(iso).map_or_else(
        || INVALID_DATE.to_owned(),
        |dt| dt.format("%d/%m/%y %I:%M:%S%P").to_string(),
    )
}

/// Format an ISO-8601 timestamp as a short date, e.g. `05 Mar 2024`.
///
/// Used on blog cards. Same empty/invalid handling as [`format_timestamp`].
#[must_use]
pub fn format_date(iso: &str) -> String {
    let iso = iso.trim();
    if iso.is_empty() {
        return String::new();
    }

    parse_local(iso).map_or_else(
        || INVALID_DATE.to_owned(),
        |dt| dt.format("%d %b %Y").to_string(),
    )
}

fn parse_local(iso: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(dt.naive_local());
    }

    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(iso, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Shorten text to at most `max_chars` characters, cutting at a word
/// boundary and appending an ellipsis.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let cut: String = text.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => cut.get(..idx).unwrap_or(&cut),
        _ => cut.as_str(),
    };
    format!("{}…", trimmed.trim_end_matches(|c: char| c.is_whitespace() || c == ',' || c == '.'))
}

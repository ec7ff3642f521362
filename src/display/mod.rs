//! Shared formatting for terminal output.

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp};
use owo_colors::{OwoColorize, Stream};

use crate::api::types::Price;
use crate::error::{Result, RouteWiseError};

/// Format an ISO-8601 duration for display.
///
/// Unparseable values fall back to the raw text with the `PT` prefix
/// removed and lowercased.
///
/// # Examples
///
/// ```
/// use routewise::display::format_duration;
///
/// assert_eq!(format_duration("PT2H30M"), "2h 30m");
/// assert_eq!(format_duration("PT45M"), "45m");
/// assert_eq!(format_duration("P1DT3H"), "1d 3h");
/// assert_eq!(format_duration("PTsoon"), "soon");
/// ```
pub fn format_duration(iso: &str) -> String {
    let Ok(span) = iso.trim().parse::<Span>() else {
        return iso.replace("PT", "").to_lowercase();
    };

    let mut parts = Vec::new();
    if span.get_days() != 0 {
        parts.push(format!("{}d", span.get_days()));
    }
    if span.get_hours() != 0 {
        parts.push(format!("{}h", span.get_hours()));
    }
    if span.get_minutes() != 0 {
        parts.push(format!("{}m", span.get_minutes()));
    }
    if parts.is_empty() {
        return "0m".to_string();
    }
    parts.join(" ")
}

/// Date part of an ISO timestamp such as `2025-06-01T10:30:00`.
///
/// ```
/// use routewise::display::date_part;
///
/// assert_eq!(date_part("2025-06-01T10:30:00"), "2025-06-01");
/// assert_eq!(date_part("2025-06-01"), "2025-06-01");
/// ```
pub fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// Today's calendar date in UTC.
pub fn today() -> Date {
    Timestamp::now().to_zoned(TimeZone::UTC).date()
}

/// `from` plus `offset_days` calendar days.
pub fn departure_date(from: Date, offset_days: u32) -> Result<Date> {
    let span = Span::new()
        .try_days(i64::from(offset_days))
        .map_err(|e| RouteWiseError::Config(format!("invalid departure offset: {e}")))?;
    from.checked_add(span)
        .map_err(|e| RouteWiseError::Config(format!("invalid departure offset: {e}")))
}

/// `"<total> <currency>"`, or `None` without a total.
pub fn format_price(price: Option<&Price>) -> Option<String> {
    let price = price?;
    let total = price.total.as_deref()?;
    Some(match price.currency.as_deref() {
        Some(currency) => format!("{total} {currency}"),
        None => total.to_string(),
    })
}

/// Five-star rating, filled up to `rating`.
///
/// ```
/// use routewise::display::stars;
///
/// assert_eq!(stars(4), "★★★★☆");
/// ```
pub fn stars(rating: u8) -> String {
    (0..5u8)
        .map(|i| if i < rating { '★' } else { '☆' })
        .collect()
}

/// First character of a name, uppercased, for card badges.
pub fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

pub fn heading(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.bold())
        .to_string()
}

pub fn accent(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.magenta())
        .to_string()
}

pub fn code(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.cyan())
        .to_string()
}

pub fn muted(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.dimmed())
        .to_string()
}

pub fn success(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.green())
        .to_string()
}

pub fn failure(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.red())
        .to_string()
}

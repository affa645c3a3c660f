use num_format::{Locale, ToFormattedString};
use time::{macros::format_description, OffsetDateTime};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Format a duration in seconds as `"{days}d {hours}h {minutes}m"`.
///
/// Negative durations are formatted as zero.
pub fn time_left(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let days = seconds / SECONDS_PER_DAY;
    let hours = (seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    format!("{days}d {hours}h {minutes}m")
}

/// Format a unix timestamp as `"Mon DD YYYY"` in UTC.
pub fn expiration_date(unix: i64) -> crate::Result<String> {
    let datetime = OffsetDateTime::from_unix_timestamp(unix).map_err(crate::Error::custom)?;
    datetime
        .format(format_description!("[month repr:short] [day] [year]"))
        .map_err(crate::Error::custom)
}

/// Format a USD price.
///
/// Two decimals are used for prices of at least `0.1`, otherwise `decimals`.
pub fn pretty_price(price: f64, decimals: usize) -> String {
    let decimals = if price >= 0.1 { 2 } else { decimals };
    let formatted = format!("{price:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };
    let grouped = digits
        .parse::<u64>()
        .map(|value| value.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| digits.to_string());
    match frac_part {
        Some(frac_part) => format!("{sign}${grouped}.{frac_part}"),
        None => format!("{sign}${grouped}"),
    }
}

/// Convert an atomic strike per lot into a USD price per base token.
///
/// `strike / (10^quote_decimals * lot_size) * 10^base_decimals`
pub fn strike_in_usd(strike: u64, lot_size: u64, quote_decimals: u8, base_decimals: u8) -> f64 {
    strike as f64 / (10f64.powi(quote_decimals.into()) * lot_size as f64)
        * 10f64.powi(base_decimals.into())
}

/// Convert a raw amount into base units.
pub fn ui_amount(amount: u64, decimals: u8) -> f64 {
    amount as f64 / 10f64.powi(decimals.into())
}

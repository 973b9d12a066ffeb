//! Date rendering for dictionary values.
//!
//! Format strings use the tokens `yyyy`, `MM`, `DD`, `mm`, `dd`, `m`, `d`
//! (longest first at each position) and the weekday marker `(w)`. `MM`/`DD`
//! are always zero-padded and `m`/`d` never are; `mm`/`dd` are padded only
//! in ISO-like formats, i.e. ones starting with `yyyy-` that contain both.

use chrono::{Datelike, Days, NaiveDate};

use crate::config::ConfigError;

const TOKENS: [&str; 7] = ["yyyy", "MM", "DD", "mm", "dd", "m", "d"];

/// Monday first.
pub const WEEKDAYS_JA: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

pub fn render(date: NaiveDate, format: &str) -> String {
    let iso_like = format.starts_with("yyyy-") && format.contains("mm") && format.contains("dd");
    let (month, day) = (date.month(), date.day());

    let mut out = String::with_capacity(format.len() + 8);
    let mut rest = format;
    while let Some(ch) = rest.chars().next() {
        match TOKENS.iter().find(|t| rest.starts_with(*t)) {
            Some(token) => {
                let text = match *token {
                    "yyyy" => format!("{:04}", date.year()),
                    "MM" => format!("{month:02}"),
                    "DD" => format!("{day:02}"),
                    "mm" if iso_like => format!("{month:02}"),
                    "dd" if iso_like => format!("{day:02}"),
                    "mm" | "m" => month.to_string(),
                    _ => day.to_string(),
                };
                out.push_str(&text);
                rest = &rest[token.len()..];
            }
            None => {
                out.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    if out.contains("(w)") {
        let weekday = WEEKDAYS_JA[date.weekday().num_days_from_monday() as usize];
        out = out.replace("(w)", &format!("({weekday})"));
    }
    out
}

/// `today` shifted by `offset_days`, or `None` past chrono's calendar range.
pub fn shift_days(today: NaiveDate, offset_days: i64) -> Option<NaiveDate> {
    let days = Days::new(offset_days.unsigned_abs());
    if offset_days >= 0 {
        today.checked_add_days(days)
    } else {
        today.checked_sub_days(days)
    }
}

/// Every format rendered for `today + offset_days`, duplicates dropped.
pub fn values_for_day(
    today: NaiveDate,
    offset_days: i64,
    formats: &[String],
) -> Result<Vec<String>, ConfigError> {
    let date = shift_days(today, offset_days).ok_or(ConfigError::OffsetOutOfRange { offset_days })?;
    let mut values: Vec<String> = Vec::with_capacity(formats.len());
    for format in formats {
        let value = render(date, format);
        if !values.contains(&value) {
            values.push(value);
        }
    }
    Ok(values)
}

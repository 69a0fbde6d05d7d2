//! `YYYY-MM-DD` dates as the backend exchanges them.
//!
//! Usable with `#[serde(with = "crate::dates")]`. Deserialization also accepts
//! full ISO timestamps (`2024-05-01T00:00:00.000Z`) and keeps the day part.

use serde::{Deserialize, Deserializer, Serializer};
use time::{format_description::FormatItem, macros::format_description, Date};

use crate::error::{ClientError, ClientResult};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}

pub fn parse_date(text: &str) -> ClientResult<Date> {
    let day = text.split('T').next().unwrap_or(text);
    Date::parse(day, DATE_FORMAT)
        .map_err(|e| ClientError::Validation(vec![format!("invalid date {text:?}: {e}")]))
}

pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(*date))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_date(&text).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_date(date!(2024 - 03 - 07)), "2024-03-07");
    }

    #[test]
    fn parses_plain_day_and_timestamp() {
        assert_eq!(parse_date("2024-05-01").unwrap(), date!(2024 - 05 - 01));
        assert_eq!(
            parse_date("2024-05-01T00:00:00.000Z").unwrap(),
            date!(2024 - 05 - 01)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("01/05/2024").is_err());
    }
}

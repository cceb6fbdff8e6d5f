//! SEARCH date validation (`D-Mon-YYYY`).

use chrono::{Datelike, Local, NaiveDate};

use crate::{Error, Result};

const FORMAT: &str = "%d-%b-%Y";

/// Checks that `value` is a real date in `D-Mon-YYYY` form, e.g. `2-Nov-2024`.
///
/// # Errors
///
/// Returns [`Error::WrongDateFormat`] with an example date otherwise.
pub fn check_date(value: &str) -> Result<()> {
    if has_date_shape(value) && NaiveDate::parse_from_str(value, FORMAT).is_ok() {
        Ok(())
    } else {
        Err(Error::WrongDateFormat {
            value: value.to_string(),
            example: example(),
        })
    }
}

/// A value accepted as a SEARCH date.
pub trait DateValue {
    /// Returns the date in `D-Mon-YYYY` form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongDateFormat`] if the value is not such a date.
    fn to_search_date(&self) -> Result<String>;
}

impl DateValue for &str {
    fn to_search_date(&self) -> Result<String> {
        check_date(self)?;
        Ok((*self).to_string())
    }
}

impl DateValue for String {
    fn to_search_date(&self) -> Result<String> {
        self.as_str().to_search_date()
    }
}

impl DateValue for NaiveDate {
    fn to_search_date(&self) -> Result<String> {
        Ok(format_date(*self))
    }
}

/// Formats a date the way SEARCH expects it.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    format!("{}-{}", date.day(), date.format("%b-%Y"))
}

fn example() -> String {
    format!("2-Nov-{}", Local::now().year())
}

/// One or two day digits, a three-letter month and a four-digit year.
fn has_date_shape(value: &str) -> bool {
    let mut parts = value.split('-');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    (1..=2).contains(&day.len())
        && day.bytes().all(|b| b.is_ascii_digit())
        && month.len() == 3
        && month.bytes().all(|b| b.is_ascii_alphabetic())
        && year.len() == 4
        && year.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn accepted_dates() {
        for value in ["1-Jan-2023", "31-Dec-2023", "02-Nov-2024", "29-Feb-2024"] {
            assert!(check_date(value).is_ok(), "{value} should be accepted");
        }
    }

    #[test]
    fn rejected_dates() {
        for value in [
            "2023-01-01",
            "invalid",
            "",
            "1-January-2023",
            "32-Jan-2023",
            "29-Feb-2023",
            "1-Jan-23",
            "1-Foo-2023",
            "1 Jan 2023",
        ] {
            assert!(
                matches!(check_date(value), Err(Error::WrongDateFormat { .. })),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn example_uses_current_year() {
        let Err(Error::WrongDateFormat { example, .. }) = check_date("invalid") else {
            panic!("expected WrongDateFormat");
        };
        assert_eq!(example, format!("2-Nov-{}", Local::now().year()));
    }

    #[test]
    fn format_date_has_no_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();
        assert_eq!(format_date(date), "2-Nov-2024");
        assert!(check_date(&format_date(date)).is_ok());
    }
}

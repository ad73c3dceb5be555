//! Fixed string formats shared with the search layer's queries.

use chrono::{NaiveDate, NaiveDateTime};

/// Format for creation and modification instants: `MM-DD-YYYY:HH:MM:SS`.
pub const INSTANT_FORMAT: &str = "%m-%d-%Y:%H:%M:%S";

/// Format for release dates: `MM-DD-YYYY`.
pub const DATE_FORMAT: &str = "%m-%d-%Y";

pub fn format_instant(instant: &NaiveDateTime) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_instant() {
        let instant = NaiveDate::from_ymd_opt(2021, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap();
        assert_eq!(format_instant(&instant), "03-05-2021:14:07:09");
    }

    #[test]
    fn test_format_instant_midnight() {
        let instant = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(format_instant(&instant), "12-31-1999:00:00:00");
    }

    #[test]
    fn test_format_date_has_no_time() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 5).unwrap();
        assert_eq!(format_date(&date), "03-05-2021");
    }
}

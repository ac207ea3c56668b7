use chrono::{DateTime, Local, NaiveDate, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[must_use]
pub fn format_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Two-digit zero padding, wider values kept intact.
#[must_use]
pub fn pad2(value: i64) -> String {
    format!("{value:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad2_pads_single_digits_only() {
        assert_eq!(pad2(0), "00");
        assert_eq!(pad2(7), "07");
        assert_eq!(pad2(42), "42");
        assert_eq!(pad2(365), "365");
    }

    #[test]
    fn format_date_is_iso() {
        let d = NaiveDate::from_ymd_opt(2025, 8, 7).unwrap();
        assert_eq!(format_date(d), "2025-08-07");
    }
}

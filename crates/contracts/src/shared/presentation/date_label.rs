use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an x-axis value as a UTC timestamp; a bare date is read as midnight.
pub fn parse_axis_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse the calendar day of an x-axis value, if it is a date or timestamp.
pub fn parse_axis_date(s: &str) -> Option<NaiveDate> {
    parse_axis_timestamp(s).map(|dt| dt.date())
}

/// Short x-axis label, e.g. `"2024-01-05"` -> `"Jan 05"`.
///
/// Anything that does not parse as a date is returned unchanged.
pub fn format_x_axis_date_label(s: &str) -> String {
    match parse_axis_date(s) {
        Some(date) => date.format("%b %d").to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dates() {
        assert_eq!(format_x_axis_date_label("2024-01-05"), "Jan 05");
        assert_eq!(format_x_axis_date_label("2024-03-15T14:02:26.123Z"), "Mar 15");
        assert_eq!(format_x_axis_date_label("2024-12-31T23:59:59+00:00"), "Dec 31");
        assert_eq!(format_x_axis_date_label("2024-07-04 08:30:00"), "Jul 04");
        assert_eq!(format_x_axis_date_label("2024-07-04T08:30"), "Jul 04");
    }

    #[test]
    fn test_offset_timestamps_use_utc_day() {
        assert_eq!(format_x_axis_date_label("2024-01-05T23:30:00-02:00"), "Jan 06");
    }

    #[test]
    fn test_passthrough_on_unparseable() {
        assert_eq!(format_x_axis_date_label("W02"), "W02");
        assert_eq!(format_x_axis_date_label("HEL"), "HEL");
        assert_eq!(format_x_axis_date_label(""), "");
        assert_eq!(format_x_axis_date_label("2024-13-45"), "2024-13-45");
    }

    #[test]
    fn test_timestamps_keep_time_of_day() {
        let morning = parse_axis_timestamp("2024-01-05T08:00:00Z").unwrap();
        let noon = parse_axis_timestamp("2024-01-05T12:00:00Z").unwrap();
        assert!(morning < noon);
        assert_eq!(morning.date(), noon.date());
        assert_eq!(
            parse_axis_timestamp("2024-01-05"),
            parse_axis_timestamp("2024-01-05T00:00:00Z")
        );
        assert_eq!(parse_axis_timestamp("W01"), None);
    }
}

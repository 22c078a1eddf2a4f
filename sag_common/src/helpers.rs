use chrono::{DateTime, Datelike, Utc};

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September", "October", "November",
    "December",
];

/// Formats a timestamp as the full date string shown on order cards, e.g. `7 August 2026`.
pub fn full_date(timestamp: DateTime<Utc>) -> String {
    let month = MONTHS[timestamp.month0() as usize];
    format!("{} {} {}", timestamp.day(), month, timestamp.year())
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn boolean_flags() {
        assert!(parse_boolean_flag(Some("1".into()), false));
        assert!(parse_boolean_flag(Some(" Yes ".into()), false));
        assert!(!parse_boolean_flag(Some("off".into()), true));
        assert!(parse_boolean_flag(None, true));
        assert!(!parse_boolean_flag(Some("whatever".into()), false));
    }

    #[test]
    fn full_date_formatting() {
        let ts = Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap();
        assert_eq!(full_date(ts), "29 February 2024");
        let ts = Utc.with_ymd_and_hms(2026, 8, 7, 0, 0, 0).unwrap();
        assert_eq!(full_date(ts), "7 August 2026");
    }
}

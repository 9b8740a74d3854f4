use chrono::NaiveDate;

/// Parse a feed date into a `NaiveDate`, trying the formats our sources emit.
///
/// `YYYY-MM-DD` is the documented input format; the others cover feeds that
/// publish RFC3339 timestamps or human-readable dates ("Jan 24, 2024").
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(date_str) {
        return Some(datetime.date_naive());
    }

    if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime.date());
    }

    if let Ok(datetime) = chrono::DateTime::parse_from_rfc2822(date_str) {
        return Some(datetime.date_naive());
    }

    let formats = [
        "%Y/%m/%d",  // 2024/01/24
        "%b %d, %Y", // Jan 24, 2024
        "%B %d, %Y", // January 24, 2024
        "%d %B %Y",  // 24 January 2024
    ];

    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_str, format).ok())
}

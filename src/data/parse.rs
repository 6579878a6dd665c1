use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%b %d, %Y", "%d %b %Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a numeric field that may carry thousands separators and padding,
/// e.g. `" 1,234.56 "`. Non-finite results are treated as unparseable.
pub fn parse_price_field(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a calendar date in any of the common export layouts. Date-times are
/// accepted and truncated to their date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_field_strips_separators_and_whitespace() {
        assert_eq!(parse_price_field("1,234.56"), Some(1234.56));
        assert_eq!(parse_price_field("  42 "), Some(42.0));
        assert_eq!(parse_price_field("1,000,000"), Some(1_000_000.0));
    }

    #[test]
    fn price_field_rejects_garbage() {
        assert_eq!(parse_price_field(""), None);
        assert_eq!(parse_price_field("   "), None);
        assert_eq!(parse_price_field("n/a"), None);
        assert_eq!(parse_price_field("NaN"), None);
        assert_eq!(parse_price_field("inf"), None);
        assert_eq!(parse_price_field("12.3K"), None);
    }

    #[test]
    fn calendar_date_accepts_common_layouts() {
        let want = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(parse_calendar_date("2024-01-02"), Some(want));
        assert_eq!(parse_calendar_date(" 2024/01/02 "), Some(want));
        assert_eq!(parse_calendar_date("01/02/2024"), Some(want));
        assert_eq!(parse_calendar_date("Jan 02, 2024"), Some(want));
        assert_eq!(parse_calendar_date("2024-01-02 00:00:00"), Some(want));
        assert_eq!(parse_calendar_date("2024-01-02T09:30:00Z"), Some(want));
    }

    #[test]
    fn calendar_date_rejects_garbage() {
        assert_eq!(parse_calendar_date("not-a-date"), None);
        assert_eq!(parse_calendar_date("2024-13-01"), None);
        assert_eq!(parse_calendar_date(""), None);
    }
}

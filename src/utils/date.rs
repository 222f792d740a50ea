use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Accepts `YYYY-MM-DD` or the keyword `today`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.eq_ignore_ascii_case("today") {
        return Some(today());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

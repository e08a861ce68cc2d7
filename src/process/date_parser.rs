use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Date layout of the salary list, e.g. `15-Jan-2020`.
pub const LIST_DATE_FORMAT: &str = "%d-%b-%Y";

// chrono's %Y also takes short years ("20" → year 20), so the shape is checked first
static LIST_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}-[A-Za-z]{3}-\d{4}$").unwrap());

/// Parse `"DD-Mon-YYYY"` → calendar date; anything else → `None`.
pub fn parse_list_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if !LIST_DATE_RE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, LIST_DATE_FORMAT).ok()
}

/// `num_days_from_ce()` of 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since the Unix epoch, the Arrow `Date32` encoding.
pub fn to_date32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

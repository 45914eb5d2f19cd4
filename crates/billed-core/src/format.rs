//! Display formatting for bill dates and statuses.

use chrono::{Datelike, NaiveDate};

use crate::bill::BillStatus;

const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Parse the calendar day of a stored bill date.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time part
/// (`2004-04-04T10:00:00Z`, `2004-04-04 10:00`).
pub fn parse_bill_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10)?;
    let rest = raw.get(10..)?;
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Format a stored date as `4 Avr. 04`.
///
/// Input that is not a date is returned as-is so a corrupted record still
/// shows up in the list.
pub fn format_date(raw: &str) -> String {
    match parse_bill_date(raw) {
        Some(date) => format!(
            "{} {}. {:02}",
            date.day(),
            MONTHS[date.month0() as usize],
            date.year().rem_euclid(100)
        ),
        None => raw.to_string(),
    }
}

pub fn format_status(status: &BillStatus) -> String {
    status.display_name().to_string()
}

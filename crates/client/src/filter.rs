use api_types::Entry;
use chrono::Datelike;

/// Whether `entry` is dated within `month` (1-12) of `year`.
///
/// Entries without a `DD/MM/YYYY` date never match.
pub fn in_month(entry: &Entry, month: u32, year: i32) -> bool {
    entry
        .parsed_date()
        .is_some_and(|date| date.month() == month && date.year() == year)
}

/// Entries dated within `month` of `year`, in their original order.
pub fn select_by_month_year(entries: &[Entry], month: u32, year: i32) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| in_month(entry, month, year))
        .cloned()
        .collect()
}

use chrono::NaiveDate;

/// True when `date` is today or later.
///
/// Both sides are plain calendar dates, so the comparison is between local
/// midnights. A string that is not a real calendar date (`2025-02-30`) fails.
pub fn check_date(date: &str, today: NaiveDate) -> bool {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(booking_date) => booking_date >= today,
        Err(_) => false,
    }
}

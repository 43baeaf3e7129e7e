//! Date conversion between the menu's display form and storage form.

use chrono::NaiveDate;

/// Format users type dates in.
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";
/// Format the store persists dates in.
pub const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";
/// Human hint for `DISPLAY_DATE_FORMAT`.
pub const DISPLAY_DATE_HINT: &str = "DD-MM-YYYY";

/// Parses a `DD-MM-YYYY` input into ISO `YYYY-MM-DD`.
///
/// Returns `None` for anything that is not a real calendar date.
pub fn to_storage_date(input: &str) -> Option<String> {
    NaiveDate::parse_from_str(input.trim(), DISPLAY_DATE_FORMAT)
        .ok()
        .map(|date| date.format(STORAGE_DATE_FORMAT).to_string())
}

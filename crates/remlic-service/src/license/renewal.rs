//! Renewal date input handling.

use chrono::NaiveDate;

use remlic_core::error::AppError;

const MAX_DIGITS: usize = 8;

/// Insert dashes into typed digits as `YYYY-MM-DD`.
///
/// Non-digits are dropped. Returns `None` when more than eight digits were
/// typed, meaning the keystroke should be rejected.
pub fn auto_dash(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() > MAX_DIGITS {
        return None;
    }

    let mut formatted = String::with_capacity(10);
    for (i, c) in digits.chars().enumerate() {
        if i == 4 || i == 6 {
            formatted.push('-');
        }
        formatted.push(c);
    }
    Some(formatted)
}

/// Parse a renewal date. The text must be exactly `YYYY-MM-DD` and name a
/// real calendar day.
pub fn parse_renewal_date(input: &str) -> Result<NaiveDate, AppError> {
    let input = input.trim();
    let well_formed = input.len() == 10
        && input.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });

    if !well_formed {
        return Err(AppError::validation(
            "Expiry date must be in YYYY-MM-DD format",
        ));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("'{input}' is not a valid calendar date")))
}

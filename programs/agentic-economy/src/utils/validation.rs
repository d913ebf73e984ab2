//! Input validation utilities for the agentic economy engine

use crate::errors::{EconomyError, Result};

/// Validates that a string contains only printable ASCII characters.
///
/// # Returns
/// * `true` if the string contains only ASCII graphic characters or spaces
/// * `false` if the string contains control characters or non-ASCII bytes
///
/// # Examples
/// ```
/// use agentic_economy::utils::validation::validate_string_input;
///
/// assert!(validate_string_input("mock://delivery/{\"ok\":true}"));
/// assert!(validate_string_input("Research Agent"));
/// assert!(!validate_string_input("hello\x00world"));
/// assert!(!validate_string_input("hello\nworld"));
/// ```
pub fn validate_string_input(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_graphic() || c == ' ')
}

/// Required, printable, bounded text field
pub fn require_text(value: &str, max_len: usize, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EconomyError::InvalidInput(field));
    }
    require_optional_text(value, max_len, field)
}

/// Printable, bounded text field that may be empty
pub fn require_optional_text(value: &str, max_len: usize, field: &'static str) -> Result<()> {
    if value.len() > max_len {
        return Err(EconomyError::OutOfRange {
            field,
            value: value.len() as u128,
            min: 0,
            max: max_len as u128,
        });
    }
    if !validate_string_input(value) {
        return Err(EconomyError::InvalidInput(field));
    }
    Ok(())
}

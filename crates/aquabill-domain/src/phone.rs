//! Phone number canonicalization.
//!
//! Every boundary that accepts a phone number runs it through [`normalize`]
//! before lookups or writes, so the store only ever sees one spelling of a
//! number: `+` followed by digits.

/// Minimum digit count for a valid subscriber number.
pub const MIN_PHONE_DIGITS: usize = 9;

/// Maximum digit count (E.164 upper bound).
pub const MAX_PHONE_DIGITS: usize = 15;

/// Canonicalize a phone number to international form.
///
/// Strips every non-digit character (spaces, dashes, parentheses, a leading
/// `+`) and prefixes `+`. Returns `None` when no digits remain.
///
/// ```
/// use aquabill_domain::phone::normalize;
/// assert_eq!(normalize("675 799 750").as_deref(), Some("+675799750"));
/// assert_eq!(normalize("(675) 799-752").as_deref(), Some("+675799752"));
/// assert_eq!(normalize("+675799749").as_deref(), Some("+675799749"));
/// assert_eq!(normalize("no digits"), None);
/// ```
pub fn normalize(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(format!("+{digits}"))
}

/// Check the digit count of a (possibly already normalized) number.
pub fn has_valid_length(phone: &str) -> bool {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

/// Normalize and length-check in one step. `None` means the input is not a
/// usable phone number.
pub fn canonicalize(phone: &str) -> Option<String> {
    let normalized = normalize(phone)?;
    has_valid_length(&normalized).then_some(normalized)
}

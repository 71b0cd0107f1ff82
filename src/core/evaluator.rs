//! Answer checking
//!
//! Exact match after trimming and case folding. There is no partial credit.

/// Whether `user_text` names `expected_label`
pub fn evaluate(user_text: &str, expected_label: &str) -> bool {
    let answer = user_text.trim().to_lowercase();
    !answer.is_empty() && answer == expected_label.trim().to_lowercase()
}

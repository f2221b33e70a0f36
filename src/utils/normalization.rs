//! Token normalization for column value matching
//!
//! Board values arrive with stray whitespace, mixed case and the odd
//! full-width spelling; configured token sets must match all of them.

use unicode_normalization::UnicodeNormalization;

/// Trims, applies NFKC and lowercases
///
/// # Exemplos
/// ```
/// use taskpurge_monitor::utils::normalization::normalize_token;
///
/// assert_eq!(normalize_token("  Critical "), "critical");
/// assert_eq!(normalize_token("ＨＩＧＨ"), "high");
/// assert_eq!(normalize_token("緊急"), "緊急");
/// ```
pub fn normalize_token(input: &str) -> String {
    input.trim().nfkc().collect::<String>().to_lowercase()
}

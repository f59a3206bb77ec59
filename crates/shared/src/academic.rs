//! Academic-discount eligibility rule
//!
//! Eligibility is a fixed email-domain heuristic: addresses ending in `.edu`
//! or containing `.ac.` (e.g. `alice@cs.ox.ac.uk`) qualify for a flat 50%
//! discount. The rule is evaluated once at registration and stored on the
//! user record.

/// Flat discount applied to academic accounts, in percent.
pub const ACADEMIC_DISCOUNT_PERCENT: f32 = 50.0;

/// Whether an email address qualifies for the academic discount.
pub fn is_academic_email(email: &str) -> bool {
    let email = email.to_ascii_lowercase();
    email.ends_with(".edu") || email.contains(".ac.")
}

/// Discount percentage for an email address: 50 for academic, 0 otherwise.
pub fn academic_discount_percentage(email: &str) -> f32 {
    if is_academic_email(email) {
        ACADEMIC_DISCOUNT_PERCENT
    } else {
        0.0
    }
}

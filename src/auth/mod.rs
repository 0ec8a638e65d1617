//! Auth endpoints consumed by the console: registration, email verification and
//! email change. Only the request shapes live here; the verification lifecycle
//! is owned by [`crate::verification`].

pub mod client;
pub mod types;

use regex::Regex;

/// Loose shape check run before any network call.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email.trim()))
}

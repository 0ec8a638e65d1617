//! # hadith-console
//!
//! Terminal client for the Hadith API account dashboard. The dashboard itself is
//! a thin layer over the remote REST backend (`/auth/*`, `/billing/*`, `/keys/*`,
//! `/analytics/*`); the part that carries real client-side state is the email
//! verification challenge, which lives in [`verification`].
//!
//! ## Email Verification
//!
//! After registration or an email-change request the backend mails a 6-digit
//! code. The client then owns a short-lived challenge:
//!
//! - **Entry:** digits are typed one slot at a time or pasted; a complete code is
//!   submitted automatically, once.
//! - **Expiry:** the code is valid for 15 minutes. When the local countdown runs
//!   out, or the backend reports `CODE_EXPIRED`, submissions are refused until a
//!   new code is requested.
//! - **Resend:** requesting a new code resets expiry and attempts, then blocks
//!   further resends for 60 seconds.
//! - **Attempts:** the backend reports how many wrong submissions remain. The
//!   client mirrors the count and never enforces a lockout on its own.
//!
//! Verification codes, passwords and session cookies are never logged.

pub mod api;
pub mod auth;
pub mod cli;
pub mod notify;
pub mod verification;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}

use super::code::{CodeBuffer, CODE_LENGTH};
use std::fmt;

/// Lifetime of an issued code (15 minutes).
pub const CODE_TTL_SECONDS: u32 = 15 * 60;
/// Wrong submissions the backend allows per issued code.
pub const MAX_ATTEMPTS: u32 = 3;
/// Minimum wait between two resend requests.
pub const RESEND_COOLDOWN_SECONDS: u32 = 60;
/// Below this many seconds the countdown is shown as a warning.
pub const EXPIRY_WARNING_SECONDS: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Pending,
    Verifying,
    Succeeded,
    Failed,
    Expired,
}

impl fmt::Display for Status {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Pending => "pending",
            Status::Verifying => "verifying",
            Status::Succeeded => "succeeded",
            Status::Failed => "failed",
            Status::Expired => "expired",
        };
        formatter.write_str(label)
    }
}

/// One issued code and everything the user has done with it so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    pub(crate) target_email: String,
    pub(crate) code: CodeBuffer,
    pub(crate) expires_in_seconds: u32,
    pub(crate) attempts_remaining: u32,
    pub(crate) resend_cooldown_seconds: u32,
    pub(crate) status: Status,
    pub(crate) message: Option<String>,
    pub(crate) focus: usize,
    pub(crate) resending: bool,
}

impl Challenge {
    #[must_use]
    pub fn new(target_email: impl Into<String>) -> Self {
        Self {
            target_email: target_email.into().trim().to_string(),
            code: CodeBuffer::default(),
            expires_in_seconds: CODE_TTL_SECONDS,
            attempts_remaining: MAX_ATTEMPTS,
            resend_cooldown_seconds: 0,
            status: Status::Pending,
            message: None,
            focus: 0,
            resending: false,
        }
    }

    #[must_use]
    pub fn target_email(&self) -> &str {
        &self.target_email
    }

    #[must_use]
    pub fn code(&self) -> &CodeBuffer {
        &self.code
    }

    #[must_use]
    pub fn expires_in_seconds(&self) -> u32 {
        self.expires_in_seconds
    }

    #[must_use]
    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    #[must_use]
    pub fn resend_cooldown_seconds(&self) -> u32 {
        self.resend_cooldown_seconds
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Slot that currently has input focus.
    #[must_use]
    pub fn focus(&self) -> usize {
        self.focus
    }

    #[must_use]
    pub fn is_resending(&self) -> bool {
        self.resending
    }

    /// Countdown as `m:ss`.
    #[must_use]
    pub fn countdown_label(&self) -> String {
        format_time(self.expires_in_seconds)
    }

    #[must_use]
    pub fn countdown_is_warning(&self) -> bool {
        self.expires_in_seconds < EXPIRY_WARNING_SECONDS
    }

    /// "2 attempts remaining" style sublabel, shown only after a rejection.
    #[must_use]
    pub fn attempts_label(&self) -> Option<String> {
        match self.attempts_remaining {
            0 => None,
            n if n >= MAX_ATTEMPTS => None,
            1 => Some("1 attempt remaining".to_string()),
            n => Some(format!("{n} attempts remaining")),
        }
    }

    #[must_use]
    pub fn resend_label(&self) -> String {
        if self.resend_cooldown_seconds > 0 {
            format!("Resend in {}s", self.resend_cooldown_seconds)
        } else {
            "Resend Code".to_string()
        }
    }

    /// Compact `[1 2 _ _ _ _]` view of the slots.
    #[must_use]
    pub fn slots_label(&self) -> String {
        let mut rendered = Vec::with_capacity(CODE_LENGTH);
        for slot in self.code.slots() {
            rendered.push(slot.map_or_else(|| "_".to_string(), |ch| ch.to_string()));
        }
        format!("[{}]", rendered.join(" "))
    }
}

/// Formats seconds as `m:ss`.
#[must_use]
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_challenge_starts_pending_with_full_budget() {
        let challenge = Challenge::new("  user@example.com ");
        assert_eq!(challenge.target_email(), "user@example.com");
        assert_eq!(challenge.expires_in_seconds(), 900);
        assert_eq!(challenge.attempts_remaining(), 3);
        assert_eq!(challenge.resend_cooldown_seconds(), 0);
        assert_eq!(challenge.status(), Status::Pending);
        assert_eq!(challenge.focus(), 0);
        assert!(challenge.message().is_none());
    }

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(900), "15:00");
        assert_eq!(format_time(61), "1:01");
        assert_eq!(format_time(59), "0:59");
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn countdown_warns_under_a_minute() {
        let mut challenge = Challenge::new("user@example.com");
        assert!(!challenge.countdown_is_warning());
        challenge.expires_in_seconds = 60;
        assert!(!challenge.countdown_is_warning());
        challenge.expires_in_seconds = 59;
        assert!(challenge.countdown_is_warning());
    }

    #[test]
    fn attempts_label_only_between_zero_and_max() {
        let mut challenge = Challenge::new("user@example.com");
        assert_eq!(challenge.attempts_label(), None);
        challenge.attempts_remaining = 2;
        assert_eq!(
            challenge.attempts_label().as_deref(),
            Some("2 attempts remaining")
        );
        challenge.attempts_remaining = 1;
        assert_eq!(
            challenge.attempts_label().as_deref(),
            Some("1 attempt remaining")
        );
        challenge.attempts_remaining = 0;
        assert_eq!(challenge.attempts_label(), None);
    }

    #[test]
    fn resend_label_tracks_cooldown() {
        let mut challenge = Challenge::new("user@example.com");
        assert_eq!(challenge.resend_label(), "Resend Code");
        challenge.resend_cooldown_seconds = 42;
        assert_eq!(challenge.resend_label(), "Resend in 42s");
    }

    #[test]
    fn slots_label_marks_empty_slots() {
        let mut challenge = Challenge::new("user@example.com");
        challenge.code.fill("12");
        assert_eq!(challenge.slots_label(), "[1 2 _ _ _ _]");
    }
}

//! Synchronous state machine for one verification challenge.
//!
//! Every transition goes through [`Controller`]. Operations that would reach the
//! backend do not perform I/O; they hand out a [`Submission`] or
//! [`ResendRequest`] and expect the matching `complete_*` call with the result.
//! Holding one of those values is what "request outstanding" means, so a second
//! submission or a resend cannot start until it is completed.

use super::challenge::{Challenge, Status, CODE_TTL_SECONDS, MAX_ATTEMPTS, RESEND_COOLDOWN_SECONDS};
use super::code::{parse_keystroke, sanitize_paste, CODE_LENGTH};
use crate::api::ApiError;
use std::fmt;
use tracing::debug;

pub const EXPIRED_MESSAGE: &str = "Verification code has expired. Request a new code.";
pub const MISSING_EMAIL_MESSAGE: &str = "Email address is missing";
pub const VERIFY_FALLBACK_MESSAGE: &str = "Verification failed";
pub const RESEND_FALLBACK_MESSAGE: &str = "Failed to resend code";

/// A code on its way to the backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Submission {
    pub email: String,
    pub code: String,
}

impl fmt::Debug for Submission {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Submission")
            .field("email", &self.email)
            .field("code", &"******")
            .finish()
    }
}

/// A resend on its way to the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResendRequest {
    pub email: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitBlocked {
    Incomplete,
    InFlight,
    ResendInFlight,
    Expired,
    MissingEmail,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResendBlocked {
    CoolingDown(u32),
    InFlight,
    Verifying,
    MissingEmail,
    Finished,
}

/// Backend rejection, reduced to what the challenge needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyFailure {
    pub message: String,
    pub remaining_attempts: Option<u32>,
    pub expired: bool,
}

impl VerifyFailure {
    #[must_use]
    pub fn from_error(err: &ApiError) -> Self {
        Self {
            message: err.user_message(VERIFY_FALLBACK_MESSAGE),
            remaining_attempts: err.remaining_attempts(),
            expired: err.is_code_expired(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Verified,
    Rejected(VerifyFailure),
    Blocked(SubmitBlocked),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResendOutcome {
    Sent,
    Failed(String),
    Blocked(ResendBlocked),
}

/// What a keystroke or paste did.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEffect {
    /// Rejected keystroke; nothing changed.
    Ignored,
    Stored,
    Submit(Submission),
    Blocked(SubmitBlocked),
}

#[derive(Clone, Debug)]
pub struct Controller {
    challenge: Challenge,
}

impl Controller {
    #[must_use]
    pub fn new(target_email: impl Into<String>) -> Self {
        Self {
            challenge: Challenge::new(target_email),
        }
    }

    #[must_use]
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    /// Stores one keystroke at `index`. An empty `raw` clears the slot.
    pub fn on_digit_input(&mut self, index: usize, raw: &str) -> InputEffect {
        if self.challenge.status == Status::Succeeded || index >= CODE_LENGTH {
            return InputEffect::Ignored;
        }
        let Ok(value) = parse_keystroke(raw) else {
            return InputEffect::Ignored;
        };

        let was_complete = self.challenge.code.is_complete();
        self.challenge.code.set(index, value);
        self.clear_failure();

        self.challenge.focus = if value.is_some() && index < CODE_LENGTH - 1 {
            index + 1
        } else {
            index
        };

        if !was_complete && self.challenge.code.is_complete() {
            self.auto_submit()
        } else {
            InputEffect::Stored
        }
    }

    /// Moves focus back when backspace hits an empty slot. Never edits digits.
    pub fn on_backspace(&mut self, index: usize) {
        if index == 0 || index >= CODE_LENGTH {
            return;
        }
        if self.challenge.code.get(index).is_none() {
            self.challenge.focus = index - 1;
        }
    }

    /// Replaces the buffer with the digits found in `raw`.
    pub fn on_paste(&mut self, raw: &str) -> InputEffect {
        if self.challenge.status == Status::Succeeded {
            return InputEffect::Ignored;
        }

        let digits = sanitize_paste(raw);
        self.challenge.code.fill(&digits);
        self.clear_failure();
        self.challenge.focus = self
            .challenge
            .code
            .first_empty()
            .unwrap_or(CODE_LENGTH - 1);

        if digits.len() == CODE_LENGTH {
            self.auto_submit()
        } else {
            InputEffect::Stored
        }
    }

    /// Starts a submission of the current code.
    ///
    /// # Errors
    /// Returns why the code cannot be sent. `Expired` and `MissingEmail` also
    /// set the inline message.
    pub fn submit(&mut self) -> Result<Submission, SubmitBlocked> {
        match self.challenge.status {
            Status::Verifying => return Err(SubmitBlocked::InFlight),
            Status::Succeeded => return Err(SubmitBlocked::Finished),
            Status::Pending | Status::Failed | Status::Expired => {}
        }
        if self.challenge.resending {
            return Err(SubmitBlocked::ResendInFlight);
        }
        let Some(code) = self.challenge.code.code() else {
            return Err(SubmitBlocked::Incomplete);
        };
        if self.challenge.target_email.is_empty() {
            self.challenge.message = Some(MISSING_EMAIL_MESSAGE.to_string());
            return Err(SubmitBlocked::MissingEmail);
        }
        if self.challenge.status == Status::Expired || self.challenge.expires_in_seconds == 0 {
            self.challenge.status = Status::Expired;
            self.challenge.message = Some(EXPIRED_MESSAGE.to_string());
            return Err(SubmitBlocked::Expired);
        }

        self.challenge.status = Status::Verifying;
        self.challenge.message = None;
        Ok(Submission {
            email: self.challenge.target_email.clone(),
            code,
        })
    }

    /// Applies the backend's answer to a submission.
    pub fn complete_submit(
        &mut self,
        submission: Submission,
        result: Result<(), VerifyFailure>,
    ) -> SubmitOutcome {
        debug!(email = %submission.email, "verification answered");

        match result {
            Ok(()) => {
                self.challenge.status = Status::Succeeded;
                self.challenge.message = None;
                SubmitOutcome::Verified
            }
            Err(failure) => {
                if let Some(remaining) = failure.remaining_attempts {
                    self.challenge.attempts_remaining = remaining;
                }
                self.challenge.message = Some(failure.message.clone());
                self.challenge.code.clear();
                self.challenge.focus = 0;

                if failure.expired || self.challenge.expires_in_seconds == 0 {
                    self.challenge.expires_in_seconds = 0;
                    self.challenge.status = Status::Expired;
                } else {
                    self.challenge.status = Status::Failed;
                }
                SubmitOutcome::Rejected(failure)
            }
        }
    }

    /// Starts a resend request.
    ///
    /// # Errors
    /// Returns why a new code cannot be requested right now.
    pub fn begin_resend(&mut self) -> Result<ResendRequest, ResendBlocked> {
        match self.challenge.status {
            Status::Succeeded => return Err(ResendBlocked::Finished),
            Status::Verifying => return Err(ResendBlocked::Verifying),
            Status::Pending | Status::Failed | Status::Expired => {}
        }
        if self.challenge.resending {
            return Err(ResendBlocked::InFlight);
        }
        if self.challenge.resend_cooldown_seconds > 0 {
            return Err(ResendBlocked::CoolingDown(
                self.challenge.resend_cooldown_seconds,
            ));
        }
        if self.challenge.target_email.is_empty() {
            self.challenge.message = Some(MISSING_EMAIL_MESSAGE.to_string());
            return Err(ResendBlocked::MissingEmail);
        }

        self.challenge.resending = true;
        self.challenge.message = None;
        Ok(ResendRequest {
            email: self.challenge.target_email.clone(),
        })
    }

    /// Applies the backend's answer to a resend. Failures reset nothing.
    pub fn complete_resend(
        &mut self,
        _request: ResendRequest,
        result: Result<(), String>,
    ) -> ResendOutcome {
        self.challenge.resending = false;

        match result {
            Ok(()) => {
                self.challenge.expires_in_seconds = CODE_TTL_SECONDS;
                self.challenge.attempts_remaining = MAX_ATTEMPTS;
                self.challenge.resend_cooldown_seconds = RESEND_COOLDOWN_SECONDS;
                self.challenge.code.clear();
                self.challenge.focus = 0;
                self.challenge.status = Status::Pending;
                self.challenge.message = None;
                ResendOutcome::Sent
            }
            Err(message) => {
                self.challenge.message = Some(message.clone());
                ResendOutcome::Failed(message)
            }
        }
    }

    /// One second of the expiry countdown. Returns whether anything changed.
    pub fn tick_expiry(&mut self) -> bool {
        if self.challenge.status == Status::Succeeded || self.challenge.expires_in_seconds == 0 {
            return false;
        }
        self.challenge.expires_in_seconds -= 1;
        if self.challenge.expires_in_seconds == 0
            && matches!(self.challenge.status, Status::Pending | Status::Failed)
        {
            self.challenge.status = Status::Expired;
        }
        true
    }

    /// One second of the resend cooldown. Returns whether anything changed.
    pub fn tick_cooldown(&mut self) -> bool {
        if self.challenge.resend_cooldown_seconds == 0 {
            return false;
        }
        self.challenge.resend_cooldown_seconds -= 1;
        true
    }

    fn clear_failure(&mut self) {
        self.challenge.message = None;
        if self.challenge.status == Status::Failed {
            self.challenge.status = Status::Pending;
        }
    }

    fn auto_submit(&mut self) -> InputEffect {
        match self.submit() {
            Ok(submission) => InputEffect::Submit(submission),
            // Already sending; the pending answer will clear the buffer.
            Err(SubmitBlocked::InFlight | SubmitBlocked::ResendInFlight) => InputEffect::Stored,
            Err(blocked) => InputEffect::Blocked(blocked),
        }
    }
}

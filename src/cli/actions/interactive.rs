//! Line-oriented terminal front end for a verification challenge.
//!
//! Each line read from stdin is one of:
//! - a single character, typed into the focused slot
//! - `N=d` to type `d` into slot `N` (1-based), `N=` to clear it
//! - `<` or `back` for backspace at the focused slot
//! - `resend`, `submit`, `status`, `quit` / `exit`
//! - anything else, handled as a paste
//!
//! The challenge is redrawn after every line, and its status line once a second
//! while the prompt is idle. Notifications are printed by a separate task that
//! owns the [`NotificationCenter`].

use crate::notify::{self, NotificationCenter};
use crate::verification::{
    code::CODE_LENGTH, Challenge, ResendBlocked, ResendOutcome, SessionOptions, Status,
    SubmitBlocked, SubmitOutcome, VerificationBackend, VerificationSession,
};
use anyhow::{Context, Result};
use std::{future::Future, io::Write, time::Duration};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

const REDRAW_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, PartialEq, Eq)]
pub enum Entry {
    Blank,
    Type(String),
    Set { index: usize, value: String },
    Backspace,
    Paste(String),
    Resend,
    Submit,
    Status,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Verified,
    Quit,
}

#[must_use]
pub fn parse_line(line: &str) -> Entry {
    let line = line.trim();

    match line.to_ascii_lowercase().as_str() {
        "" => return Entry::Blank,
        "<" | "back" => return Entry::Backspace,
        "resend" => return Entry::Resend,
        "submit" => return Entry::Submit,
        "status" => return Entry::Status,
        "quit" | "exit" => return Entry::Quit,
        _ => {}
    }

    if line.chars().count() == 1 {
        return Entry::Type(line.to_string());
    }

    if let Some((slot, value)) = line.split_once('=') {
        let value = value.trim();
        if let Ok(slot) = slot.trim().parse::<usize>() {
            if (1..=CODE_LENGTH).contains(&slot) && value.chars().count() <= 1 {
                return Entry::Set {
                    index: slot - 1,
                    value: value.to_string(),
                };
            }
        }
    }

    Entry::Paste(line.to_string())
}

/// Slots, countdown and resend state on one line.
#[must_use]
pub fn status_line(challenge: &Challenge) -> String {
    let countdown = if challenge.countdown_is_warning() {
        format!("{} (expiring)", challenge.countdown_label())
    } else {
        challenge.countdown_label()
    };

    let action = match challenge.status() {
        Status::Verifying => "Verifying...".to_string(),
        Status::Succeeded => "Verified".to_string(),
        _ if challenge.is_resending() => "Sending...".to_string(),
        _ => challenge.resend_label(),
    };

    format!("{}  {countdown}  {action}", challenge.slots_label())
}

/// Renders the challenge as a short block of text.
#[must_use]
pub fn render(challenge: &Challenge) -> String {
    let mut lines = vec![status_line(challenge)];
    if let Some(message) = challenge.message() {
        lines.push(format!("  {message}"));
    }
    if let Some(attempts) = challenge.attempts_label() {
        lines.push(format!("  {attempts}"));
    }
    lines.join("\n")
}

fn submit_hint(blocked: SubmitBlocked) -> Option<&'static str> {
    match blocked {
        SubmitBlocked::Incomplete => Some("Enter all 6 digits first."),
        SubmitBlocked::ResendInFlight => Some("Wait for the new code to be sent."),
        // Expired and MissingEmail set the inline message.
        SubmitBlocked::InFlight
        | SubmitBlocked::Expired
        | SubmitBlocked::MissingEmail
        | SubmitBlocked::Finished => None,
    }
}

fn resend_hint(blocked: ResendBlocked) -> Option<String> {
    match blocked {
        ResendBlocked::CoolingDown(seconds) => Some(format!("Resend available in {seconds}s.")),
        ResendBlocked::InFlight => Some("A new code is already on its way.".to_string()),
        ResendBlocked::Verifying => Some("Wait for the current code to be checked.".to_string()),
        ResendBlocked::MissingEmail | ResendBlocked::Finished => None,
    }
}

async fn print_notifications(mut center: NotificationCenter) {
    while let Some(notification) = center.next().await {
        println!("[{}] {}", notification.kind, notification.message);
        center.dismiss(notification.id);
    }
}

/// Resolves on the first Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}

/// Applies one entry. Returns the next step and an optional hint for the user.
async fn apply<B: VerificationBackend>(
    session: &mut VerificationSession<B>,
    entry: Entry,
) -> (Step, Option<String>) {
    let outcome = match entry {
        Entry::Blank | Entry::Status => None,
        Entry::Quit => return (Step::Quit, None),
        Entry::Type(raw) => {
            let focus = session.snapshot().await.focus();
            session.input_digit(focus, &raw).await
        }
        Entry::Set { index, value } => session.input_digit(index, &value).await,
        Entry::Backspace => {
            let challenge = session.snapshot().await;
            let focus = challenge.focus();
            if challenge.code().get(focus).is_some() {
                session.input_digit(focus, "").await
            } else {
                session.backspace(focus).await;
                None
            }
        }
        Entry::Paste(text) => session.paste(&text).await,
        Entry::Submit => Some(session.submit().await),
        Entry::Resend => {
            let hint = match session.resend().await {
                ResendOutcome::Blocked(blocked) => resend_hint(blocked),
                ResendOutcome::Sent | ResendOutcome::Failed(_) => None,
            };
            return (Step::Continue, hint);
        }
    };

    match outcome {
        Some(SubmitOutcome::Verified) => (Step::Verified, None),
        Some(SubmitOutcome::Blocked(blocked)) => {
            (Step::Continue, submit_hint(blocked).map(str::to_string))
        }
        Some(SubmitOutcome::Rejected(_)) | None => (Step::Continue, None),
    }
}

/// Feeds `input` into the session until it is verified, abandoned or
/// `interrupt` resolves. `interrupt` also cancels an in-flight request and the
/// redirect wait. Returns the post-verification destination.
async fn drive<B, R, W>(
    session: &mut VerificationSession<B>,
    input: R,
    interrupt: impl Future<Output = ()>,
    out: &mut W,
) -> Result<Option<String>>
where
    B: VerificationBackend,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    tokio::pin!(interrupt);
    let mut lines = input.lines();
    let mut redraw = time::interval_at(Instant::now() + REDRAW_PERIOD, REDRAW_PERIOD);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let challenge = session.snapshot().await;
    let mut status = status_line(&challenge);
    writeln!(out, "{}", render(&challenge))?;

    let verified = loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read from stdin")?,
            () = &mut interrupt => break false,
            _ = redraw.tick() => {
                let current = status_line(&session.snapshot().await);
                if current != status {
                    write!(out, "\r{current}")?;
                    out.flush()?;
                    status = current;
                }
                continue;
            }
        };
        let Some(line) = line else {
            break false;
        };

        let (step, hint) = tokio::select! {
            applied = apply(&mut *session, parse_line(&line)) => applied,
            () = &mut interrupt => break false,
        };
        if let Some(hint) = hint {
            writeln!(out, "{hint}")?;
        }
        let challenge = session.snapshot().await;
        status = status_line(&challenge);
        writeln!(out, "{}", render(&challenge))?;

        match step {
            Step::Continue => {}
            Step::Verified => break true,
            Step::Quit => break false,
        }
    };

    if !verified {
        info!("verification abandoned");
        return Ok(None);
    }

    debug!("waiting for redirect");
    tokio::select! {
        destination = session.wait_for_redirect() => Ok(destination),
        () = &mut interrupt => {
            info!("redirect interrupted");
            Ok(None)
        }
    }
}

/// Runs one challenge against stdin until it is verified or abandoned.
/// Returns the post-verification destination, `None` when abandoned.
///
/// # Errors
/// Returns an error if stdin cannot be read or stdout cannot be written.
pub async fn run<B: VerificationBackend>(
    email: &str,
    backend: B,
    options: SessionOptions,
) -> Result<Option<String>> {
    let (notifier, center) = notify::channel();
    let printer = tokio::spawn(print_notifications(center));
    let mut session = VerificationSession::start(email, backend, notifier, options);

    println!("Enter the {CODE_LENGTH}-digit code sent to {email}.");
    println!("Type digits or paste the code; `resend`, `submit`, `status` or `quit`.");

    let stdin = BufReader::new(tokio::io::stdin());
    let result = drive(&mut session, stdin, interrupted(), &mut std::io::stdout()).await;

    // Releases the countdowns and closes the notification channel.
    drop(session);
    if let Err(err) = printer.await {
        debug!("notification printer stopped: {err}");
    }

    let destination = result?;
    if let Some(destination) = &destination {
        println!("Continue at {destination}");
    }
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::verification::controller::{Controller, InputEffect, Submission, VerifyFailure};

    /// Accepts every code, or never answers when `stalled`.
    struct FixedBackend {
        stalled: bool,
    }

    impl VerificationBackend for FixedBackend {
        async fn verify(&self, _submission: &Submission) -> Result<(), ApiError> {
            if self.stalled {
                std::future::pending::<()>().await;
            }
            Ok(())
        }

        async fn resend(&self, _email: &str) -> Result<(), ApiError> {
            Ok(())
        }

        fn success_destination(&self) -> &str {
            "/login?verified=true"
        }
    }

    fn start_session(stalled: bool) -> VerificationSession<FixedBackend> {
        let (notifier, _center) = notify::channel();
        VerificationSession::start(
            "user@example.com",
            FixedBackend { stalled },
            notifier,
            SessionOptions::default(),
        )
    }

    #[test]
    fn single_characters_type_into_focus() {
        assert_eq!(parse_line("7"), Entry::Type("7".to_string()));
        assert_eq!(parse_line(" x "), Entry::Type("x".to_string()));
        assert_eq!(parse_line("   "), Entry::Blank);
    }

    #[test]
    fn slot_assignments_are_one_based() {
        assert_eq!(
            parse_line("1=4"),
            Entry::Set {
                index: 0,
                value: "4".to_string()
            }
        );
        assert_eq!(
            parse_line("6="),
            Entry::Set {
                index: 5,
                value: String::new()
            }
        );
        assert_eq!(parse_line("7=1"), Entry::Paste("7=1".to_string()));
        assert_eq!(parse_line("0=1"), Entry::Paste("0=1".to_string()));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse_line("<"), Entry::Backspace);
        assert_eq!(parse_line("Back"), Entry::Backspace);
        assert_eq!(parse_line("RESEND"), Entry::Resend);
        assert_eq!(parse_line("submit"), Entry::Submit);
        assert_eq!(parse_line("status"), Entry::Status);
        assert_eq!(parse_line("exit"), Entry::Quit);
        assert_eq!(parse_line("quit"), Entry::Quit);
    }

    #[test]
    fn anything_else_is_a_paste() {
        assert_eq!(parse_line("12-34-56"), Entry::Paste("12-34-56".to_string()));
        assert_eq!(parse_line("code 123"), Entry::Paste("code 123".to_string()));
    }

    #[test]
    fn render_fresh_challenge() {
        let controller = Controller::new("user@example.com");
        assert_eq!(
            render(controller.challenge()),
            "[_ _ _ _ _ _]  15:00  Resend Code"
        );
    }

    #[test]
    fn render_rejection_shows_message_and_attempts() {
        let mut controller = Controller::new("user@example.com");
        let InputEffect::Submit(submission) = controller.on_paste("123456") else {
            panic!("expected submission");
        };
        assert!(render(controller.challenge()).contains("Verifying..."));

        controller.complete_submit(
            submission,
            Err(VerifyFailure {
                message: "Invalid verification code".to_string(),
                remaining_attempts: Some(1),
                expired: false,
            }),
        );

        assert_eq!(
            render(controller.challenge()),
            "[_ _ _ _ _ _]  15:00  Resend Code\n  Invalid verification code\n  1 attempt remaining"
        );
    }

    #[test]
    fn render_marks_the_last_minute() {
        let mut controller = Controller::new("user@example.com");
        for _ in 0..841 {
            controller.tick_expiry();
        }
        assert!(render(controller.challenge()).contains("0:59 (expiring)"));
    }

    #[test]
    fn hints_cover_user_actionable_blocks() {
        assert_eq!(
            submit_hint(SubmitBlocked::Incomplete),
            Some("Enter all 6 digits first.")
        );
        assert_eq!(submit_hint(SubmitBlocked::Expired), None);
        assert_eq!(
            resend_hint(ResendBlocked::CoolingDown(42)).as_deref(),
            Some("Resend available in 42s.")
        );
        assert_eq!(resend_hint(ResendBlocked::Finished), None);
    }

    #[tokio::test(start_paused = true)]
    async fn pasted_code_is_verified_and_redirected() {
        let mut session = start_session(false);
        let mut out = Vec::new();

        let destination = drive(
            &mut session,
            "12 34 56\n".as_bytes(),
            std::future::pending::<()>(),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(destination.as_deref(), Some("/login?verified=true"));
        assert!(String::from_utf8(out).unwrap().contains("Verified"));
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_cancels_an_in_flight_verification() {
        let mut session = start_session(true);
        let mut out = Vec::new();

        let destination = drive(
            &mut session,
            "123456\n".as_bytes(),
            time::sleep(Duration::from_secs(5)),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(destination, None);
        assert_eq!(session.status().await, Status::Verifying);
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_cancels_the_redirect_wait() {
        let mut session = start_session(false);
        let mut out = Vec::new();

        let destination = drive(
            &mut session,
            "123456\n".as_bytes(),
            time::sleep(Duration::from_secs(1)),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(destination, None);
        assert_eq!(session.status().await, Status::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_prompt_redraws_the_countdown() {
        let mut session = start_session(false);
        // Keep the writer open so stdin stays silent instead of reaching EOF.
        let (_writer, reader) = tokio::io::duplex(64);
        let mut out = Vec::new();

        // Offset redraws from the countdown ticks on whole seconds.
        time::sleep(Duration::from_millis(500)).await;
        drive(
            &mut session,
            BufReader::new(reader),
            time::sleep(Duration::from_millis(3_200)),
            &mut out,
        )
        .await
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("[_ _ _ _ _ _]  15:00  Resend Code\n"));
        assert!(out.contains("\r[_ _ _ _ _ _]  14:59  Resend Code"));
        assert!(out.contains("\r[_ _ _ _ _ _]  14:58  Resend Code"));
        assert!(out.ends_with("\r[_ _ _ _ _ _]  14:57  Resend Code"));
    }
}

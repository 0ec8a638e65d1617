//! Async driver around [`Controller`]. It owns the two countdown tasks, talks
//! to the backend, publishes notifications and schedules the success redirect.
//! Dropping the session releases every task it started.

use super::backend::VerificationBackend;
use super::challenge::{Challenge, Status};
use super::controller::{
    Controller, InputEffect, ResendOutcome, SubmitOutcome, Submission, VerifyFailure,
    RESEND_FALLBACK_MESSAGE,
};
use super::timer::{Delayed, IntervalGuard};
use crate::notify::Notifier;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const VERIFIED_NOTIFICATION: &str = "Email verified successfully!";
pub const RESENT_NOTIFICATION: &str = "Verification code sent to your email";

#[derive(Clone, Copy, Debug)]
pub struct SessionOptions {
    /// Pause between success and navigation.
    pub redirect_delay: Duration,
    /// Countdown resolution.
    pub tick: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            redirect_delay: Duration::from_secs(2),
            tick: Duration::from_secs(1),
        }
    }
}

#[derive(Debug)]
struct Countdowns {
    expiry: IntervalGuard,
    cooldown: IntervalGuard,
}

impl Countdowns {
    fn start(controller: &Arc<Mutex<Controller>>, tick: Duration) -> Self {
        let state = controller.clone();
        let expiry = IntervalGuard::spawn(tick, move || {
            let state = state.clone();
            async move {
                let mut controller = state.lock().await;
                if controller.tick_expiry() && controller.challenge().expires_in_seconds() == 0 {
                    info!("verification code expired");
                }
            }
        });

        let state = controller.clone();
        let cooldown = IntervalGuard::spawn(tick, move || {
            let state = state.clone();
            async move {
                state.lock().await.tick_cooldown();
            }
        });

        Self { expiry, cooldown }
    }

    fn is_running(&self) -> bool {
        !self.expiry.is_finished() && !self.cooldown.is_finished()
    }
}

pub struct VerificationSession<B> {
    controller: Arc<Mutex<Controller>>,
    backend: B,
    notifier: Notifier,
    options: SessionOptions,
    countdowns: Option<Countdowns>,
    redirect: Option<Delayed<String>>,
}

impl<B: VerificationBackend> VerificationSession<B> {
    /// Opens a challenge for `target_email` and starts its countdowns.
    /// Must be called from within a tokio runtime.
    pub fn start(
        target_email: impl Into<String>,
        backend: B,
        notifier: Notifier,
        options: SessionOptions,
    ) -> Self {
        let controller = Arc::new(Mutex::new(Controller::new(target_email)));
        let countdowns = Countdowns::start(&controller, options.tick);
        debug!("verification session started");

        Self {
            controller,
            backend,
            notifier,
            options,
            countdowns: Some(countdowns),
            redirect: None,
        }
    }

    /// Copy of the current challenge state.
    pub async fn snapshot(&self) -> Challenge {
        self.controller.lock().await.challenge().clone()
    }

    pub async fn status(&self) -> Status {
        self.controller.lock().await.challenge().status()
    }

    /// Whether the countdown tasks are still held.
    #[must_use]
    pub fn countdowns_running(&self) -> bool {
        self.countdowns
            .as_ref()
            .is_some_and(Countdowns::is_running)
    }

    /// Returns `Some` when the keystroke led to a submission attempt.
    pub async fn input_digit(&mut self, index: usize, raw: &str) -> Option<SubmitOutcome> {
        let effect = self.controller.lock().await.on_digit_input(index, raw);
        self.apply(effect).await
    }

    pub async fn backspace(&self, index: usize) {
        self.controller.lock().await.on_backspace(index);
    }

    /// Returns `Some` when the paste led to a submission attempt.
    pub async fn paste(&mut self, raw: &str) -> Option<SubmitOutcome> {
        let effect = self.controller.lock().await.on_paste(raw);
        self.apply(effect).await
    }

    /// Explicit submit, used when the user asks to retry with a full buffer.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let started = self.controller.lock().await.submit();
        match started {
            Ok(submission) => self.run_submission(submission).await,
            Err(blocked) => SubmitOutcome::Blocked(blocked),
        }
    }

    pub async fn resend(&mut self) -> ResendOutcome {
        let started = self.controller.lock().await.begin_resend();
        let request = match started {
            Ok(request) => request,
            Err(blocked) => {
                debug!(?blocked, "resend refused locally");
                return ResendOutcome::Blocked(blocked);
            }
        };

        let result = self
            .backend
            .resend(&request.email)
            .await
            .map_err(|err| {
                warn!("resend failed: {err}");
                err.user_message(RESEND_FALLBACK_MESSAGE)
            });

        let outcome = self
            .controller
            .lock()
            .await
            .complete_resend(request, result);

        match &outcome {
            ResendOutcome::Sent => {
                info!("verification code resent");
                // Fresh counters start a full tick after the reset.
                self.countdowns = Some(Countdowns::start(&self.controller, self.options.tick));
                self.notifier.success(RESENT_NOTIFICATION);
            }
            ResendOutcome::Failed(message) => self.notifier.error(message.clone()),
            ResendOutcome::Blocked(_) => {}
        }
        outcome
    }

    /// Waits for the scheduled redirect and returns its destination. `None`
    /// when nothing was scheduled.
    pub async fn wait_for_redirect(&mut self) -> Option<String> {
        match self.redirect.as_mut() {
            Some(redirect) => redirect.wait().await,
            None => None,
        }
    }

    async fn apply(&mut self, effect: InputEffect) -> Option<SubmitOutcome> {
        match effect {
            InputEffect::Ignored | InputEffect::Stored => None,
            InputEffect::Blocked(blocked) => {
                debug!(?blocked, "submission refused locally");
                Some(SubmitOutcome::Blocked(blocked))
            }
            InputEffect::Submit(submission) => Some(self.run_submission(submission).await),
        }
    }

    async fn run_submission(&mut self, submission: Submission) -> SubmitOutcome {
        debug!("submitting verification code");
        let result = self.backend.verify(&submission).await.map_err(|err| {
            warn!("verification rejected: {err}");
            VerifyFailure::from_error(&err)
        });

        let outcome = self
            .controller
            .lock()
            .await
            .complete_submit(submission, result);

        if outcome == SubmitOutcome::Verified {
            info!("email verified");
            self.countdowns = None;
            self.notifier.success(VERIFIED_NOTIFICATION);
            self.redirect = Some(Delayed::spawn(
                self.options.redirect_delay,
                self.backend.success_destination().to_string(),
            ));
        }
        outcome
    }
}

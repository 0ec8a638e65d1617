//! Email verification challenge shared by registration and email change.
//!
//! [`controller::Controller`] holds every rule of the lifecycle and performs no
//! I/O, so it can be driven synchronously in tests. [`session::VerificationSession`]
//! wraps it for real use: it owns the one-second countdowns, calls the
//! [`backend::VerificationBackend`], publishes notifications and schedules the
//! redirect after success.

pub mod backend;
pub mod challenge;
pub mod code;
pub mod controller;
pub mod session;
pub mod timer;

pub use backend::{EmailChangeBackend, RegistrationBackend, VerificationBackend};
pub use challenge::{Challenge, Status};
pub use controller::{
    Controller, InputEffect, ResendBlocked, ResendOutcome, SubmitBlocked, SubmitOutcome,
};
pub use session::{SessionOptions, VerificationSession};

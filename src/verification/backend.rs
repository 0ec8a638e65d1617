//! Backend seam for the verification flow. Registration and email change share
//! the challenge lifecycle; they differ only in which endpoints are called and
//! where the user lands afterwards.

use super::controller::Submission;
use crate::api::{ApiClient, ApiError};
use crate::auth::client;
use std::future::Future;

pub trait VerificationBackend: Send + Sync {
    /// Checks a submitted code.
    fn verify(&self, submission: &Submission)
        -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Issues a fresh code for `email`.
    fn resend(&self, email: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Where to navigate once the code is accepted.
    fn success_destination(&self) -> &str;
}

/// Codes mailed after `POST /auth/register`.
#[derive(Clone, Debug)]
pub struct RegistrationBackend {
    client: ApiClient,
}

impl RegistrationBackend {
    pub const DESTINATION: &'static str = "/login?verified=true";

    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl VerificationBackend for RegistrationBackend {
    async fn verify(&self, submission: &Submission) -> Result<(), ApiError> {
        client::verify_email(&self.client, &submission.email, &submission.code).await
    }

    async fn resend(&self, email: &str) -> Result<(), ApiError> {
        client::resend_code(&self.client, email).await
    }

    fn success_destination(&self) -> &str {
        Self::DESTINATION
    }
}

/// Codes mailed to the new address of a pending email change. The backend keys
/// the change on the session, so the code is sent without an email and a
/// resend repeats the change request.
#[derive(Clone, Debug)]
pub struct EmailChangeBackend {
    client: ApiClient,
}

impl EmailChangeBackend {
    pub const DESTINATION: &'static str = "/settings?emailChanged=true";

    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl VerificationBackend for EmailChangeBackend {
    async fn verify(&self, submission: &Submission) -> Result<(), ApiError> {
        client::verify_email_change(&self.client, &submission.code).await
    }

    async fn resend(&self, email: &str) -> Result<(), ApiError> {
        client::request_email_change(&self.client, email).await
    }

    fn success_destination(&self) -> &str {
        Self::DESTINATION
    }
}

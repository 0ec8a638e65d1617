//! Client wrappers for the dashboard auth endpoints. These helpers centralize
//! paths and payload shapes so the verification flow never builds requests by
//! hand, and keep codes and passwords out of the logs.

use super::types::{
    AuthResponse, EmailChangeRequest, RegisterRequest, ResendCodeRequest,
    VerifyEmailChangeRequest, VerifyEmailRequest, PRIVACY_POLICY_VERSION, TERMS_VERSION,
};
use crate::api::{ApiClient, ApiError};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

/// Creates an account; the backend then mails a verification code to `email`.
/// Must never log the password.
///
/// # Errors
/// Returns an `ApiError` when the request fails or is rejected.
#[instrument(skip(client, password))]
pub async fn register(
    client: &ApiClient,
    email: &str,
    password: &SecretString,
    display_name: Option<&str>,
) -> Result<AuthResponse, ApiError> {
    let request = RegisterRequest {
        email,
        password: password.expose_secret(),
        display_name,
        accept_terms: true,
        terms_version: TERMS_VERSION,
        accept_privacy_policy: true,
        privacy_policy_version: PRIVACY_POLICY_VERSION,
    };
    client.post_json_response("/auth/register", &request).await
}

/// Submits a registration verification code. Must never log the code.
///
/// # Errors
/// Returns an `ApiError` carrying the backend's error payload on rejection.
#[instrument(skip(client, code))]
pub async fn verify_email(client: &ApiClient, email: &str, code: &str) -> Result<(), ApiError> {
    let request = VerifyEmailRequest { email, code };
    client.post_json("/auth/verify-email", &request).await
}

/// Requests a fresh registration code for `email`.
///
/// # Errors
/// Returns an `ApiError` when the request fails or is rejected.
#[instrument(skip(client))]
pub async fn resend_code(client: &ApiClient, email: &str) -> Result<(), ApiError> {
    let request = ResendCodeRequest { email };
    client.post_json("/auth/resend-code", &request).await
}

/// Starts an email change for the signed-in user; the code goes to `new_email`.
/// Requires the session cookie.
///
/// # Errors
/// Returns an `ApiError` when no session is configured or the request fails.
#[instrument(skip(client))]
pub async fn request_email_change(client: &ApiClient, new_email: &str) -> Result<(), ApiError> {
    let request = EmailChangeRequest { new_email };
    client
        .post_json_with_credentials("/auth/email-change", &request)
        .await
}

/// Confirms the pending email change. Must never log the code.
///
/// # Errors
/// Returns an `ApiError` carrying the backend's error payload on rejection.
#[instrument(skip(client, code))]
pub async fn verify_email_change(client: &ApiClient, code: &str) -> Result<(), ApiError> {
    let request = VerifyEmailChangeRequest { code };
    client
        .post_json_with_credentials("/auth/email-change/verify", &request)
        .await
}

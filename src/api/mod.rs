//! HTTP helpers for JSON APIs with consistent timeouts and error handling. Feature
//! clients use these helpers to avoid duplicating request setup and to enforce a
//! predictable timeout policy. The helpers never log request bodies; they only
//! attach the session cookie when the caller asks for it.

pub mod config;
pub mod errors;

pub use config::ApiConfig;
pub use errors::{ApiError, ErrorBody};

use crate::APP_USER_AGENT;
use reqwest::{header::COOKIE, Client, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// Shared HTTP client bound to one backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Builds the underlying `reqwest` client with the configured timeout.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the HTTP client cannot be initialized.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to initialize HTTP client: {err}")))?;

        Ok(Self { http, config })
    }

    /// Posts JSON and expects the response body to be ignored.
    ///
    /// # Errors
    /// Returns an `ApiError` on transport failures or non-2xx responses.
    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let request = self.post(path, body, false)?;
        let response = send(request).await?;
        handle_empty_response(response).await
    }

    /// Posts JSON with the session cookie attached.
    ///
    /// # Errors
    /// Returns `ApiError::Config` when no session cookie is configured, or an
    /// `ApiError` on transport failures and non-2xx responses.
    pub async fn post_json_with_credentials<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = self.post(path, body, true)?;
        let response = send(request).await?;
        handle_empty_response(response).await
    }

    /// Posts JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns an `ApiError` on transport failures, non-2xx responses, or an
    /// undecodable body.
    pub async fn post_json_response<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.post(path, body, false)?;
        let response = send(request).await?;
        handle_json_response(response).await
    }

    fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        with_credentials: bool,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.config.build_url(path);
        let mut builder = self.http.post(&url).json(body);

        if with_credentials {
            let cookie = self.config.session_cookie.as_ref().ok_or_else(|| {
                ApiError::Config("A session cookie is required for this request.".to_string())
            })?;
            builder = builder.header(COOKIE, cookie.expose_secret());
        }

        debug!("POST {url}");

        Ok(builder)
    }
}

/// Maps transport errors into `ApiError` variants with timeout detection.
fn map_request_error(err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        // `RequestBuilder::json` defers encoding failures to `send`.
        ApiError::Serialization(format!("Failed to encode request: {err}"))
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    request.send().await.map_err(|err| map_request_error(&err))
}

/// Parses JSON responses and surfaces HTTP errors with decoded bodies.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

/// Handles responses whose body is opaque to the caller.
async fn handle_empty_response(response: Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    debug!("request failed with status {status}");
    ApiError::Http {
        status,
        body: ErrorBody::from_text(&body),
    }
}

//! Connection settings for the dashboard backend. Values arrive from the CLI
//! (flags or `HADITH_*` environment variables) and are normalized here so the
//! HTTP helpers can assume a clean base URL. The session cookie is the only
//! secret and stays wrapped in `SecretString`.

use super::errors::ApiError;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// Default backend used by local development setups.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
/// Default request timeout (milliseconds) applied to all HTTP helpers.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub api_base_url: String,
    pub timeout: Duration,
    pub session_cookie: Option<SecretString>,
}

impl ApiConfig {
    /// Validates the base URL and timeout.
    ///
    /// # Errors
    /// Returns `ApiError::Config` when the URL is not absolute http(s) or the
    /// timeout is zero.
    pub fn new(api_base_url: &str, timeout_ms: u64) -> Result<Self, ApiError> {
        let base = normalize_value(api_base_url)
            .ok_or_else(|| ApiError::Config("API base URL is empty.".to_string()))?;

        let parsed = Url::parse(&base)
            .map_err(|err| ApiError::Config(format!("Invalid API base URL: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "Unsupported API base URL scheme: {}",
                parsed.scheme()
            )));
        }

        if timeout_ms == 0 {
            return Err(ApiError::Config(
                "Request timeout must be greater than zero.".to_string(),
            ));
        }

        Ok(Self {
            api_base_url: base.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(timeout_ms),
            session_cookie: None,
        })
    }

    /// Attaches the session cookie used by authenticated endpoints; blank values are ignored.
    #[must_use]
    pub fn with_session_cookie(mut self, cookie: Option<&str>) -> Self {
        self.session_cookie = cookie.and_then(normalize_value).map(SecretString::from);
        self
    }

    /// Builds a URL from the configured base URL and the provided path.
    #[must_use]
    pub fn build_url(&self, path: &str) -> String {
        build_url_with_base(&self.api_base_url, path)
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn normalize_value_trims_and_rejects_empty() {
        assert_eq!(normalize_value(""), None);
        assert_eq!(normalize_value("   "), None);
        assert_eq!(
            normalize_value("  https://api.hadith.dev "),
            Some("https://api.hadith.dev".to_string())
        );
    }

    #[test]
    fn new_strips_trailing_slash() {
        let config = ApiConfig::new(" https://api.hadith.dev/ ", 5_000).unwrap();
        assert_eq!(config.api_base_url, "https://api.hadith.dev");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.session_cookie.is_none());
    }

    #[test]
    fn new_rejects_bad_input() {
        assert!(matches!(ApiConfig::new("", 1_000), Err(ApiError::Config(_))));
        assert!(matches!(
            ApiConfig::new("not a url", 1_000),
            Err(ApiError::Config(_))
        ));
        assert!(matches!(
            ApiConfig::new("ftp://api.hadith.dev", 1_000),
            Err(ApiError::Config(_))
        ));
        assert!(matches!(
            ApiConfig::new(DEFAULT_API_BASE_URL, 0),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn build_url_joins_paths() {
        let config = ApiConfig::new(DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_MS).unwrap();
        assert_eq!(
            config.build_url("/auth/verify-email"),
            "http://localhost:3000/auth/verify-email"
        );
        assert_eq!(
            config.build_url("auth/resend-code"),
            "http://localhost:3000/auth/resend-code"
        );
        assert_eq!(build_url_with_base("", "/auth/me"), "/auth/me");
    }

    #[test]
    fn session_cookie_ignores_blank_values() {
        let config = ApiConfig::new(DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_MS)
            .unwrap()
            .with_session_cookie(Some("   "));
        assert!(config.session_cookie.is_none());

        let config = config.with_session_cookie(Some(" access_token=abc "));
        assert_eq!(
            config.session_cookie.as_ref().map(|c| c.expose_secret().to_string()),
            Some("access_token=abc".to_string())
        );
    }
}

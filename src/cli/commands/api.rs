use crate::api::{
    config::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_MS},
    ApiClient, ApiConfig,
};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::time::Duration;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TIMEOUT_MS: &str = "timeout-ms";
pub const ARG_SESSION_COOKIE: &str = "session-cookie";
pub const ARG_REDIRECT_DELAY_MS: &str = "redirect-delay-ms";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Dashboard backend base URL")
                .env("HADITH_API_URL")
                .global(true)
                .default_value(DEFAULT_API_BASE_URL),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_MS)
                .long(ARG_TIMEOUT_MS)
                .help("Request timeout in milliseconds")
                .env("HADITH_TIMEOUT_MS")
                .global(true)
                .default_value("10000")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SESSION_COOKIE)
                .long(ARG_SESSION_COOKIE)
                .help("Cookie header of a signed-in session (required for change-email)")
                .env("HADITH_SESSION_COOKIE")
                .global(true)
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_REDIRECT_DELAY_MS)
                .long(ARG_REDIRECT_DELAY_MS)
                .help("Delay between a verified code and the redirect, in milliseconds")
                .env("HADITH_REDIRECT_DELAY_MS")
                .global(true)
                .default_value("2000")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[derive(Clone, Debug)]
pub struct Options {
    pub config: ApiConfig,
    pub redirect_delay: Duration,
}

impl Options {
    /// Parse connection arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the base URL or timeout is invalid.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let api_url = matches
            .get_one::<String>(ARG_API_URL)
            .map_or(DEFAULT_API_BASE_URL, String::as_str);
        let timeout_ms = matches
            .get_one::<u64>(ARG_TIMEOUT_MS)
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let session_cookie = matches
            .get_one::<String>(ARG_SESSION_COOKIE)
            .map(String::as_str);
        let redirect_delay_ms = matches
            .get_one::<u64>(ARG_REDIRECT_DELAY_MS)
            .copied()
            .unwrap_or(2_000);

        let config = ApiConfig::new(api_url, timeout_ms)
            .with_context(|| format!("invalid --{ARG_API_URL} or --{ARG_TIMEOUT_MS}"))?
            .with_session_cookie(session_cookie);

        Ok(Self {
            config,
            redirect_delay: Duration::from_millis(redirect_delay_ms),
        })
    }

    /// Builds the HTTP client for these options.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(self.config.clone()).context("failed to build HTTP client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn matches(args: &[&str]) -> ArgMatches {
        let command = with_args(Command::new("hadith-console"));
        let mut argv = vec!["hadith-console"];
        argv.extend_from_slice(args);
        command.get_matches_from(argv)
    }

    #[test]
    fn defaults_point_at_local_backend() {
        temp_env::with_vars(
            [
                ("HADITH_API_URL", None::<&str>),
                ("HADITH_TIMEOUT_MS", None),
                ("HADITH_SESSION_COOKIE", None),
                ("HADITH_REDIRECT_DELAY_MS", None),
            ],
            || {
                let options = Options::parse(&matches(&[])).unwrap();
                assert_eq!(options.config.api_base_url, DEFAULT_API_BASE_URL);
                assert_eq!(options.config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
                assert!(options.config.session_cookie.is_none());
                assert_eq!(options.redirect_delay, Duration::from_secs(2));
            },
        );
    }

    #[test]
    fn session_cookie_is_trimmed_and_blank_ignored() {
        temp_env::with_vars([("HADITH_SESSION_COOKIE", None::<&str>)], || {
            let options = Options::parse(&matches(&["--session-cookie", "  sid=1  "])).unwrap();
            let cookie = options.config.session_cookie.unwrap();
            assert_eq!(cookie.expose_secret(), "sid=1");

            let options = Options::parse(&matches(&["--session-cookie", "   "])).unwrap();
            assert!(options.config.session_cookie.is_none());
        });
    }

    #[test]
    fn zero_timeout_is_rejected() {
        temp_env::with_vars([("HADITH_TIMEOUT_MS", None::<&str>)], || {
            let err = Options::parse(&matches(&["--timeout-ms", "0"])).unwrap_err();
            assert!(err.to_string().contains("--timeout-ms"));
        });
    }
}

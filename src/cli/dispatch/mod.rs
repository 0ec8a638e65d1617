//! Maps parsed CLI arguments to an [`Action`]. Input problems the backend
//! would reject anyway (malformed email, unaccepted terms) are caught here.

use crate::auth::valid_email;
use crate::cli::actions::{change_email, register, resend, verify, Action};
use crate::cli::commands::{
    self, api, ARG_ACCEPT_TERMS, ARG_DISPLAY_NAME, ARG_EMAIL, ARG_NEW_EMAIL, ARG_PASSWORD,
};
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

pub const INVALID_EMAIL_MESSAGE: &str = "Email address looks invalid.";
pub const TERMS_REQUIRED_MESSAGE: &str = "Please accept Terms of Service and Privacy Policy";

fn read_email(matches: &ArgMatches, id: &str) -> Result<String> {
    let email = matches
        .get_one::<String>(id)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .with_context(|| format!("missing required argument: --{id}"))?;

    if !valid_email(&email) {
        bail!(INVALID_EMAIL_MESSAGE);
    }
    Ok(email)
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let api = api::Options::parse(matches)?;

    match matches.subcommand() {
        Some((commands::CMD_VERIFY, sub)) => Ok(Action::Verify(verify::Args {
            api,
            email: read_email(sub, ARG_EMAIL)?,
        })),
        Some((commands::CMD_REGISTER, sub)) => {
            let email = read_email(sub, ARG_EMAIL)?;
            let password = sub
                .get_one::<String>(ARG_PASSWORD)
                .filter(|value| !value.is_empty())
                .map(|value| SecretString::from(value.clone()))
                .with_context(|| format!("missing required argument: --{ARG_PASSWORD}"))?;
            if !sub.get_flag(ARG_ACCEPT_TERMS) {
                bail!(TERMS_REQUIRED_MESSAGE);
            }
            let display_name = sub
                .get_one::<String>(ARG_DISPLAY_NAME)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty());

            Ok(Action::Register(register::Args {
                api,
                email,
                password,
                display_name,
            }))
        }
        Some((commands::CMD_CHANGE_EMAIL, sub)) => {
            let new_email = read_email(sub, ARG_NEW_EMAIL)?;
            if api.config.session_cookie.is_none() {
                bail!(
                    "missing required argument: --{} (change-email needs a signed-in session)",
                    api::ARG_SESSION_COOKIE
                );
            }
            Ok(Action::ChangeEmail(change_email::Args { api, new_email }))
        }
        Some((commands::CMD_RESEND, sub)) => Ok(Action::Resend(resend::Args {
            api,
            email: read_email(sub, ARG_EMAIL)?,
        })),
        Some((other, _)) => bail!("unknown subcommand: {other}"),
        None => bail!("missing subcommand"),
    }
}

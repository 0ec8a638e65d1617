pub mod api;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const CMD_VERIFY: &str = "verify";
pub const CMD_REGISTER: &str = "register";
pub const CMD_CHANGE_EMAIL: &str = "change-email";
pub const CMD_RESEND: &str = "resend";

pub const ARG_EMAIL: &str = "email";
pub const ARG_NEW_EMAIL: &str = "new-email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_DISPLAY_NAME: &str = "display-name";
pub const ARG_ACCEPT_TERMS: &str = "accept-terms";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long(ARG_EMAIL)
        .help("Email address the verification code was sent to")
        .env("HADITH_EMAIL")
        .required(true)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("hadith-console")
        .about("Hadith API account console")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(CMD_VERIFY)
                .about("Enter the 6-digit code mailed after registration")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new(CMD_REGISTER)
                .about("Create an account, then verify its email address")
                .arg(email_arg().help("Email address for the new account"))
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .short('p')
                        .long(ARG_PASSWORD)
                        .help("Account password")
                        .env("HADITH_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_DISPLAY_NAME)
                        .long(ARG_DISPLAY_NAME)
                        .help("Name shown in the dashboard"),
                )
                .arg(
                    Arg::new(ARG_ACCEPT_TERMS)
                        .long(ARG_ACCEPT_TERMS)
                        .help("Accept the Terms of Service and Privacy Policy")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new(CMD_CHANGE_EMAIL)
                .about("Move the signed-in account to a new email address")
                .arg(
                    Arg::new(ARG_NEW_EMAIL)
                        .long(ARG_NEW_EMAIL)
                        .help("Address that receives the verification code")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_RESEND)
                .about("Request a fresh registration code without entering it")
                .arg(email_arg()),
        );

    let command = api::with_args(command);
    logging::with_args(command)
}

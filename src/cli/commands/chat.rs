use anyhow::Result;
use inquire::{Password, PasswordDisplayMode, Text};

use super::{build_router, load_config};
use crate::chat::ChatSession;
use crate::cli::SessionArgs;
use crate::config::{ChatSettings, ResolveOptions};
use crate::model::Credentials;
use crate::status;
use crate::ui::{Style, is_prompt_cancelled};

pub async fn run_chat(session: SessionArgs) -> Result<()> {
    let config = load_config(&ResolveOptions::from(&session))?;

    let Some(credentials) = session_credentials(&config.chat)? else {
        // User cancelled the login prompt
        return Ok(());
    };

    let router = build_router(&config, credentials, session.no_cache)?;
    let mut chat = ChatSession::new(config, router);
    chat.run().await
}

/// Uses the configured credentials, or asks for them when none are set.
///
/// Returns `None` if the user cancels the prompt.
fn session_credentials(chat: &ChatSettings) -> Result<Option<Credentials>> {
    if let Some(credentials) = &chat.credentials {
        status!("{} Login credentials already provided", Style::success("✓"));
        return Ok(Some(credentials.clone()));
    }

    status!(
        "{} No credentials found in {} / {}; please enter them.",
        Style::warning("!"),
        chat.email_env,
        chat.password_env
    );

    match prompt_credentials() {
        Ok(credentials) => Ok(Some(credentials)),
        Err(e) if is_prompt_cancelled(&e) => {
            println!();
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn prompt_credentials() -> Result<Credentials, inquire::InquireError> {
    let email = Text::new("E-mail:")
        .with_validator(inquire::required!("E-mail is required"))
        .prompt()?;

    let password = Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(inquire::required!("Password is required"))
        .prompt()?;

    Ok(Credentials::new(email.trim(), password))
}

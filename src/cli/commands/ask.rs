use anyhow::{Result, bail};

use super::{build_router, load_config};
use crate::cli::SessionArgs;
use crate::config::ResolveOptions;
use crate::conversation::Conversation;
use crate::input::{InputReader, InputSource};
use crate::ui::Spinner;

/// Marker error for an empty question; maps to the `NOINPUT` exit code.
#[derive(Debug, thiserror::Error)]
#[error("Input is empty")]
pub struct EmptyInput;

pub struct AskOptions {
    pub source: InputSource,
    pub session: SessionArgs,
}

/// Routes a single question and prints the reply to stdout.
pub async fn run_ask(options: AskOptions) -> Result<()> {
    let config = load_config(&ResolveOptions::from(&options.session))?;
    let credentials = config.chat.require_credentials()?;

    let question = InputReader::read(&options.source)?;
    let question = question.trim();
    if question.is_empty() {
        bail!(EmptyInput);
    }

    let router = build_router(&config, credentials, options.session.no_cache)?;
    let mut conversation = Conversation::new();

    let reply = {
        let _spinner = Spinner::new("Thinking...");
        router
            .handle(&mut conversation, question, config.language)
            .await
    };

    tracing::debug!(route = ?reply.route, messages = conversation.len(), "answered");
    println!("{}", reply.text);

    Ok(())
}

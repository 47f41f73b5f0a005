use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use agrichat_cli::cli::commands::{ask, chat, configure, lookup};
use agrichat_cli::cli::{Args, Command, SessionArgs};
use agrichat_cli::config::ConfigError;
use agrichat_cli::input::InputSource;
use agrichat_cli::logging;
use agrichat_cli::output::{self, OutputConfig};
use agrichat_cli::translation::print_languages;
use agrichat_cli::ui::Style;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    output::init(OutputConfig::from_flags(args.quiet, args.no_color));
    logging::init(args.verbose);

    match run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", Style::error("Error:"));
            ExitCode::from(exit_code_for(&e))
        }
    }
}

async fn run(command: Option<Command>) -> Result<()> {
    match command {
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Configure { show }) => {
            configure::run_configure(show)?;
        }
        Some(Command::Weather { city }) => {
            lookup::run_weather(city).await?;
        }
        Some(Command::MarketRate { product }) => {
            lookup::run_market_rate(product).await?;
        }
        Some(Command::Ask {
            text,
            file,
            session,
        }) => {
            let options = ask::AskOptions {
                source: InputSource::from_args(text, file),
                session,
            };
            ask::run_ask(options).await?;
        }
        Some(Command::Chat { session }) => {
            chat::run_chat(session).await?;
        }
        None => {
            chat::run_chat(SessionArgs::default()).await?;
        }
    }

    Ok(())
}

/// Maps an error to a sysexits-style exit code.
fn exit_code_for(error: &anyhow::Error) -> u8 {
    let code = if error.downcast_ref::<ConfigError>().is_some() {
        exitcode::CONFIG
    } else if error.downcast_ref::<ask::EmptyInput>().is_some() {
        exitcode::NOINPUT
    } else {
        exitcode::SOFTWARE
    };
    code as u8
}

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};

use crate::translation::Language;

#[derive(Parser, Debug)]
#[command(name = "agrichat")]
#[command(about = "Multilingual agriculture chatbot with weather and market-rate lookups")]
#[command(version)]
pub struct Args {
    /// Suppress status messages
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output (also honors NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by every command that routes messages.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Conversation language
    #[arg(short = 'l', long = "lang", value_enum)]
    pub language: Option<Language>,

    /// City used for weather questions
    #[arg(long)]
    pub city: Option<String>,

    /// Product used for market-rate questions
    #[arg(long)]
    pub product: Option<String>,

    /// Translator: "google" or a configured provider name
    #[arg(short = 't', long)]
    pub translator: Option<String>,

    /// Model for a provider translator
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Disable the translation cache
    #[arg(short = 'n', long)]
    pub no_cache: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat (default)
    Chat {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Ask a single question and print the reply
    Ask {
        /// Question text (reads stdin if neither TEXT nor --file is given)
        text: Option<String>,

        /// Read the question from a file
        #[arg(short = 'f', long, conflicts_with = "text")]
        file: Option<String>,

        #[command(flatten)]
        session: SessionArgs,
    },
    /// Show the current weather for a city
    Weather {
        /// City name (defaults to the configured city)
        #[arg(short = 'c', long)]
        city: Option<String>,
    },
    /// Show the market rate for a product
    MarketRate {
        /// Product name (defaults to the configured product)
        #[arg(short = 'p', long)]
        product: Option<String>,
    },
    /// Configure default settings
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// List supported languages
    Languages,
}

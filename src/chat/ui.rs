//! Chat mode UI components.

use crate::config::ResolvedConfig;
use crate::conversation::{Conversation, Role};
use crate::translation::Language;
use crate::ui::Style;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(language: Language) {
    println!(
        "{} {} - Agriculture Chatbot",
        Style::header("agrichat"),
        Style::version(format!("v{VERSION}"))
    );
    println!(
        "{}",
        Style::hint(format!("Language: {language} (change with /lang)"))
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_reply(text: &str) {
    println!("{text}");
    println!();
}

pub fn print_config(config: &ResolvedConfig, language: Language) {
    println!("{}", Style::header("Configuration"));
    println!("  {}    {}", Style::label("language"), Style::value(language));
    println!(
        "  {}        {}",
        Style::label("city"),
        Style::value(&config.defaults.city)
    );
    println!(
        "  {}     {}",
        Style::label("product"),
        Style::value(&config.defaults.product)
    );
    println!(
        "  {}  {}",
        Style::label("translator"),
        Style::value(config.translator.name())
    );
    println!(
        "  {}       {}",
        Style::label("model"),
        Style::value(&config.chat.model)
    );
    println!(
        "  {}    {}",
        Style::label("chat url"),
        Style::secondary(&config.chat.base_url)
    );
    println!(
        "  {}     {}",
        Style::label("weather"),
        Style::secondary(&config.weather.endpoint)
    );
    println!();
}

pub fn print_history(conversation: &Conversation) {
    println!("{}", Style::header("Conversation"));
    for message in conversation.messages() {
        let marker = match message.role {
            Role::User => "you",
            Role::Assistant => "bot",
        };
        println!("  {} {}", Style::role(format!("{marker}:")), message.content);
    }
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    let rows = [
        ("/weather [city]", "Show the weather (English)"),
        ("/rate [product]", "Show the market rate (English)"),
        ("/lang <language>", "Switch language: marathi, hindi, english"),
        ("/history", "Show the conversation so far"),
        ("/clear", "Start the conversation over"),
        ("/config", "Show current configuration"),
        ("/help", "Show this help"),
        ("/quit", "Exit chat mode"),
    ];
    for (command, description) in rows {
        println!(
            "  {}  {}",
            Style::command(format!("{command:<16}")),
            Style::secondary(description)
        );
    }
    println!();
    println!(
        "{}",
        Style::hint("Questions mentioning 'weather' or 'market rate' use the lookups.")
    );
    println!();
}

pub fn print_success(message: &str) {
    println!("{} {message}", Style::success("✓"));
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}

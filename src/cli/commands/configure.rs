//! Configure command handler for editing default settings.

use anyhow::Result;
use inquire::{Select, Text};

use super::load_config;
use crate::chat::print_config;
use crate::config::{AppConfig, ConfigFile, ConfigManager, GOOGLE_TRANSLATOR, ResolveOptions};
use crate::router::LookupDefaults;
use crate::translation::{Language, SUPPORTED_LANGUAGES};
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command.
///
/// With `show`, prints the effective configuration. Otherwise prompts for the
/// default language, city, product and translator and saves them.
pub fn run_configure(show: bool) -> Result<()> {
    if show {
        let config = load_config(&ResolveOptions::default())?;
        print_config(&config, config.language);
        return Ok(());
    }

    handle_prompt_cancellation(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    print_current_defaults(&config);

    let language = select_language(config.agrichat.language)?;
    let fallback = LookupDefaults::default();
    let city = prompt_value("Default city:", config.agrichat.city.as_deref(), &fallback.city)?;
    let product = prompt_value(
        "Default product:",
        config.agrichat.product.as_deref(),
        &fallback.product,
    )?;
    let translator = select_translator(&config, config.agrichat.translator.as_deref())?;

    // A model only applies to provider translators
    let model = if translator == GOOGLE_TRANSLATOR {
        None
    } else {
        config.agrichat.model.clone()
    };

    config.agrichat = AppConfig {
        language: Some(language),
        city: Some(city),
        product: Some(product),
        translator: Some(translator),
        model,
    };

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn print_current_defaults(config: &ConfigFile) {
    let not_set = || Style::secondary("(not set)");
    let app = &config.agrichat;

    println!("{}", Style::header("Current defaults"));
    println!(
        "  {}    {}",
        Style::label("language"),
        app.language.map_or_else(not_set, Style::value)
    );
    println!(
        "  {}        {}",
        Style::label("city"),
        app.city.as_deref().map_or_else(not_set, Style::value)
    );
    println!(
        "  {}     {}",
        Style::label("product"),
        app.product.as_deref().map_or_else(not_set, Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("translator"),
        app.translator.as_deref().map_or_else(not_set, Style::value)
    );
    println!();
}

fn select_language(default: Option<Language>) -> Result<Language> {
    let default_index = default
        .and_then(|d| SUPPORTED_LANGUAGES.iter().position(|l| *l == d))
        .unwrap_or(0);

    let selection = Select::new("Default language:", SUPPORTED_LANGUAGES.to_vec())
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection)
}

fn prompt_value(message: &str, current: Option<&str>, fallback: &str) -> Result<String> {
    let value = Text::new(message)
        .with_default(current.unwrap_or(fallback))
        .prompt()?;

    let value = value.trim();
    Ok(if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    })
}

/// Offers `google` followed by every configured provider, sorted by name.
fn translator_options(config: &ConfigFile) -> Vec<String> {
    let mut providers: Vec<String> = config.providers.keys().cloned().collect();
    providers.sort();
    providers.insert(0, GOOGLE_TRANSLATOR.to_string());
    providers
}

fn select_translator(config: &ConfigFile, default: Option<&str>) -> Result<String> {
    let options = translator_options(config);
    if options.len() == 1 {
        return Ok(GOOGLE_TRANSLATOR.to_string());
    }

    let default_index = default
        .and_then(|d| options.iter().position(|t| t == d))
        .unwrap_or(0);

    let selection = Select::new("Default translator:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection)
}

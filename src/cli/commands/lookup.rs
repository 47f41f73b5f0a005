use anyhow::Result;

use super::load_config_file;
use crate::config::{ResolveOptions, resolve_defaults, resolve_weather};
use crate::lookup::{
    MarketRates, OpenWeatherClient, PlaceholderRates, WeatherLookup, render_rate, render_weather,
};
use crate::ui::Spinner;

/// Prints the current weather for `city` (or the configured default city).
///
/// Only the weather settings are resolved, so translator problems in the
/// config file do not affect this command.
pub async fn run_weather(city: Option<String>) -> Result<()> {
    let config_file = load_config_file()?;
    let options = ResolveOptions {
        city,
        ..ResolveOptions::default()
    };
    let defaults = resolve_defaults(&options, &config_file);
    let settings = resolve_weather(&config_file);

    let client = OpenWeatherClient::new(settings.endpoint, settings.api_key);
    let report = {
        let _spinner = Spinner::new("Fetching weather...");
        render_weather(client.current(&defaults.city).await)
    };

    println!("{report}");
    Ok(())
}

/// Prints the market rate for `product` (or the configured default product).
pub async fn run_market_rate(product: Option<String>) -> Result<()> {
    let config_file = load_config_file()?;
    let options = ResolveOptions {
        product,
        ..ResolveOptions::default()
    };
    let defaults = resolve_defaults(&options, &config_file);

    println!("{}", render_rate(PlaceholderRates.rate(&defaults.product).await));
    Ok(())
}

//! The two keyword-triggered lookups: current weather and market rates.

mod market;
mod weather;

pub use market::{MarketRates, PlaceholderRates, render_rate};
pub use weather::{
    DEFAULT_WEATHER_ENDPOINT, OpenWeatherClient, WeatherLookup, WeatherReport, render_weather,
};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::fmt;

use crate::error::ServiceError;

pub const DEFAULT_WEATHER_ENDPOINT: &str = "http://api.openweathermap.org/data/2.5/weather";

const NO_TEMPERATURE: &str = "No temperature data available";
const NO_DESCRIPTION: &str = "No description available";
const NOT_FOUND: &str = "Weather information not found.";

/// Current conditions for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    pub description: String,
}

impl WeatherReport {
    /// Interprets an OpenWeatherMap `weather` response body.
    ///
    /// `cod` is a number on success but a string on most errors, so both are
    /// accepted. Anything other than 200 becomes [`ServiceError::Api`] carrying
    /// the endpoint's `message`.
    pub fn from_response(city: &str, body: &Value) -> Result<Self, ServiceError> {
        let cod = match body.get("cod") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };

        if cod != Some(200) {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(NOT_FOUND);
            return Err(ServiceError::Api(message.to_string()));
        }

        let temperature = body.pointer("/main/temp").and_then(Value::as_f64);
        let description = body
            .pointer("/weather/0/description")
            .and_then(Value::as_str)
            .unwrap_or(NO_DESCRIPTION)
            .to_string();

        Ok(Self {
            city: city.to_string(),
            temperature,
            description,
        })
    }
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.temperature {
            Some(temp) => write!(
                f,
                "The temperature in {} is {temp}°C with {}.",
                self.city, self.description
            ),
            None => write!(
                f,
                "The temperature in {} is {NO_TEMPERATURE}°C with {}.",
                self.city, self.description
            ),
        }
    }
}

/// Source of current weather conditions.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReport, ServiceError>;
}

/// Renders a lookup outcome as the reply shown to the user.
pub fn render_weather(result: Result<WeatherReport, ServiceError>) -> String {
    match result {
        Ok(report) => report.to_string(),
        Err(ServiceError::Api(message)) => format!("Error: {message}"),
        Err(e) => format!("Error fetching weather data: {e}"),
    }
}

/// OpenWeatherMap client.
pub struct OpenWeatherClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherReport, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingCredential("weather API key"))?;

        // Error statuses still carry a JSON body with `cod` and `message`.
        let body: Value = self
            .client
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await?
            .json()
            .await?;

        tracing::debug!(%city, response = %body, "weather response");

        WeatherReport::from_response(city, &body)
    }
}

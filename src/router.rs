//! Request routing: translate in, pick a handler, translate out.

use crate::conversation::Conversation;
use crate::lookup::{MarketRates, WeatherLookup, render_rate, render_weather};
use crate::model::ChatModel;
use crate::translation::{Language, Translator};

/// Reply used when a handler produced nothing.
pub const NO_RESPONSE: &str = "Error: No response generated.";

/// The handler a message is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Weather,
    MarketRate,
    Chat,
}

impl Route {
    /// Classifies English text by keyword, case-insensitively.
    ///
    /// `weather` wins over `market rate` when both appear.
    pub fn classify(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if lowered.contains("weather") {
            Self::Weather
        } else if lowered.contains("market rate") {
            Self::MarketRate
        } else {
            Self::Chat
        }
    }
}

/// Defaults used by the keyword handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupDefaults {
    pub city: String,
    pub product: String,
}

impl Default for LookupDefaults {
    fn default() -> Self {
        Self {
            city: "Kolhapur".to_string(),
            product: "Soybean".to_string(),
        }
    }
}

/// Outcome of routing one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// `None` when the input could not be translated and no handler ran.
    pub route: Option<Route>,
    pub text: String,
}

/// Routes user messages to the weather lookup, the market-rate lookup or the
/// chat model.
///
/// Every external call is isolated: a failure becomes the reply text instead
/// of an error, so a message always produces a reply.
pub struct Router {
    translator: Box<dyn Translator>,
    weather: Box<dyn WeatherLookup>,
    market: Box<dyn MarketRates>,
    model: Box<dyn ChatModel>,
    defaults: LookupDefaults,
}

impl Router {
    pub fn new(
        translator: Box<dyn Translator>,
        weather: Box<dyn WeatherLookup>,
        market: Box<dyn MarketRates>,
        model: Box<dyn ChatModel>,
        defaults: LookupDefaults,
    ) -> Self {
        Self {
            translator,
            weather,
            market,
            model,
            defaults,
        }
    }

    pub const fn defaults(&self) -> &LookupDefaults {
        &self.defaults
    }

    /// Handles one message and records the exchange in `conversation`.
    ///
    /// The user's original text and the final reply are appended, so the log
    /// grows by exactly two messages per call.
    pub async fn handle(
        &self,
        conversation: &mut Conversation,
        text: &str,
        language: Language,
    ) -> Reply {
        let reply = self.respond(text, language).await;
        conversation.record_exchange(text, reply.text.as_str());
        reply
    }

    /// Produces the reply for one message without touching any session state.
    pub async fn respond(&self, text: &str, language: Language) -> Reply {
        let english = if language.is_english() {
            text.to_string()
        } else {
            match self.translator.translate(text, None, Language::English).await {
                Ok(translated) => translated,
                Err(e) => {
                    tracing::warn!("input translation failed: {e}");
                    return Reply {
                        route: None,
                        text: format!("Error during translation: {e}"),
                    };
                }
            }
        };

        let route = Route::classify(&english);
        tracing::info!(?route, %language, "routing message");

        let response = self.dispatch(route, &english).await;

        let text = if response.trim().is_empty() {
            NO_RESPONSE.to_string()
        } else if language.is_english() {
            response
        } else {
            match self
                .translator
                .translate(&response, Some(Language::English), language)
                .await
            {
                Ok(translated) => translated,
                Err(e) => {
                    tracing::warn!("reply translation failed: {e}");
                    format!("Error during translation: {e}")
                }
            }
        };

        Reply {
            route: Some(route),
            text,
        }
    }

    async fn dispatch(&self, route: Route, english: &str) -> String {
        match route {
            Route::Weather => self.weather_report(&self.defaults.city).await,
            Route::MarketRate => self.market_rate(&self.defaults.product).await,
            Route::Chat => match self.model.complete(english).await {
                Ok(answer) => answer,
                Err(e) => {
                    tracing::warn!("chat model failed: {e}");
                    format!("Error during response generation: {e}")
                }
            },
        }
    }

    /// Current weather for `city`, in English, as reply text.
    pub async fn weather_report(&self, city: &str) -> String {
        render_weather(self.weather.current(city).await)
    }

    /// Market rate for `product`, in English, as reply text.
    pub async fn market_rate(&self, product: &str) -> String {
        render_rate(self.market.rate(product).await)
    }
}

//! Subcommand implementations.

use anyhow::Result;

use crate::cache::TranslationCache;
use crate::cli::SessionArgs;
use crate::config::{
    ConfigFile, ConfigManager, ResolveOptions, ResolvedConfig, TranslatorSettings, resolve_config,
};
use crate::lookup::{OpenWeatherClient, PlaceholderRates};
use crate::model::{Credentials, HuggingChatClient};
use crate::router::Router;
use crate::translation::{CachedTranslator, GoogleTranslator, LlmTranslator, Translator};

/// One-shot question handler.
pub mod ask;

/// Interactive chat command handler.
pub mod chat;

/// Configure command handler.
pub mod configure;

/// Weather and market-rate lookups outside a conversation.
pub mod lookup;

impl From<&SessionArgs> for ResolveOptions {
    fn from(args: &SessionArgs) -> Self {
        Self {
            language: args.language,
            city: args.city.clone(),
            product: args.product.clone(),
            translator: args.translator.clone(),
            model: args.model.clone(),
        }
    }
}

/// Loads the config file from its default location.
pub fn load_config_file() -> Result<ConfigFile> {
    ConfigManager::new()?.load_or_default()
}

/// Loads the config file and merges the CLI overrides into it.
pub fn load_config(options: &ResolveOptions) -> Result<ResolvedConfig> {
    resolve_config(options, &load_config_file()?)
}

/// Builds the translator described by `settings`, wrapped in the cache unless disabled.
pub fn build_translator(settings: &TranslatorSettings, no_cache: bool) -> Box<dyn Translator> {
    let translator: Box<dyn Translator> = match settings {
        TranslatorSettings::Google { endpoint } => Box::new(GoogleTranslator::new(endpoint.clone())),
        TranslatorSettings::Provider {
            endpoint,
            model,
            api_key,
            ..
        } => Box::new(LlmTranslator::new(
            endpoint.clone(),
            model.clone(),
            api_key.clone(),
        )),
    };

    if no_cache {
        return translator;
    }

    match TranslationCache::new() {
        Ok(cache) => Box::new(CachedTranslator::new(translator, cache)),
        Err(e) => {
            tracing::warn!("translation cache unavailable, continuing without it: {e:#}");
            translator
        }
    }
}

/// Wires the production collaborators into a router.
pub fn build_router(
    config: &ResolvedConfig,
    credentials: Credentials,
    no_cache: bool,
) -> Result<Router> {
    let model = HuggingChatClient::new(
        config.chat.base_url.clone(),
        config.chat.model.clone(),
        credentials,
    )?;
    let weather = OpenWeatherClient::new(
        config.weather.endpoint.clone(),
        config.weather.api_key.clone(),
    );

    Ok(Router::new(
        build_translator(&config.translator, no_cache),
        Box::new(weather),
        Box::new(PlaceholderRates),
        Box::new(model),
        config.defaults.clone(),
    ))
}

mod manager;

pub use manager::{
    AppConfig, ChatSettings, ConfigError, ConfigFile, ConfigManager, DEFAULT_CHAT_MODEL,
    DEFAULT_EMAIL_ENV, DEFAULT_PASSWORD_ENV, DEFAULT_WEATHER_KEY_ENV, GOOGLE_TRANSLATOR,
    HuggingChatConfig, ProviderConfig, ResolveOptions, ResolvedConfig, TranslatorSettings,
    WeatherConfig, WeatherSettings, resolve_config, resolve_defaults, resolve_weather,
};

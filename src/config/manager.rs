use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs::atomic_write;
use crate::lookup::DEFAULT_WEATHER_ENDPOINT;
use crate::model::{Credentials, DEFAULT_HUGGINGCHAT_URL};
use crate::paths;
use crate::router::LookupDefaults;
use crate::translation::{DEFAULT_GOOGLE_ENDPOINT, Language};
use crate::ui::Style;

/// Name of the built-in translator backend.
pub const GOOGLE_TRANSLATOR: &str = "google";

pub const DEFAULT_CHAT_MODEL: &str = "meta-llama/Meta-Llama-3.1-70B-Instruct";
pub const DEFAULT_EMAIL_ENV: &str = "AGRICHAT_EMAIL";
pub const DEFAULT_PASSWORD_ENV: &str = "AGRICHAT_PASSWORD";
pub const DEFAULT_WEATHER_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Default settings in the `[agrichat]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Session language.
    pub language: Option<Language>,
    /// City used for weather questions.
    pub city: Option<String>,
    /// Product used for market-rate questions.
    pub product: Option<String>,
    /// `google` or the name of a configured provider.
    pub translator: Option<String>,
    /// Model for a provider translator.
    pub model: Option<String>,
}

/// The `[huggingchat]` section: where the chat model lives and how to log in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HuggingChatConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Login email stored directly in config (not recommended).
    pub email: Option<String>,
    /// Environment variable holding the login email.
    pub email_env: Option<String>,
    /// Password stored directly in config (not recommended).
    pub password: Option<String>,
    /// Environment variable holding the password.
    pub password_env: Option<String>,
}

/// The `[weather]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
}

/// An OpenAI-compatible provider usable as a translator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API endpoint URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Models available from this provider.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// Gets the API key, preferring the environment variable over the config file.
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(env_secret)
            .or_else(|| self.api_key.clone())
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/agrichat/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub agrichat: AppConfig,
    #[serde(default)]
    pub huggingchat: HuggingChatConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Configuration problems; these map to the `CONFIG` exit code.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Translator '{name}' not found\n\n\
         Available translators:\n  - {}\n\n\
         Add providers to ~/.config/agrichat/config.toml",
        .available.join("\n  - ")
    )]
    UnknownTranslator {
        name: String,
        available: Vec<String>,
    },

    #[error(
        "Missing required configuration: 'model' for translator '{provider}'\n\n\
         Please provide it via:\n  \
         - CLI option: agrichat --translator {provider} --model <name>\n  \
         - Config file: ~/.config/agrichat/config.toml"
    )]
    MissingModel { provider: String },

    #[error(
        "Provider '{provider}' requires an API key\n\n\
         Set the {env_var} environment variable:\n  \
         export {env_var}=\"your-api-key\"\n\n\
         Or set api_key in ~/.config/agrichat/config.toml"
    )]
    MissingApiKey { provider: String, env_var: String },

    #[error(
        "Missing chat model credentials\n\n\
         Set the {email_env} and {password_env} environment variables,\n\
         or run 'agrichat chat' to enter them interactively."
    )]
    MissingCredentials {
        email_env: String,
        password_env: String,
    },
}

/// How messages are translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatorSettings {
    Google {
        endpoint: String,
    },
    Provider {
        name: String,
        endpoint: String,
        model: String,
        api_key: Option<String>,
    },
}

impl TranslatorSettings {
    pub fn name(&self) -> &str {
        match self {
            Self::Google { .. } => GOOGLE_TRANSLATOR,
            Self::Provider { name, .. } => name,
        }
    }
}

/// Resolved chat model settings.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub base_url: String,
    pub model: String,
    /// `None` when no email/password pair was found.
    pub credentials: Option<Credentials>,
    pub email_env: String,
    pub password_env: String,
}

impl ChatSettings {
    /// Returns the credentials or the error explaining how to provide them.
    pub fn require_credentials(&self) -> Result<Credentials, ConfigError> {
        self.credentials
            .clone()
            .ok_or_else(|| ConfigError::MissingCredentials {
                email_env: self.email_env.clone(),
                password_env: self.password_env.clone(),
            })
    }
}

/// Resolved weather settings. A missing key only fails weather lookups.
#[derive(Debug, Clone)]
pub struct WeatherSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub language: Language,
    pub defaults: LookupDefaults,
    pub translator: TranslatorSettings,
    pub chat: ChatSettings,
    pub weather: WeatherSettings,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub language: Option<Language>,
    pub city: Option<String>,
    pub product: Option<String>,
    pub translator: Option<String>,
    pub model: Option<String>,
}

fn env_secret(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.is_empty())
}

/// Reads a secret from `env_var`, falling back to the inline config value.
fn read_secret(env_var: &str, inline: Option<&String>) -> Option<String> {
    env_secret(env_var).or_else(|| inline.cloned())
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// Priority: CLI option, then config file, then built-in default.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let app = &config_file.agrichat;

    let language = options.language.or(app.language).unwrap_or_default();
    let defaults = resolve_defaults(options, config_file);

    let translator = resolve_translator(options, config_file)?;

    let hc = &config_file.huggingchat;
    let email_env = hc
        .email_env
        .clone()
        .unwrap_or_else(|| DEFAULT_EMAIL_ENV.to_string());
    let password_env = hc
        .password_env
        .clone()
        .unwrap_or_else(|| DEFAULT_PASSWORD_ENV.to_string());
    let credentials = match (
        read_secret(&email_env, hc.email.as_ref()),
        read_secret(&password_env, hc.password.as_ref()),
    ) {
        (Some(email), Some(password)) => Some(Credentials::new(email, password)),
        _ => None,
    };
    let chat = ChatSettings {
        base_url: hc
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_HUGGINGCHAT_URL.to_string()),
        model: hc
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
        credentials,
        email_env,
        password_env,
    };

    let weather = resolve_weather(config_file);

    Ok(ResolvedConfig {
        language,
        defaults,
        translator,
        chat,
        weather,
    })
}

/// City and product for the keyword lookups: CLI option, then config file, then built-in.
pub fn resolve_defaults(options: &ResolveOptions, config_file: &ConfigFile) -> LookupDefaults {
    let app = &config_file.agrichat;
    let fallback = LookupDefaults::default();
    LookupDefaults {
        city: options
            .city
            .clone()
            .or_else(|| app.city.clone())
            .unwrap_or(fallback.city),
        product: options
            .product
            .clone()
            .or_else(|| app.product.clone())
            .unwrap_or(fallback.product),
    }
}

/// Weather endpoint and key. Resolving these never fails; a missing key only
/// fails the lookup itself.
pub fn resolve_weather(config_file: &ConfigFile) -> WeatherSettings {
    let w = &config_file.weather;
    WeatherSettings {
        endpoint: w
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_WEATHER_ENDPOINT.to_string()),
        api_key: read_secret(
            w.api_key_env.as_deref().unwrap_or(DEFAULT_WEATHER_KEY_ENV),
            w.api_key.as_ref(),
        ),
    }
}

fn resolve_translator(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<TranslatorSettings> {
    let name = options
        .translator
        .as_deref()
        .or(config_file.agrichat.translator.as_deref())
        .unwrap_or(GOOGLE_TRANSLATOR);

    if name == GOOGLE_TRANSLATOR {
        return Ok(TranslatorSettings::Google {
            endpoint: DEFAULT_GOOGLE_ENDPOINT.to_string(),
        });
    }

    let provider = config_file.providers.get(name).ok_or_else(|| {
        let mut available: Vec<String> = config_file.providers.keys().cloned().collect();
        available.sort();
        available.insert(0, GOOGLE_TRANSLATOR.to_string());
        ConfigError::UnknownTranslator {
            name: name.to_string(),
            available,
        }
    })?;

    let model = options
        .model
        .clone()
        .or_else(|| config_file.agrichat.model.clone())
        .or_else(|| provider.models.first().cloned())
        .ok_or_else(|| ConfigError::MissingModel {
            provider: name.to_string(),
        })?;

    if !provider.models.is_empty() && !provider.models.contains(&model) {
        eprintln!(
            "{} Model '{}' is not in the configured models list for '{}'\n\
             Configured models: {}\n\
             Proceeding anyway...\n",
            Style::warning("Warning:"),
            model,
            name,
            provider.models.join(", ")
        );
    }

    let api_key = provider.get_api_key();
    if provider.requires_api_key() && api_key.is_none() {
        let env_var = provider.api_key_env.as_deref().unwrap_or("API_KEY");
        return Err(ConfigError::MissingApiKey {
            provider: name.to_string(),
            env_var: env_var.to_string(),
        }
        .into());
    }

    Ok(TranslatorSettings::Provider {
        name: name.to_string(),
        endpoint: provider.endpoint.clone(),
        model,
        api_key,
    })
}

/// Manages loading and saving the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Configuration lives at `$XDG_CONFIG_HOME/agrichat/config.toml`
    /// or `~/.config/agrichat/config.toml`.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(paths::config_dir()?.join("config.toml")))
    }

    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;

        Ok(config_file)
    }

    /// Loads the config file; a missing file yields the defaults, a broken one is an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        atomic_write(&self.config_path, &contents)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp_dir.path().join("config.toml"))
    }

    fn create_test_config() -> ConfigFile {
        let mut providers = HashMap::new();
        providers.insert(
            "ollama".to_string(),
            ProviderConfig {
                endpoint: "http://localhost:11434".to_string(),
                api_key: None,
                api_key_env: None,
                models: vec!["gemma3:12b".to_string()],
            },
        );
        providers.insert(
            "openrouter".to_string(),
            ProviderConfig {
                endpoint: "https://openrouter.ai/api".to_string(),
                api_key: None,
                api_key_env: Some("AGRICHAT_TEST_NONEXISTENT_API_KEY".to_string()),
                models: vec![],
            },
        );

        ConfigFile {
            agrichat: AppConfig {
                language: Some(Language::Hindi),
                city: Some("Pune".to_string()),
                product: None,
                translator: Some("ollama".to_string()),
                model: Some("gemma3:12b".to_string()),
            },
            providers,
            ..ConfigFile::default()
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        manager.save(&create_test_config()).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.agrichat.language, Some(Language::Hindi));
        assert_eq!(loaded.agrichat.city, Some("Pune".to_string()));
        assert_eq!(loaded.agrichat.translator, Some("ollama".to_string()));
        assert!(loaded.providers.contains_key("ollama"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert!(manager.load_or_default().unwrap().providers.is_empty());
    }

    #[test]
    fn test_load_or_default_reports_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[agrichat\nlanguage = ").unwrap();

        let err = manager.load_or_default().unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_parse_documented_layout() {
        let contents = r#"
            [agrichat]
            language = "marathi"
            city = "Kolhapur"
            translator = "google"

            [huggingchat]
            email_env = "MY_EMAIL"

            [weather]
            api_key_env = "MY_WEATHER_KEY"

            [providers.ollama]
            endpoint = "http://localhost:11434"
            models = ["gemma3:12b"]
        "#;
        let config: ConfigFile = toml::from_str(contents).unwrap();

        assert_eq!(config.agrichat.language, Some(Language::Marathi));
        assert_eq!(config.huggingchat.email_env, Some("MY_EMAIL".to_string()));
        assert_eq!(config.weather.api_key_env, Some("MY_WEATHER_KEY".to_string()));
        assert_eq!(config.providers["ollama"].models, vec!["gemma3:12b"]);
    }

    #[test]
    #[serial]
    fn test_provider_get_api_key_from_env() {
        // SAFETY: env-mutating tests are serialized with #[serial]
        unsafe {
            std::env::set_var("AGRICHAT_TEST_API_KEY", "test-key-value");
        }

        let provider = ProviderConfig {
            endpoint: "https://api.example.com".to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("AGRICHAT_TEST_API_KEY".to_string()),
            models: vec![],
        };

        assert_eq!(provider.get_api_key(), Some("test-key-value".to_string()));

        // SAFETY: as above
        unsafe {
            std::env::remove_var("AGRICHAT_TEST_API_KEY");
        }

        assert_eq!(provider.get_api_key(), Some("fallback-key".to_string()));
    }

    #[test]
    fn test_resolve_defaults_without_config() {
        let resolved = resolve_config(&ResolveOptions::default(), &ConfigFile::default()).unwrap();

        assert_eq!(resolved.language, Language::Marathi);
        assert_eq!(resolved.defaults, LookupDefaults::default());
        assert_eq!(
            resolved.translator,
            TranslatorSettings::Google {
                endpoint: DEFAULT_GOOGLE_ENDPOINT.to_string()
            }
        );
        assert_eq!(resolved.chat.base_url, DEFAULT_HUGGINGCHAT_URL);
        assert_eq!(resolved.weather.endpoint, DEFAULT_WEATHER_ENDPOINT);
    }

    #[test]
    fn test_resolve_provider_translator() {
        let resolved = resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        assert_eq!(resolved.language, Language::Hindi);
        assert_eq!(resolved.defaults.city, "Pune");
        assert_eq!(resolved.defaults.product, "Soybean");
        assert_eq!(
            resolved.translator,
            TranslatorSettings::Provider {
                name: "ollama".to_string(),
                endpoint: "http://localhost:11434".to_string(),
                model: "gemma3:12b".to_string(),
                api_key: None,
            }
        );
    }

    #[test]
    fn test_resolve_unknown_translator_lists_available() {
        let options = ResolveOptions {
            translator: Some("deepl".to_string()),
            ..ResolveOptions::default()
        };

        let err = resolve_config(&options, &create_test_config()).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("Translator 'deepl' not found"));
        assert!(message.contains("- google"));
        assert!(message.contains("- ollama"));
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_resolve_api_key_required_but_missing() {
        let options = ResolveOptions {
            translator: Some("openrouter".to_string()),
            model: Some("gpt-4o".to_string()),
            ..ResolveOptions::default()
        };

        let err = resolve_config(&options, &create_test_config()).unwrap_err();
        assert!(err.to_string().contains("requires an API key"));
    }

    #[test]
    fn test_resolve_provider_without_model() {
        let mut config = create_test_config();
        config.agrichat.model = None;
        config.providers.get_mut("ollama").unwrap().models.clear();

        let err = resolve_config(&ResolveOptions::default(), &config).unwrap_err();
        assert!(err.to_string().contains("'model'"));
    }

    #[test]
    fn test_resolve_provider_model_falls_back_to_first_listed() {
        let mut config = create_test_config();
        config.agrichat.model = None;

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();
        assert!(matches!(
            resolved.translator,
            TranslatorSettings::Provider { ref model, .. } if model == "gemma3:12b"
        ));
    }

    #[test]
    #[serial]
    fn test_credentials_from_custom_env_vars() {
        // SAFETY: env-mutating tests are serialized with #[serial]
        unsafe {
            std::env::set_var("AGRICHAT_TEST_EMAIL", "farmer@example.com");
            std::env::set_var("AGRICHAT_TEST_PASSWORD", "hunter2");
        }

        let mut config = ConfigFile::default();
        config.huggingchat.email_env = Some("AGRICHAT_TEST_EMAIL".to_string());
        config.huggingchat.password_env = Some("AGRICHAT_TEST_PASSWORD".to_string());

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

        // SAFETY: as above
        unsafe {
            std::env::remove_var("AGRICHAT_TEST_EMAIL");
            std::env::remove_var("AGRICHAT_TEST_PASSWORD");
        }

        assert_eq!(
            resolved.chat.require_credentials().unwrap(),
            Credentials::new("farmer@example.com", "hunter2")
        );
    }

    #[test]
    #[serial]
    fn test_missing_password_means_no_credentials() {
        let mut config = ConfigFile::default();
        config.huggingchat.email = Some("farmer@example.com".to_string());
        config.huggingchat.password_env = Some("AGRICHAT_TEST_UNSET_PASSWORD".to_string());

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

        assert!(resolved.chat.credentials.is_none());
        let err = resolved.chat.require_credentials().unwrap_err();
        assert!(err.to_string().contains("AGRICHAT_TEST_UNSET_PASSWORD"));
    }

    #[test]
    #[serial]
    fn test_weather_key_inline_fallback() {
        let mut config = ConfigFile::default();
        config.weather.api_key_env = Some("AGRICHAT_TEST_UNSET_WEATHER".to_string());
        config.weather.api_key = Some("inline-key".to_string());

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();
        assert_eq!(resolved.weather.api_key, Some("inline-key".to_string()));
    }

    #[test]
    #[serial]
    fn test_lookup_settings_ignore_broken_translator() {
        let mut config = ConfigFile::default();
        config.agrichat.translator = Some("nonexistent".to_string());
        config.agrichat.product = Some("Cotton".to_string());
        config.weather.api_key_env = Some("AGRICHAT_TEST_UNSET_WEATHER".to_string());
        config.weather.endpoint = Some("http://127.0.0.1:1/weather".to_string());

        assert!(resolve_config(&ResolveOptions::default(), &config).is_err());

        let options = ResolveOptions {
            city: Some("Pune".to_string()),
            ..ResolveOptions::default()
        };
        let defaults = resolve_defaults(&options, &config);
        assert_eq!(defaults.city, "Pune");
        assert_eq!(defaults.product, "Cotton");

        let weather = resolve_weather(&config);
        assert_eq!(weather.endpoint, "http://127.0.0.1:1/weather");
        assert_eq!(weather.api_key, None);
    }
}

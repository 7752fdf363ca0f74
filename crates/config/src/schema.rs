use chatrelay_types::{Credentials, Endpoint, RelayError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment variable overrides (`CHATRELAY_PORT`, `CHATRELAY_PROVIDER__ENDPOINT`).
pub const ENV_PREFIX: &str = "CHATRELAY_";

const REDACTED: &str = "[REDACTED]";

/// Upstream provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL the endpoint path is appended to.
    pub base_url: String,
    /// Which endpoint family requests are sent to.
    pub endpoint: Endpoint,
    /// Raw API key (takes precedence over `api_key_env`).
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Model used when no image is attached and the caller names none.
    pub text_model: String,
    /// Model used when an image is attached and the caller names none.
    pub vision_model: String,
    /// Output token cap sent with every request.
    pub max_output_tokens: u32,
    /// Prompt paired with the image when the conversation has no user text.
    pub fallback_prompt: String,
    /// Optional outbound proxy (`http://`, `https://` or `socks5://`).
    pub proxy_url: Option<String>,
    /// Optional outbound request timeout. No timeout when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            endpoint: Endpoint::Responses,
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            text_model: "gpt-4.1-mini".to_string(),
            vision_model: "gpt-4.1".to_string(),
            max_output_tokens: 2000,
            fallback_prompt: "Describe the image.".to_string(),
            proxy_url: None,
            timeout_secs: None,
        }
    }
}

impl ProviderConfig {
    /// Picks the model for a request: the caller's choice if given,
    /// otherwise the vision or text default depending on `has_image`.
    #[must_use]
    pub fn select_model(&self, requested: Option<&str>, has_image: bool) -> String {
        match requested.map(str::trim).filter(|m| !m.is_empty()) {
            Some(model) => model.to_string(),
            None if has_image => self.vision_model.clone(),
            None => self.text_model.clone(),
        }
    }

    /// Resolves the provider credential from `api_key`, falling back to the
    /// variable named by `api_key_env` as returned by `lookup`.
    pub fn resolve_credentials(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<Credentials> {
        self.api_key
            .as_deref()
            .and_then(Credentials::new)
            .or_else(|| lookup(&self.api_key_env).and_then(Credentials::new))
    }

    /// Resolves the provider credential from the process environment.
    #[must_use]
    pub fn credentials_from_env(&self) -> Option<Credentials> {
        self.resolve_credentials(|name| std::env::var(name).ok())
    }
}

/// CORS response headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Value of `Access-Control-Allow-Origin`.
    pub allow_origin: String,
    /// Value of `Access-Control-Allow-Headers`.
    pub allow_headers: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_headers: "Content-Type, Authorization".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

fn default_port() -> u16 {
    8018
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_path() -> String {
    "/api/chat".to_string()
}
fn default_max_body_bytes() -> usize {
    20 * 1024 * 1024
}

/// Fails when an explicitly requested config file is absent.
///
/// `Yaml::file_exact` treats a missing file as an empty source, which would
/// silently run a mistyped `--config` path on defaults.
#[allow(clippy::result_large_err)]
fn ensure_exists(path: &Path) -> Result<(), figment::Error> {
    if path.is_file() {
        Ok(())
    } else {
        Err(figment::Error::from(format!(
            "config file not found: {}",
            path.display()
        )))
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listen port (defaults to 8018).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Listen address (defaults to `127.0.0.1`).
    #[serde(default = "default_host")]
    pub host: String,
    /// Route the chat endpoint is served on (defaults to `/api/chat`).
    #[serde(default = "default_path")]
    pub path: String,
    /// Largest accepted request body; base64 images make this large.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            path: default_path(),
            max_body_bytes: default_max_body_bytes(),
            cors: CorsConfig::default(),
            log: LogConfig::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    /// Loads the full layered configuration: defaults, then the optional
    /// YAML file, then `CHATRELAY_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if any layer cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Format as _, Serialized, Yaml},
        };
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            ensure_exists(path)?;
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__")).extract()
    }

    /// Checks values that deserialize fine but cannot work at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), RelayError> {
        if !self.path.starts_with('/') {
            return Err(RelayError::Config(format!(
                "path must start with '/': {}",
                self.path
            )));
        }
        let base = &self.provider.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(RelayError::Config(format!(
                "provider.base_url must be an http(s) URL: {base}"
            )));
        }
        if self.provider.text_model.trim().is_empty()
            || self.provider.vision_model.trim().is_empty()
        {
            return Err(RelayError::Config(
                "provider.text_model and provider.vision_model must not be empty".into(),
            ));
        }
        if self.provider.max_output_tokens == 0 {
            return Err(RelayError::Config(
                "provider.max_output_tokens must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Returns a copy safe to print: the API key, if any, is masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut c = self.clone();
        if c.provider.api_key.is_some() {
            c.provider.api_key = Some(REDACTED.to_string());
        }
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = r#"
port: 9000
host: "0.0.0.0"
provider:
  endpoint: chat_completions
  api_key: "sk-test"
  text_model: "gpt-4o-mini"
"#;

    /// Defaults merged with a YAML string, without the env layer.
    fn from_yaml(yaml: &str) -> Result<Config, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    #[test]
    fn test_default_config() {
        let c = Config::default();
        assert_eq!(c.port, 8018);
        assert_eq!(c.host, "127.0.0.1");
        assert_eq!(c.path, "/api/chat");
        assert_eq!(c.provider.endpoint, Endpoint::Responses);
        assert_eq!(c.provider.text_model, "gpt-4.1-mini");
        assert_eq!(c.provider.vision_model, "gpt-4.1");
        assert_eq!(c.provider.max_output_tokens, 2000);
        assert_eq!(c.cors.allow_origin, "*");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_port_and_host() {
        let c = from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(c.port, 9000);
        assert_eq!(c.host, "0.0.0.0");
    }

    #[test]
    fn test_from_yaml_nested_provider_merges_defaults() {
        let c = from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(c.provider.endpoint, Endpoint::ChatCompletions);
        assert_eq!(c.provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(c.provider.text_model, "gpt-4o-mini");
        // untouched keys keep their defaults
        assert_eq!(c.provider.vision_model, "gpt-4.1");
        assert_eq!(c.provider.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_from_yaml_defaults_applied() {
        let c = from_yaml("port: 1234").unwrap();
        assert_eq!(c.port, 1234);
        assert_eq!(c.host, "127.0.0.1");
    }

    #[test]
    fn test_from_yaml_invalid_endpoint() {
        assert!(from_yaml("provider:\n  endpoint: bogus").is_err());
    }

    #[test]
    fn test_load_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("chatrelay.yaml", "port: 7000\nlog:\n  format: json\n")?;
            let c = Config::load(Some(Path::new("chatrelay.yaml")))?;
            assert_eq!(c.port, 7000);
            assert_eq!(c.log.format, LogFormat::Json);
            assert_eq!(c.log.level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("nope.yaml").as_path())).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_load_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("chatrelay.yaml", "port: 7000\nhost: 0.0.0.0\n")?;
            jail.set_env("CHATRELAY_PORT", "7100");
            jail.set_env("CHATRELAY_PROVIDER__ENDPOINT", "chat_completions");
            let c = Config::load(Some(Path::new("chatrelay.yaml")))?;
            assert_eq!(c.port, 7100);
            assert_eq!(c.host, "0.0.0.0");
            assert_eq!(c.provider.endpoint, Endpoint::ChatCompletions);
            Ok(())
        });
    }

    #[test]
    fn test_select_model() {
        let p = ProviderConfig::default();
        assert_eq!(p.select_model(None, false), "gpt-4.1-mini");
        assert_eq!(p.select_model(None, true), "gpt-4.1");
        assert_eq!(p.select_model(Some("o4-mini"), true), "o4-mini");
        assert_eq!(p.select_model(Some("o4-mini"), false), "o4-mini");
        assert_eq!(p.select_model(Some("  "), true), "gpt-4.1");
    }

    #[test]
    fn test_resolve_credentials_prefers_config_key() {
        let p = ProviderConfig {
            api_key: Some("sk-config".into()),
            ..Default::default()
        };
        let c = p
            .resolve_credentials(|_| Some("sk-env".into()))
            .unwrap();
        assert_eq!(c.bearer(), "Bearer sk-config");
    }

    #[test]
    fn test_resolve_credentials_from_named_variable() {
        let p = ProviderConfig {
            api_key_env: "MY_KEY".into(),
            ..Default::default()
        };
        let c = p
            .resolve_credentials(|name| (name == "MY_KEY").then(|| "sk-env".to_string()))
            .unwrap();
        assert_eq!(c.bearer(), "Bearer sk-env");
    }

    #[test]
    fn test_resolve_credentials_missing() {
        let p = ProviderConfig::default();
        assert!(p.resolve_credentials(|_| None).is_none());
        assert!(p.resolve_credentials(|_| Some(String::new())).is_none());
    }

    #[test]
    fn test_credentials_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OPENAI_API_KEY", "sk-from-env");
            let c = ProviderConfig::default().credentials_from_env().unwrap();
            assert_eq!(c.bearer(), "Bearer sk-from-env");
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut c = Config::default();
        c.path = "api/chat".into();
        assert!(c.validate().is_err());

        let mut c = Config::default();
        c.provider.base_url = "ftp://example.com".into();
        assert!(c.validate().unwrap_err().to_string().contains("base_url"));

        let mut c = Config::default();
        c.provider.max_output_tokens = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_redacted_masks_key() {
        let mut c = Config::default();
        c.provider.api_key = Some("sk-secret".into());
        let r = c.redacted();
        assert_eq!(r.provider.api_key.as_deref(), Some("[REDACTED]"));
        assert!(Config::default().redacted().provider.api_key.is_none());
    }
}

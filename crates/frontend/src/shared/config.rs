//! Client configuration
//!
//! Endpoint URLs are fixed per deployment: the embedded TOML below holds the
//! defaults and `MASTERBOT_API_BASE` (read at compile time) overrides the
//! backend base URL.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub login_path: String,
    pub upload_path: String,
    pub question_path: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionConfig {
    /// localStorage key holding the bearer token
    pub token_key: String,
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:5000"
login_path = "/login"
upload_path = "/upload"
question_path = "/"

[session]
token_key = "token"
"#;

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000".to_string(),
                login_path: "/login".to_string(),
                upload_path: "/upload".to_string(),
                question_path: "/".to_string(),
            },
            session: SessionConfig {
                token_key: "token".to_string(),
            },
        }
    }
}

/// Load configuration
///
/// Search order:
/// 1. Embedded default config
/// 2. `MASTERBOT_API_BASE` baked in at build time replaces `api.base_url`
pub fn load_config() -> Config {
    let mut config = parse_config(DEFAULT_CONFIG).unwrap_or_else(|e| {
        log::warn!("Embedded config is invalid ({}), using built-in defaults", e);
        Config::default()
    });

    if let Some(base) = option_env!("MASTERBOT_API_BASE") {
        apply_base_override(&mut config, base);
    }

    log::info!("Backend base URL: {}", config.api.base_url);
    config
}

pub fn parse_config(source: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(source)
}

fn apply_base_override(config: &mut Config, base: &str) {
    let base = base.trim().trim_end_matches('/');
    if !base.is_empty() {
        config.api.base_url = base.to_string();
    }
}

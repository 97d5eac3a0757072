//! Runtime configuration.
//!
//! Settings come from an optional `reelist.toml` next to the binary, overlaid
//! with `REELIST_*` environment variables (`__` as the section separator,
//! e.g. `REELIST_DATABASE__URL`). A `.env` file is honored before loading.

use serde::Deserialize;

use reelist_core::providers::TmdbSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub tmdb: TmdbSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3200
}

fn default_max_connections() -> u32 {
    10
}

impl Settings {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("reelist").required(false))
            .add_source(
                config::Environment::with_prefix("REELIST").separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_settings_fill_defaults() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "database": { "url": "postgres://localhost/reelist" },
            "tmdb": { "api_key": "k" },
        }))
        .unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 3200);
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.tmdb.region, "US");
        assert_eq!(settings.tmdb.base_url, "https://api.themoviedb.org/3");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "server": { "host": "127.0.0.1", "port": 8080 },
            "database": { "url": "postgres://localhost/reelist", "max_connections": 2 },
            "tmdb": { "api_key": "k", "region": "GB" },
        }))
        .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.max_connections, 2);
        assert_eq!(settings.tmdb.region, "GB");
    }
}

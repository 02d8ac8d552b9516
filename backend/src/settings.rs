//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `RECIPES_*` environment variables, and an
//! optional configuration file, in that order of precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_KETO_BASE_URL: &str = "https://keto-diet.p.rapidapi.com";
const DEFAULT_KETO_HOST: &str = "keto-diet.p.rapidapi.com";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_KETO_TIMEOUT_SECS: u64 = 15;

/// Settings controlling how the catalogue server starts.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPES")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Base URL of the keto recipes API.
    pub keto_base_url: Option<String>,
    /// Value sent as `x-rapidapi-host`.
    pub keto_host: Option<String>,
    /// Value sent as `x-rapidapi-key`.
    pub keto_api_key: Option<String>,
    /// Upstream request timeout in seconds.
    pub keto_timeout_secs: Option<u64>,
    /// Seed the demo catalogue on startup.
    #[ortho_config(default = false)]
    pub seed_demo_data: bool,
}

/// A setting that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid setting {name}: {message}")]
pub struct SettingsError {
    name: &'static str,
    message: String,
}

impl AppSettings {
    /// Return the listen address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the configured address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError {
            name: "bind_addr",
            message: err.to_string(),
        })
    }

    /// Return the database URL when one is configured and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    /// Return the keto base URL, falling back to the public RapidAPI host.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the configured URL does not parse.
    pub fn keto_base_url(&self) -> Result<url::Url, SettingsError> {
        let raw = self
            .keto_base_url
            .as_deref()
            .unwrap_or(DEFAULT_KETO_BASE_URL);
        url::Url::parse(raw).map_err(|err| SettingsError {
            name: "keto_base_url",
            message: err.to_string(),
        })
    }

    pub fn keto_host(&self) -> &str {
        self.keto_host.as_deref().unwrap_or(DEFAULT_KETO_HOST)
    }

    pub fn keto_timeout(&self) -> Duration {
        Duration::from_secs(self.keto_timeout_secs.unwrap_or(DEFAULT_KETO_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 8] = [
        "RECIPES_BIND_ADDR",
        "RECIPES_DATABASE_URL",
        "RECIPES_DB_MAX_CONNECTIONS",
        "RECIPES_KETO_BASE_URL",
        "RECIPES_KETO_HOST",
        "RECIPES_KETO_API_KEY",
        "RECIPES_KETO_TIMEOUT_SECS",
        "RECIPES_SEED_DEMO_DATA",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("recipe-catalogue")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections(), 10);
        assert_eq!(
            settings.keto_base_url().expect("default url").as_str(),
            "https://keto-diet.p.rapidapi.com/"
        );
        assert_eq!(settings.keto_host(), "keto-diet.p.rapidapi.com");
        assert!(settings.keto_api_key.is_none());
        assert_eq!(settings.keto_timeout(), Duration::from_secs(15));
        assert!(!settings.seed_demo_data);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("RECIPES_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "RECIPES_DATABASE_URL",
                Some("postgres://localhost/recipes".to_owned()),
            ),
            ("RECIPES_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("RECIPES_KETO_BASE_URL", Some("http://127.0.0.1:1".to_owned())),
            ("RECIPES_KETO_HOST", Some("keto.test".to_owned())),
            ("RECIPES_KETO_API_KEY", Some("secret".to_owned())),
            ("RECIPES_KETO_TIMEOUT_SECS", Some("2".to_owned())),
            ("RECIPES_SEED_DEMO_DATA", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/recipes"));
        assert_eq!(settings.db_max_connections(), 4);
        assert_eq!(settings.keto_host(), "keto.test");
        assert_eq!(settings.keto_api_key.as_deref(), Some("secret"));
        assert_eq!(settings.keto_timeout(), Duration::from_secs(2));
        assert!(settings.seed_demo_data);
    }

    #[rstest]
    #[case("RECIPES_BIND_ADDR", "not-an-address")]
    #[case("RECIPES_KETO_BASE_URL", "::nope")]
    fn malformed_values_are_reported(#[case] key: &'static str, #[case] value: &str) {
        let mut vars = KEYS.map(|name| (name, None::<String>));
        for var in &mut vars {
            if var.0 == key {
                var.1 = Some(value.to_owned());
            }
        }
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        let failed = settings.bind_addr().is_err() || settings.keto_base_url().is_err();
        assert!(failed, "{key} should not parse");
    }

    #[rstest]
    fn blank_database_urls_select_memory() {
        let _guard = lock_env([("RECIPES_DATABASE_URL", Some("   ".to_owned()))]);
        assert!(load_from_empty_args().database_url().is_none());
    }
}

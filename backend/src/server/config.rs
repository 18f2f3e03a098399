//! Environment-driven server configuration.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use patrimap::outbound::persistence::StoreConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAPS_DIR: &str = "maps";

/// Failures while reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `PATRIMAP_BIND_ADDR` is not a valid socket address.
    #[error("invalid bind address {value:?}")]
    InvalidBindAddr { value: String },
    /// Neither `DATABASE_URL` nor the discrete `PATRIMAP_DB_*` variables are
    /// fully set.
    #[error("store configuration missing: set DATABASE_URL or {missing}")]
    MissingStoreConfig { missing: &'static str },
}

/// Server configuration assembled at bootstrap.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub cookie_secure: bool,
    pub maps_dir: PathBuf,
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_raw = env::var("PATRIMAP_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr { value: bind_raw })?;

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);

        let maps_dir =
            PathBuf::from(env::var("PATRIMAP_MAPS_DIR").unwrap_or_else(|_| DEFAULT_MAPS_DIR.into()));

        let store = store_config_from_env()?;

        Ok(Self {
            bind_addr,
            cookie_secure,
            maps_dir,
            store,
        })
    }
}

fn store_config_from_env() -> Result<StoreConfig, ConfigError> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Ok(StoreConfig::new(url));
    }

    let part = |name: &'static str| {
        env::var(name).map_err(|_| ConfigError::MissingStoreConfig { missing: name })
    };
    let host = part("PATRIMAP_DB_HOST")?;
    let user = part("PATRIMAP_DB_USER")?;
    let password = part("PATRIMAP_DB_PASSWORD")?;
    let database = part("PATRIMAP_DB_NAME")?;
    Ok(StoreConfig::from_parts(&host, &user, &password, &database))
}

//! Typed settings: built-in defaults, optional file, then environment.
//!
//! Environment variables use the `STOREFRONT` prefix and `__` as the section
//! separator, e.g. `STOREFRONT__CACHE__URL=redis://localhost:6379` or
//! `STOREFRONT__SERVER__PORT=8080`.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

use crate::cache::RouteTtls;
use crate::middleware::{RateLimiter, RequestLimits};

const DEFAULT_CONFIG_BASENAME: &str = "storefront";
const ENV_PREFIX: &str = "STOREFRONT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub cache: CacheSettings,
    pub catalog: CatalogSettings,
    pub limits: LimitSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS; empty allows none.
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| ConfigError::Message(format!("invalid server.host '{}': {e}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Configuracion del cache de respuestas.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// `memory://` o `redis://...`. Ausente o vacio deshabilita el cache.
    pub url: Option<String>,
    /// Bytes maximos del store en memoria, keys incluidas (default: 64 MiB)
    pub memory_max_bytes: u64,
    /// Respuestas mas grandes no se cachean (default: 1 MiB)
    pub max_body_bytes: usize,
    pub connect_timeout_ms: u64,
    pub command_timeout_ms: u64,
    pub ttl: TtlSettings,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            url: None,
            memory_max_bytes: 64 * 1024 * 1024,
            max_body_bytes: 1024 * 1024,
            connect_timeout_ms: 10_000,
            command_timeout_ms: 5_000,
            ttl: TtlSettings::default(),
        }
    }
}

impl CacheSettings {
    /// The configured url, with blank values treated as absent.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// TTLs por ruta, en segundos. Una ruta en 0 toma `default_secs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TtlSettings {
    pub default_secs: u64,
    pub product_list_secs: u64,
    pub product_detail_secs: u64,
    pub category_list_secs: u64,
}

impl Default for TtlSettings {
    fn default() -> Self {
        Self {
            default_secs: 300,
            product_list_secs: 120,
            product_detail_secs: 300,
            category_list_secs: 600,
        }
    }
}

impl From<&TtlSettings> for RouteTtls {
    fn from(ttl: &TtlSettings) -> Self {
        // 0 en una ruta = usar el TTL por defecto
        let route = |secs: u64| match secs {
            0 => Duration::from_secs(ttl.default_secs),
            secs => Duration::from_secs(secs),
        };
        Self {
            default: Duration::from_secs(ttl.default_secs),
            product_list: route(ttl.product_list_secs),
            product_detail: route(ttl.product_detail_secs),
            category_list: route(ttl.category_list_secs),
        }
    }
}

/// Rate limiting por cliente y tamano maximo del body.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    pub rate_limit_enabled: bool,
    pub api_window_secs: u64,
    pub api_max_requests: u32,
    pub orders_window_secs: u64,
    pub orders_max_requests: u32,
    /// Bodies mas grandes responden 413 (default: 10 MiB)
    pub max_body_bytes: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            rate_limit_enabled: true,
            api_window_secs: 15 * 60,
            api_max_requests: 100,
            orders_window_secs: 60 * 60,
            orders_max_requests: 10,
            max_body_bytes: RequestLimits::DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl From<&LimitSettings> for RequestLimits {
    fn from(limits: &LimitSettings) -> Self {
        let limiter = |name: &'static str, secs: u64, max: u32| {
            limits
                .rate_limit_enabled
                .then(|| RateLimiter::with_default_message(name, Duration::from_secs(secs), max))
        };
        Self {
            api: limiter("api", limits.api_window_secs, limits.api_max_requests),
            orders: limiter("orders", limits.orders_window_secs, limits.orders_max_requests),
            max_body_bytes: limits.max_body_bytes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Load the sample catalog at startup.
    pub seed: bool,
}

impl Settings {
    /// Loads defaults, then `file` (or `storefront.{toml,yaml,json}` in the
    /// working directory when present), then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = match file {
            Some(path) => Config::builder().add_source(File::from(path)),
            None => Config::builder()
                .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false)),
        };

        let env = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("server.cors_origins")
            .try_parsing(true);

        Self::from_builder(builder.add_source(env))
    }

    /// Builds settings from an arbitrary builder; missing keys keep defaults.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

use std::{env, fmt::Debug, io::Write};

use actix_web::cookie::Key;
use log::*;
use sag_common::{helpers::parse_boolean_flag, Secret};
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_SAG_HOST: &str = "127.0.0.1";
const DEFAULT_SAG_PORT: u16 = 8480;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/sag_store.db";
const DEFAULT_COOKIE_NAME: &str = "sag_session";
const DEFAULT_TEMPLATE_DIR: &str = "templates";
const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session: SessionConfig,
    /// Shared secret protecting the internal API endpoints (new-order alerts and order completion). `None` leaves
    /// them open, which is the storefront's historical behavior.
    pub api_secret: Option<Secret<String>>,
    /// Directory the page templates are loaded from at startup.
    pub template_dir: String,
    /// Directory served as static assets under `/admin`.
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SAG_HOST.to_string(),
            port: DEFAULT_SAG_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            session: SessionConfig::default(),
            api_secret: None,
            template_dir: DEFAULT_TEMPLATE_DIR.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SAG_HOST").ok().unwrap_or_else(|| DEFAULT_SAG_HOST.into());
        let port = env::var("SAG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SAG_PORT. {e} Using the default, {DEFAULT_SAG_PORT}, instead."
                    );
                    DEFAULT_SAG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SAG_PORT);
        let database_url = env::var("SAG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ SAG_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}, instead.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let session = SessionConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the session configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            SessionConfig::default()
        });
        let api_secret = match env::var("SAG_ADMIN_API_SECRET") {
            Ok(s) if !s.is_empty() => {
                info!("🪛️ The internal API endpoints require the configured API key.");
                Some(Secret::new(s))
            },
            _ => {
                info!(
                    "🪛️ SAG_ADMIN_API_SECRET is not set. The internal API endpoints (new-order alerts, order \
                     completion) accept unauthenticated requests."
                );
                None
            },
        };
        let template_dir = env::var("SAG_TEMPLATE_DIR").ok().unwrap_or_else(|| DEFAULT_TEMPLATE_DIR.into());
        let static_dir = env::var("SAG_STATIC_DIR").ok().unwrap_or_else(|| DEFAULT_STATIC_DIR.into());
        Self { host, port, database_url, session, api_secret, template_dir, static_dir }
    }
}

//-------------------------------------------------  SessionConfig  ---------------------------------------------------
/// Cookie-session settings. The key signs and encrypts the session cookie that carries the logged-in user id; the
/// login flow that issues that cookie lives in the storefront's authentication system, not here.
#[derive(Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// If true, the session cookie is only sent over TLS. Enable this in production.
    pub cookie_secure: bool,
    pub key: Key,
}

impl Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionConfig {{ cookie_name: {}, cookie_secure: {}, key: **** }}", self.cookie_name, self.cookie_secure)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The session key has not been set. I'm using a random value for this session. DO NOT operate on \
             production like this since every admin will be logged out on restart. 🚨️🚨️🚨️"
        );
        let key = Key::generate();
        match &mut tmpfile {
            Some((f, p)) => match f.write_all(key.master()) {
                Ok(()) => warn!(
                    "🚨️🚨️🚨️ The session key for this run was written to {}. If this is a production instance, you \
                     are doing it wrong! Set the SAG_SESSION_KEY environment variable instead. 🚨️🚨️🚨️",
                    p.to_str().unwrap_or("???")
                ),
                Err(e) => warn!("🪛️ Could not write the session key to the temporary file. {e}"),
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the session key.");
            },
        }
        let cookie_secure = parse_boolean_flag(env::var("SAG_SECURE_COOKIES").ok(), false);
        Self { cookie_name: DEFAULT_COOKIE_NAME.to_string(), cookie_secure, key }
    }
}

impl SessionConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let key_material =
            env::var("SAG_SESSION_KEY").map_err(|e| ServerError::ConfigurationError(format!("{e} [SAG_SESSION_KEY]")))?;
        if key_material.len() < 32 {
            return Err(ServerError::ConfigurationError(
                "SAG_SESSION_KEY must be at least 32 bytes of key material.".to_string(),
            ));
        }
        let key = Key::derive_from(key_material.as_bytes());
        let cookie_name = env::var("SAG_SESSION_COOKIE_NAME").ok().unwrap_or_else(|| DEFAULT_COOKIE_NAME.into());
        let cookie_secure = parse_boolean_flag(env::var("SAG_SECURE_COOKIES").ok(), false);
        Ok(Self { cookie_name, cookie_secure, key })
    }
}

//-------------------------------------------------  ApiKeyPolicy  ----------------------------------------------------
/// The trust policy for the internal API endpoints, extracted from the configuration so handlers don't carry the
/// whole config around.
#[derive(Clone, Debug, Default)]
pub struct ApiKeyPolicy {
    pub secret: Option<Secret<String>>,
}

impl ApiKeyPolicy {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { secret: config.api_secret.clone() }
    }

    /// No API key required; requests are accepted as-is.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn with_secret(secret: &str) -> Self {
        Self { secret: Some(Secret::new(secret.to_string())) }
    }
}

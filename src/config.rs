use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::application::checkout::{CheckoutSettings, DEFAULT_EMAIL_DOMAIN, DEFAULT_PICKUP_CODE};

pub const DEFAULT_HERE_CENTER: (f64, f64) = (10.7966, 106.6751);
pub const DEFAULT_HERE_RADIUS_M: u32 = 10_000;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub shop_api_url: String,
    pub channel_token: Option<String>,
    pub email_domain: String,
    pub pickup_code: String,
    pub here_api_key: Option<String>,
    pub here_center: (f64, f64),
    pub here_radius_m: u32,
    pub read_timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let shop_api_url = var("SHOP_API_URL").ok_or(ConfigError::Missing("SHOP_API_URL"))?;
        let lat = parse_or(&var, "HERE_CENTER_LAT", DEFAULT_HERE_CENTER.0)?;
        let lng = parse_or(&var, "HERE_CENTER_LNG", DEFAULT_HERE_CENTER.1)?;
        let read_timeout_ms = parse_or(
            &var,
            "READ_TIMEOUT_MS",
            DEFAULT_READ_TIMEOUT.as_millis() as u64,
        )?;

        Ok(Config {
            shop_api_url,
            channel_token: var("VENDURE_TOKEN"),
            email_domain: var("STOREFRONT_EMAIL_DOMAIN")
                .unwrap_or_else(|| DEFAULT_EMAIL_DOMAIN.to_string()),
            pickup_code: var("PICKUP_METHOD_CODE")
                .unwrap_or_else(|| DEFAULT_PICKUP_CODE.to_string()),
            here_api_key: var("HERE_API_KEY"),
            here_center: (lat, lng),
            here_radius_m: parse_or(&var, "HERE_RADIUS_M", DEFAULT_HERE_RADIUS_M)?,
            read_timeout: Duration::from_millis(read_timeout_ms),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&var, "PORT", 8080)?,
        })
    }

    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            email_domain: self.email_domain.clone(),
            pickup_code: self.pickup_code.clone(),
        }
    }
}

fn parse_or<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use rust_decimal::Decimal;
use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_JWT_AUDIENCE: &str = "authenticated";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:8081";

/// Platform commission applied when `platform_settings` has no override.
pub const DEFAULT_COMMISSION_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid {
        name: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub webhook_secret: String,
    pub default_commission_rate: Decimal,
    pub cors_allowed_origins: String,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default_commission_rate = match env::var("DEFAULT_COMMISSION_RATE") {
            Ok(raw) => {
                let rate: Decimal = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "DEFAULT_COMMISSION_RATE",
                    value: raw.clone(),
                })?;
                if rate < Decimal::ZERO || rate >= Decimal::ONE {
                    return Err(ConfigError::Invalid {
                        name: "DEFAULT_COMMISSION_RATE",
                        value: raw,
                    });
                }
                rate
            }
            Err(_) => DEFAULT_COMMISSION_RATE,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: parsed("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parsed("PORT", DEFAULT_PORT)?,
            max_connections: parsed("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_audience: env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| DEFAULT_JWT_AUDIENCE.to_string()),
            webhook_secret: required("PAYMENT_WEBHOOK_SECRET")?,
            default_commission_rate,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
            production: env::var("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_commission_rate_is_fifteen_percent() {
        assert_eq!(DEFAULT_COMMISSION_RATE, "0.15".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_socket_addr_uses_host_and_port() {
        let config = Config {
            database_url: "postgres://localhost/fairway".to_string(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 4000,
            max_connections: 5,
            jwt_secret: "secret".to_string(),
            jwt_audience: DEFAULT_JWT_AUDIENCE.to_string(),
            webhook_secret: "hook".to_string(),
            default_commission_rate: DEFAULT_COMMISSION_RATE,
            cors_allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
            production: false,
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:4000");
    }
}

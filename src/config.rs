use std::net::SocketAddr;

use anyhow::Context;

/// Upper bound for `JWT_TTL_MINUTES`, one year.
pub const MAX_TTL_MINUTES: u32 = 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "authgate".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "authgate-users".into()),
            ttl_minutes: match std::env::var("JWT_TTL_MINUTES") {
                Ok(v) => parse_ttl_minutes(&v)?,
                Err(_) => 60,
            },
        };
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            jwt,
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn parse_ttl_minutes(raw: &str) -> anyhow::Result<u32> {
    let minutes = raw
        .trim()
        .parse::<u32>()
        .with_context(|| format!("JWT_TTL_MINUTES must be a whole number of minutes, got {raw:?}"))?;
    anyhow::ensure!(
        (1..=MAX_TTL_MINUTES).contains(&minutes),
        "JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}"
    );
    Ok(minutes)
}

use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use depotbook_core::constants::DEFAULT_GROWTH_RATE;
use depotbook_core::portfolio::parse_rate;
use rust_decimal::Decimal;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Rate of the projection appended by the `Add` comparison action
    pub default_growth_rate: Decimal,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("DEPOT_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid DEPOT_LISTEN_ADDR")?;
        let db_path = std::env::var("DEPOT_DB_PATH").unwrap_or_else(|_| "./db/depot.db".into());
        let cors_allow = std::env::var("DEPOT_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("DEPOT_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let default_growth_rate = std::env::var("DEPOT_DEFAULT_GROWTH_RATE")
            .ok()
            .and_then(|raw| parse_rate(&raw).ok())
            .unwrap_or_else(Self::fallback_growth_rate);
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            default_growth_rate,
        })
    }

    pub fn fallback_growth_rate() -> Decimal {
        parse_rate(DEFAULT_GROWTH_RATE).unwrap_or(Decimal::ZERO)
    }
}

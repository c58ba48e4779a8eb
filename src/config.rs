//! Runtime configuration for the football stats server.

use anyhow::{anyhow, Result};
use std::env;

use crate::auth::password::{MAX_COST, MIN_COST};

#[derive(Debug, Clone)]
pub struct Settings {
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Single origin allowed by CORS.
    pub client_url: String,
    pub bcrypt_cost: u32,
    /// Bearer token lifetime (days).
    pub token_ttl_days: i64,
    pub admin: Option<AdminSeed>,
}

/// Account created at startup when `ADMIN_EMAIL` and `ADMIN_PASSWORD` are set.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET").ok_or_else(|| anyhow!("JWT_SECRET must be set"))?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);

        let port = lookup("PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5000);

        let bcrypt_cost = lookup("BCRYPT_COST")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|c| (MIN_COST..=MAX_COST).contains(c))
            .unwrap_or(10);

        let token_ttl_days = lookup("TOKEN_TTL_DAYS")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|d| *d > 0)
            .unwrap_or(7);

        let admin = match (non_empty("ADMIN_EMAIL"), non_empty("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: non_empty("ADMIN_NAME").unwrap_or_else(|| "Administrator".into()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Settings {
            jwt_secret,
            database_url: non_empty("DATABASE_URL"),
            database_max_connections,
            host: non_empty("HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port,
            client_url: non_empty("CLIENT_URL").unwrap_or_else(|| "http://localhost:3000".into()),
            bcrypt_cost,
            token_ttl_days,
            admin,
        })
    }
}

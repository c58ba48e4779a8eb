//! Idempotent table bootstrap for the Postgres backend.

use anyhow::{Context, Result};
use sqlx::PgPool;

const STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
           id            UUID PRIMARY KEY,
           name          TEXT NOT NULL,
           email         TEXT NOT NULL UNIQUE,
           password_hash TEXT NOT NULL,
           role          TEXT NOT NULL DEFAULT 'user',
           created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
           seq           BIGSERIAL
       )"#,
    r#"CREATE TABLE IF NOT EXISTS players (
           id           UUID PRIMARY KEY,
           name         TEXT NOT NULL,
           position     TEXT NOT NULL,
           team         TEXT NOT NULL,
           age          INTEGER NOT NULL CHECK (age BETWEEN 16 AND 50),
           nationality  TEXT NOT NULL,
           goals        INTEGER NOT NULL DEFAULT 0 CHECK (goals >= 0),
           assists      INTEGER NOT NULL DEFAULT 0 CHECK (assists >= 0),
           matches      INTEGER NOT NULL DEFAULT 0 CHECK (matches >= 0),
           yellow_cards INTEGER NOT NULL DEFAULT 0 CHECK (yellow_cards >= 0),
           red_cards    INTEGER NOT NULL DEFAULT 0 CHECK (red_cards >= 0),
           market_value DOUBLE PRECISION NOT NULL DEFAULT 0 CHECK (market_value >= 0),
           created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
           updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
           seq          BIGSERIAL
       )"#,
    // Tables created before the insertion-order column existed.
    "ALTER TABLE users ADD COLUMN IF NOT EXISTS seq BIGSERIAL",
    "ALTER TABLE players ADD COLUMN IF NOT EXISTS seq BIGSERIAL",
    "CREATE INDEX IF NOT EXISTS players_created_at_idx ON players (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS users_created_at_idx ON users (created_at)",
];

/// Create the `users` and `players` tables if they do not exist yet.
pub async fn ensure(db: &PgPool) -> Result<()> {
    for stmt in STATEMENTS {
        sqlx::query(stmt)
            .execute(db)
            .await
            .context("creating database schema")?;
    }
    log::info!("database schema ready");
    Ok(())
}

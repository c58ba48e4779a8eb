//! bcrypt hashing, run on tokio's blocking pool so the work factor never
//! stalls the request executor.

use anyhow::Context;

use crate::error::Result;

/// Password assigned to accounts an admin creates without one.
pub const DEFAULT_PASSWORD: &str = "password123";

/// Work-factor bounds accepted by bcrypt.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, plain: &str) -> Result<String> {
        let plain = plain.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
            .await
            .context("password hashing task failed")?
            .context("hashing password")?;
        Ok(hashed)
    }

    pub async fn verify(&self, plain: &str, hash: &str) -> Result<bool> {
        let plain = plain.to_owned();
        let hash = hash.to_owned();
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
            .await
            .context("password verification task failed")?
            .context("verifying password")?;
        Ok(ok)
    }
}

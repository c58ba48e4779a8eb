//! Credentials: bearer tokens, password hashing and the startup admin seed.

pub mod password;
pub mod token;

pub use password::{PasswordHasher, DEFAULT_PASSWORD};
pub use token::TokenService;

use crate::config::AdminSeed;
use crate::db::models::{NewUser, Role};
use crate::db::{validation, UserStore};
use crate::error::Result;

/// Create the configured admin account unless its email is already taken.
pub async fn seed_admin(
    users: &dyn UserStore,
    hasher: &PasswordHasher,
    seed: &AdminSeed,
) -> Result<()> {
    let email = validation::normalize_email(&seed.email)?;
    if users.find_by_email(&email).await?.is_some() {
        log::info!("admin account {email} already present");
        return Ok(());
    }

    let password_hash = hasher.hash(&seed.password).await?;
    let admin = users
        .insert(NewUser {
            name: seed.name.clone(),
            email,
            password_hash,
            role: Role::Admin,
        })
        .await?;
    log::info!("seeded admin account {} ({})", admin.email, admin.id);
    Ok(())
}

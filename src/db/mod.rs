//! Record stores for users and players.
//!
//! Handlers only see the [`UserStore`] / [`PlayerStore`] traits; the concrete
//! backend is picked at startup (in-memory when no database is configured,
//! Postgres otherwise).

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;

pub mod memory;
pub mod models;
pub mod player_repo;
pub mod schema;
pub mod user_repo;
pub mod validation;

use models::{NewUser, Player, PlayerFields, User, UserPatch};
use validation::PlayerPayload;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Fails with `DuplicateEmail` if the email is already registered.
    async fn insert(&self, user: NewUser) -> Result<User>;

    /// Apply the fields present in `patch`, leaving the rest untouched.
    /// Fails with `NotFound` or `DuplicateEmail`.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User>;

    /// Replace only the password hash. Fails with `NotFound`.
    async fn set_password(&self, id: Uuid, password_hash: String) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// All accounts in insertion order.
    async fn list_all(&self) -> Result<Vec<User>>;

    /// Cheap reachability probe for `/api/healthz`.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Newest first.
    async fn list_all(&self) -> Result<Vec<Player>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Player>>;

    async fn insert(&self, fields: PlayerFields) -> Result<Player>;

    /// Merge `patch` into the stored record, re-validate and refresh
    /// `updated_at`. Fails with `NotFound` or `Validation`.
    async fn update(&self, id: Uuid, patch: PlayerPayload) -> Result<Player>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Case-insensitive substring search over name, team, position and
    /// nationality, newest first.
    async fn search(&self, query: &str) -> Result<Vec<Player>>;
}

/// The pair of stores a server instance runs against.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub players: Arc<dyn PlayerStore>,
    /// `true` for the in-memory backend.
    pub ephemeral: bool,
}

impl Stores {
    pub fn memory() -> Self {
        Stores {
            users: Arc::new(memory::MemoryUserStore::default()),
            players: Arc::new(memory::MemoryPlayerStore::default()),
            ephemeral: true,
        }
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Stores {
            users: Arc::new(user_repo::PgUserStore::new(pool.clone())),
            players: Arc::new(player_repo::PgPlayerStore::new(pool)),
            ephemeral: false,
        }
    }
}

use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::db::{PlayerStore, Stores, UserStore};

/// Shared per-process state handed to every handler via `web::Data`.
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub players: Arc<dyn PlayerStore>,
    pub tokens: TokenService,
    pub passwords: PasswordHasher,
    /// In-memory backend; surfaced on `GET /`.
    pub demo_mode: bool,
}

impl AppState {
    pub fn new(stores: Stores, tokens: TokenService, passwords: PasswordHasher) -> Self {
        AppState {
            users: stores.users,
            players: stores.players,
            tokens,
            passwords,
            demo_mode: stores.ephemeral,
        }
    }
}

pub mod auth;
pub mod error;
pub mod health;
pub mod players;
pub mod routes;
pub mod state;
pub mod users;

pub use state::AppState;

use actix_cors::Cors;

/// CORS policy admitting only the configured client origin.
pub fn cors(client_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(client_url)
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

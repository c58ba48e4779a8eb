//! Shared fixtures: an in-memory app with a cheap bcrypt cost.

#![allow(dead_code)]

use actix_web::web;
use chrono::Duration;
use football_stats_server::auth::{PasswordHasher, TokenService};
use football_stats_server::db::Stores;
use football_stats_server::http::AppState;
use serde_json::{json, Value};

pub const SECRET: &str = "integration-test-secret";

pub fn state() -> web::Data<AppState> {
    web::Data::new(AppState::new(
        Stores::memory(),
        TokenService::new(SECRET, Duration::days(7)),
        PasswordHasher::new(football_stats_server::auth::password::MIN_COST),
    ))
}

/// `init_service` over the full router for the given state.
#[macro_export]
macro_rules! app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .configure(football_stats_server::http::routes::init_routes),
        )
        .await
    };
}

/// Send `req` and return the status together with the decoded JSON body
/// (`Value::Null` for empty or non-JSON bodies).
#[macro_export]
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let bytes = actix_web::test::read_body(resp).await;
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }};
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

pub fn register_body(name: &str, email: &str, role: &str) -> Value {
    json!({ "name": name, "email": email, "password": "pw123456", "role": role })
}

pub fn player_body(name: &str, team: &str, age: i64) -> Value {
    json!({
        "name": name,
        "position": "Midfielder",
        "team": team,
        "age": age,
        "nationality": "Spain",
        "stats": { "goals": 10, "assists": 7, "matches": 40, "yellowCards": 3, "redCards": 0 },
        "marketValue": 90000000.0
    })
}

/// Register through the API; yields `(token, user_id)`.
#[macro_export]
macro_rules! register {
    ($app:expr, $name:expr, $email:expr, $role:expr) => {{
        let (status, body) = send!(
            $app,
            actix_web::test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json($crate::common::register_body($name, $email, $role))
        );
        assert_eq!(status, actix_web::http::StatusCode::CREATED, "{body}");
        (
            body["token"].as_str().unwrap().to_owned(),
            body["user"]["id"].as_str().unwrap().to_owned(),
        )
    }};
}

//! Player records: reads for any signed-in user, writes for admins.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::db::models::Player;
use crate::db::validation::PlayerPayload;
use crate::error::{Error, Result};
use crate::http::auth::{AdminUser, AuthUser};
use crate::http::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerEnvelope {
    pub message: String,
    pub player: Player,
}

/// Identifiers that do not parse cannot name a stored record.
pub(crate) fn parse_id(raw: &str, entity: &'static str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| Error::NotFound(entity))
}

/// GET /api/players
#[get("/players")]
pub async fn list(_auth: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse> {
    let players = state.players.list_all().await?;
    Ok(HttpResponse::Ok().json(players))
}

/// GET /api/players/search/{query}
#[get("/players/search/{query}")]
pub async fn search(
    _auth: AuthUser,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let players = state.players.search(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(players))
}

/// GET /api/players/{id}
#[get("/players/{id}")]
pub async fn get_one(
    _auth: AuthUser,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = parse_id(&path, "Player")?;
    let player = state
        .players
        .find_by_id(id)
        .await?
        .ok_or(Error::NotFound("Player"))?;
    Ok(HttpResponse::Ok().json(player))
}

/// POST /api/players
#[post("/players")]
pub async fn create(
    admin: AdminUser,
    body: web::Json<PlayerPayload>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let fields = body.into_inner().validate()?;
    let player = state.players.insert(fields).await?;
    log::info!("player {} ({}) created by {}", player.name, player.id, admin.0.id);

    Ok(HttpResponse::Created().json(PlayerEnvelope {
        message: "Player created successfully".into(),
        player,
    }))
}

/// PUT /api/players/{id}
#[put("/players/{id}")]
pub async fn update(
    admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<PlayerPayload>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = parse_id(&path, "Player")?;
    let player = state.players.update(id, body.into_inner()).await?;
    log::info!("player {} updated by {}", player.id, admin.0.id);

    Ok(HttpResponse::Ok().json(PlayerEnvelope {
        message: "Player updated successfully".into(),
        player,
    }))
}

/// DELETE /api/players/{id}
#[delete("/players/{id}")]
pub async fn remove(
    admin: AdminUser,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = parse_id(&path, "Player")?;
    state.players.delete(id).await?;
    log::info!("player {id} deleted by {}", admin.0.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Player deleted successfully" })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // `search` before `get_one` so the literal segment wins.
    cfg.service(list)
        .service(search)
        .service(get_one)
        .service(create)
        .service(update)
        .service(remove);
}

//! Admin-only account management.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::DEFAULT_PASSWORD;
use crate::db::models::{NewUser, Role, UserPatch, UserView};
use crate::db::validation;
use crate::error::{Error, Result};
use crate::http::auth::AdminUser;
use crate::http::players::parse_id;
use crate::http::AppState;

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
    /// Falls back to the shared default password when absent.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub message: String,
    pub user: UserView,
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// GET /api/users
#[get("/users")]
pub async fn list(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse> {
    let users: Vec<UserView> = state
        .users
        .list_all()
        .await?
        .iter()
        .map(UserView::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/{id}
#[get("/users/{id}")]
pub async fn get_one(
    _admin: AdminUser,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = parse_id(&path, "User")?;
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(Error::NotFound("User"))?;
    Ok(HttpResponse::Ok().json(UserView::from(&user)))
}

/// POST /api/users
#[post("/users")]
pub async fn create(
    admin: AdminUser,
    body: web::Json<CreateUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = body.into_inner();
    let name = validation::account_name(&req.name)?;
    let email = validation::normalize_email(&req.email)?;
    let password = match req.password.as_deref() {
        Some(p) => {
            validation::password(p, "password")?;
            p
        }
        None => DEFAULT_PASSWORD,
    };

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(Error::DuplicateEmail);
    }

    let password_hash = state.passwords.hash(password).await?;
    let user = state
        .users
        .insert(NewUser {
            name,
            email,
            password_hash,
            role: req.role.unwrap_or_default(),
        })
        .await?;
    log::info!("user {} ({}) created by {}", user.email, user.id, admin.0.id);

    Ok(HttpResponse::Created().json(UserEnvelope {
        message: "User created successfully".into(),
        user: UserView::from(&user),
    }))
}

/// PUT /api/users/{id}
#[put("/users/{id}")]
pub async fn update(
    admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = parse_id(&path, "User")?;
    let req = body.into_inner();
    let patch = UserPatch {
        name: req.name.as_deref().map(validation::account_name).transpose()?,
        email: req.email.as_deref().map(validation::normalize_email).transpose()?,
        role: req.role,
    };

    let user = state.users.update(id, patch).await?;
    log::info!("user {} updated by {}", user.id, admin.0.id);

    Ok(HttpResponse::Ok().json(UserEnvelope {
        message: "User updated successfully".into(),
        user: UserView::from(&user),
    }))
}

/// DELETE /api/users/{id}
#[delete("/users/{id}")]
pub async fn remove(
    admin: AdminUser,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = parse_id(&path, "User")?;
    if id == admin.0.id {
        return Err(Error::InvalidOperation("Cannot delete your own account"));
    }
    state.users.delete(id).await?;
    log::info!("user {id} deleted by {}", admin.0.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(get_one)
        .service(create)
        .service(update)
        .service(remove);
}

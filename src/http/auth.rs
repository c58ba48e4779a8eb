//! Account endpoints (register / login / me / change-password) and the
//! bearer-token extractors every protected route relies on.

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::models::{NewUser, Role, UserView};
use crate::db::validation;
use crate::error::{Error, Result};
use crate::http::AppState;

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserView,
}

//////////////////////////////////////////////////
// ───────────  AuthUser / AdminUser  ───────────
//////////////////////////////////////////////////

pub mod extractor {
    use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
    use futures_util::future::LocalBoxFuture;

    use crate::db::models::User;
    use crate::error::Error;
    use crate::http::AppState;

    const NO_TOKEN: &str = "No token, authorization denied";
    const BAD_TOKEN: &str = "Token is not valid";

    /// The account behind a valid `Authorization: Bearer <JWT>` header.
    #[derive(Debug, Clone)]
    pub struct AuthUser(pub User);

    /// An [`AuthUser`] whose role is admin.
    #[derive(Debug, Clone)]
    pub struct AdminUser(pub User);

    impl FromRequest for AuthUser {
        type Error = Error;
        type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            let state = req.app_data::<web::Data<AppState>>().cloned();
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(|t| t.trim().to_owned())
                .filter(|t| !t.is_empty());

            Box::pin(async move {
                let state = state
                    .ok_or_else(|| Error::Internal(anyhow::anyhow!("application state missing")))?;
                let token = token.ok_or(Error::Unauthenticated(NO_TOKEN))?;
                let user_id = state.tokens.verify(&token)?;

                match state.users.find_by_id(user_id).await? {
                    Some(user) => Ok(AuthUser(user)),
                    None => {
                        log::debug!("token for unknown user {user_id}");
                        Err(Error::Unauthenticated(BAD_TOKEN))
                    }
                }
            })
        }
    }

    impl FromRequest for AdminUser {
        type Error = Error;
        type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, pl: &mut Payload) -> Self::Future {
            let auth = AuthUser::from_request(req, pl);
            Box::pin(async move {
                let AuthUser(user) = auth.await?;
                if user.is_admin() {
                    Ok(AdminUser(user))
                } else {
                    log::debug!("user {} denied admin route", user.id);
                    Err(Error::Forbidden)
                }
            })
        }
    }
}
pub use extractor::{AdminUser, AuthUser};

//////////////////////////////////////////////////
// POST /api/auth/register
//////////////////////////////////////////////////
#[post("/auth/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = body.into_inner();
    let name = validation::account_name(&req.name)?;
    let email = validation::normalize_email(&req.email)?;
    validation::password(&req.password, "password")?;

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(Error::DuplicateEmail);
    }

    let password_hash = state.passwords.hash(&req.password).await?;
    let user = state
        .users
        .insert(NewUser {
            name,
            email,
            password_hash,
            role: req.role.unwrap_or_default(),
        })
        .await?;
    let token = state.tokens.issue(user.id)?;
    log::info!("registered user {} ({})", user.email, user.id);

    Ok(HttpResponse::Created().json(TokenResponse {
        message: "User created successfully".into(),
        token,
        user: UserView::from(&user),
    }))
}

//////////////////////////////////////////////////
// POST /api/auth/login
//////////////////////////////////////////////////
#[post("/auth/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    // Unparseable emails cannot belong to an account.
    let Ok(email) = validation::normalize_email(&body.email) else {
        return Err(Error::InvalidCredentials);
    };
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(Error::InvalidCredentials)?;

    if !state.passwords.verify(&body.password, &user.password_hash).await? {
        return Err(Error::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        message: "Login successful".into(),
        token,
        user: UserView::from(&user),
    }))
}

//////////////////////////////////////////////////
// GET /api/auth/me
//////////////////////////////////////////////////
#[get("/auth/me")]
pub async fn me(auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        user: UserView::from(&auth.0),
    })
}

//////////////////////////////////////////////////
// PUT /api/auth/change-password
//////////////////////////////////////////////////
#[put("/auth/change-password")]
pub async fn change_password(
    auth: AuthUser,
    body: web::Json<ChangePasswordRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let AuthUser(user) = auth;
    if !state
        .passwords
        .verify(&body.current_password, &user.password_hash)
        .await?
    {
        return Err(Error::PasswordMismatch);
    }
    validation::password(&body.new_password, "newPassword")?;

    let password_hash = state.passwords.hash(&body.new_password).await?;
    state.users.set_password(user.id, password_hash).await?;
    log::info!("user {} changed password", user.id);

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Password changed successfully" })))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(me)
        .service(change_password);
}

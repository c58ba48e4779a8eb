use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use chrono::Duration;
use football_stats_server::auth::{self, PasswordHasher, TokenService};
use football_stats_server::config::Settings;
use football_stats_server::db::{schema, Stores};
use football_stats_server::{http, metrics};
use sqlx::postgres::PgPoolOptions;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env()?;

    // Storage backend
    let stores = match &settings.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(settings.database_max_connections)
                .connect(url)
                .await
                .context("failed to create Postgres pool")?;
            schema::ensure(&pool).await?;
            log::info!("using Postgres store");
            Stores::postgres(pool)
        }
        None => {
            log::warn!("DATABASE_URL not set: using in-memory store, data is lost on restart");
            Stores::memory()
        }
    };

    let passwords = PasswordHasher::new(settings.bcrypt_cost);
    if let Some(seed) = &settings.admin {
        auth::seed_admin(stores.users.as_ref(), &passwords, seed).await?;
    }

    let tokens = TokenService::new(
        &settings.jwt_secret,
        Duration::days(settings.token_ttl_days),
    );
    let state = web::Data::new(http::AppState::new(stores, tokens, passwords));
    let prometheus = metrics::build()?;
    let client_url = settings.client_url.clone();

    log::info!("listening on {}:{}", settings.host, settings.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .wrap(http::cors(&client_url))
            .app_data(state.clone())
            .configure(http::routes::init_routes)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await?;

    Ok(())
}

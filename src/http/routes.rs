use crate::http;
use actix_web::web;

/// Mount the banner at `/` and every HTTP sub-module under `/api`.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(http::error::json_error))
        .service(http::health::root)
        .service(
            web::scope("/api")
                .configure(http::auth::init_routes)
                .configure(http::players::init_routes)
                .configure(http::users::init_routes)
                .configure(http::health::init_routes),
        );
}

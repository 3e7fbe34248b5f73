//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::{error::QueryPayloadError, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/posts", web::get().to(posts::list_posts)),
    );
}

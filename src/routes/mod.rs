use actix_web::{http::Method, web, HttpRequest, HttpResponse, Responder};

mod auth;
mod short_url;

use crate::{
    errors::AppError,
    handlers::not_found,
    middleware::Session,
    repositories::SessionRepository,
    services::{ShortUrlServiceType, UserServiceType},
    types::{AppState, HealthStatus},
};

// Handler function for the health check endpoint
async fn health_check(
    data: Option<web::Data<AppState>>,
    urls: web::Data<ShortUrlServiceType>,
    users: web::Data<UserServiceType>,
    sessions: web::Data<SessionRepository>,
) -> impl Responder {
    let (version, uptime_seconds) = match data {
        Some(state) => (state.version.clone(), state.start_time.elapsed().as_secs()),
        None => (env!("CARGO_PKG_VERSION").to_string(), 0),
    };

    let status = HealthStatus {
        status: String::from("OK"),
        version,
        uptime_seconds,
        short_urls: urls.repository().count(),
        users: users.repository().count(),
        sessions: sessions.count(),
    };

    HttpResponse::Ok().json(status)
}

// Anything no route matched
async fn fallback(req: HttpRequest, session: Session) -> Result<HttpResponse, AppError> {
    if *req.method() == Method::GET {
        Ok(not_found(&session))
    } else {
        Err(AppError::NotFound(format!(
            "No route for {} {}",
            req.method(),
            req.path()
        )))
    }
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
    short_url::configure_routes(cfg);
    auth::configure_routes(cfg);
    cfg.default_service(web::to(fallback));
}

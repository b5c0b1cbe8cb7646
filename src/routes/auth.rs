use actix_web::web;

use crate::handlers::{login_handler, login_page, logout_handler, register_handler, register_page};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .route(web::get().to(login_page))
            .route(web::post().to(login_handler)),
    )
    .route("/logout", web::post().to(logout_handler))
    .service(
        web::resource("/register")
            .route(web::get().to(register_page))
            .route(web::post().to(register_handler)),
    );
}

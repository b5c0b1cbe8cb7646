use actix_web::web;

use crate::handlers::{
    create_handler, delete_handler, edit_handler, index_handler, new_handler, redirect_handler,
    show_handler, update_handler,
};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_handler))
        .service(
            web::resource("/urls")
                .route(web::get().to(index_handler))
                .route(web::post().to(create_handler)),
        )
        // must precede /urls/{code}
        .route("/urls/new", web::get().to(new_handler))
        .service(
            web::resource("/urls/{code}")
                .route(web::get().to(show_handler))
                .route(web::post().to(update_handler)),
        )
        .route("/urls/{code}/edit", web::get().to(edit_handler))
        .route("/urls/{code}/delete", web::post().to(delete_handler))
        .route("/u/{code}", web::get().to(redirect_handler));
}

use actix_web::{http::header::REFERER, web, HttpRequest, HttpResponse};
use log::info;
use serde_json::json;
use url::Url;

use super::{page, redirect};
use crate::{
    errors::AppError,
    middleware::Session,
    models::CredentialsForm,
    services::{UserServiceTrait, UserServiceType},
    types::Result,
};

/// Path of the page the form was submitted from, falling back to `default`.
/// Only an http(s) referer's path and query are kept, and only when the path
/// is a plain absolute path; `//host` would be read as another site.
fn back(req: &HttpRequest, default: &str) -> String {
    req.headers()
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Url::parse(value).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(|url| url.path().starts_with('/') && !url.path().starts_with("//"))
        .map(|url| match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        })
        .unwrap_or_else(|| default.to_string())
}

pub async fn login_page(session: Session) -> HttpResponse {
    page(&session, json!(null))
}

pub async fn login_handler(
    req: HttpRequest,
    form: web::Form<CredentialsForm>,
    session: Session,
    service: web::Data<UserServiceType>,
) -> Result<HttpResponse> {
    let CredentialsForm { email, password } = form.into_inner();

    match service.authenticate(&email, &password).await? {
        Some(user) => {
            session.login(&user);
            session.success("You have succesfully logged in!");
            info!("User {} logged in", user.id);
            Ok(redirect("/urls"))
        }
        None => {
            session.error("Please enter a valid username and/or password");
            Ok(redirect(&back(&req, "/login")))
        }
    }
}

pub async fn logout_handler(session: Session) -> HttpResponse {
    if let Some(user_id) = session.user_id() {
        session.logout();
        info!("User {} logged out", user_id);
        session.success("Successfully logged out!");
    } else {
        session.error("Sorry you are not logged in!");
    }
    redirect("/")
}

pub async fn register_page(session: Session) -> HttpResponse {
    page(&session, json!(null))
}

pub async fn register_handler(
    form: web::Form<CredentialsForm>,
    session: Session,
    service: web::Data<UserServiceType>,
) -> Result<HttpResponse> {
    let credentials = form.into_inner();

    if service.exists(&credentials.email).await? {
        session.error("A user with this email already exists.");
        return Ok(redirect("/register"));
    }

    match service.register(credentials).await {
        Ok(user) => {
            session.login(&user);
            session.success("Welcome to tinyURL, you are now registered!");
            Ok(redirect("/urls"))
        }
        Err(e @ (AppError::Conflict(_) | AppError::Validation(_))) => {
            session.error(e.user_message());
            Ok(redirect("/register"))
        }
        Err(e) => Err(e),
    }
}

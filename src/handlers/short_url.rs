use actix_web::{http::header::LOCATION, web, HttpResponse};
use log::{debug, info};
use serde_json::json;
use validator::Validate;

use super::{not_found, page, redirect};
use crate::{
    errors::AppError,
    middleware::Session,
    models::{CreateShortUrlForm, UpdateShortUrlForm},
    services::{ShortUrlServiceTrait, ShortUrlServiceType},
    types::Result,
    validations::validate_short_code,
};

/// List all URLs
pub async fn index_handler(
    session: Session,
    service: web::Data<ShortUrlServiceType>,
) -> Result<HttpResponse> {
    let urls = service.list().await?;
    Ok(page(&session, json!({ "urls": urls })))
}

/// Context for the "new URL" form
pub async fn new_handler(session: Session) -> HttpResponse {
    page(&session, json!(null))
}

/// Create short URL route handler
pub async fn create_handler(
    form: web::Form<CreateShortUrlForm>,
    session: Session,
    service: web::Data<ShortUrlServiceType>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    if form.validate().is_err() {
        session.error("Incorrect or empty URL, nothing created!");
        return Ok(redirect("/urls/new"));
    }

    match service.create(&form.long_url).await {
        Ok(url) => {
            session.success("Successfully Inserted a new URL!");
            Ok(redirect(&format!("/urls/{}", url.short_code)))
        }
        Err(AppError::Validation(_)) => {
            session.error("Incorrect or empty URL, nothing created!");
            Ok(redirect("/urls/new"))
        }
        Err(e) => Err(e),
    }
}

/// Show a single short URL
pub async fn show_handler(
    path: web::Path<String>,
    session: Session,
    service: web::Data<ShortUrlServiceType>,
) -> Result<HttpResponse> {
    let code = path.into_inner();
    if validate_short_code(&code).is_err() {
        return Ok(not_found(&session));
    }

    match service.lookup(&code).await {
        Ok(url) => Ok(page(&session, json!(url))),
        Err(AppError::NotFound(_)) => Ok(not_found(&session)),
        Err(e) => Err(e),
    }
}

/// Redirect route handler
pub async fn redirect_handler(
    path: web::Path<String>,
    session: Session,
    service: web::Data<ShortUrlServiceType>,
) -> Result<HttpResponse> {
    let code = path.into_inner();
    debug!("Redirect requested for code: {}", code);

    if validate_short_code(&code).is_err() {
        return Ok(not_found(&session));
    }

    match service.lookup(&code).await {
        Ok(url) => {
            info!("Redirecting '{}' to '{}'", code, url.long_url);
            Ok(HttpResponse::MovedPermanently()
                .insert_header((LOCATION, url.long_url))
                .finish())
        }
        Err(AppError::NotFound(_)) => Ok(not_found(&session)),
        Err(e) => Err(e),
    }
}

/// Delete URL route handler
pub async fn delete_handler(
    path: web::Path<String>,
    session: Session,
    service: web::Data<ShortUrlServiceType>,
) -> Result<HttpResponse> {
    match service.delete(&path.into_inner()).await {
        Ok(()) => session.success("You have successfully deleted the URL"),
        Err(AppError::NotFound(_)) => {
            session.error("Sorry there is no item with that url to delete!")
        }
        Err(e) => return Err(e),
    }
    Ok(redirect("/"))
}

/// Edit page: only reachable for existing codes
pub async fn edit_handler(
    path: web::Path<String>,
    session: Session,
    service: web::Data<ShortUrlServiceType>,
) -> Result<HttpResponse> {
    let code = path.into_inner();
    match service.lookup(&code).await {
        Ok(url) => Ok(redirect(&format!("/urls/{}", url.short_code))),
        Err(AppError::NotFound(_)) => {
            session.error("Sorry that URL doesn't exist!");
            Ok(redirect("/"))
        }
        Err(e) => Err(e),
    }
}

/// Update URL route handler
pub async fn update_handler(
    path: web::Path<String>,
    form: web::Form<UpdateShortUrlForm>,
    session: Session,
    service: web::Data<ShortUrlServiceType>,
) -> Result<HttpResponse> {
    let code = path.into_inner();
    let form = form.into_inner();

    if validate_short_code(&code).is_err() {
        session.error("Sorry there is no item with that url to update!");
        return Ok(redirect("/"));
    }

    match service.update(&code, &form.updated_url).await {
        Ok(_) => {
            session.success("Updated url successfully!");
            Ok(redirect(&format!("/urls/{}", code)))
        }
        Err(AppError::NotFound(_)) => {
            session.error("Sorry there is no item with that url to update!");
            Ok(redirect("/"))
        }
        Err(AppError::Validation(msg)) => {
            session.error(format!("Could not update URL: {}", msg));
            Ok(redirect(&format!("/urls/{}", code)))
        }
        Err(e) => Err(e),
    }
}

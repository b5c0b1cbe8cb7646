use actix_web::{http::header::LOCATION, HttpResponse};
use serde_json::{json, Value};

use crate::middleware::Session;

mod auth;
mod short_url;

pub use auth::{login_handler, login_page, logout_handler, register_handler, register_page};
pub use short_url::{
    create_handler, delete_handler, edit_handler, index_handler, new_handler, redirect_handler,
    show_handler, update_handler,
};

/// Render a page context: the logged-in username, the pending flash
/// messages (drained), and the page's own data.
pub(crate) fn page(session: &Session, data: Value) -> HttpResponse {
    let flashes = session.take_flashes();
    HttpResponse::Ok().json(json!({
        "username": session.username(),
        "success": flashes.success,
        "error": flashes.error,
        "data": data,
    }))
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}

/// Unknown page: tell the user on the next page and send them home
pub(crate) fn not_found(session: &Session) -> HttpResponse {
    session.error("Sorry, page was not found!");
    redirect("/")
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, dev::ServiceResponse, http::StatusCode, test};
    use serde_json::Value;

    use crate::config::Config;
    use crate::seeds;
    use crate::services::{Services, ShortUrlServiceTrait, UserServiceTrait};
    use crate::test_utils::{init_test_app, test_services};

    fn location(resp: &ServiceResponse) -> String {
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    fn session_cookie(resp: &ServiceResponse) -> Cookie<'static> {
        resp.response()
            .cookies()
            .find(|c| c.name() == "session")
            .map(|c| c.into_owned())
            .expect("session cookie set")
    }

    #[actix_web::test]
    async fn test_create_show_and_redirect() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        let req = test::TestRequest::post()
            .uri("/urls")
            .set_form([("longURL", "https://example.com")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);

        let target = location(&resp);
        let code = target.trim_start_matches("/urls/").to_string();
        assert_eq!(code.len(), 6);
        let cookie = session_cookie(&resp);

        // The show page carries the one-time success flash
        let req = test::TestRequest::get()
            .uri(&target)
            .cookie(cookie.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["long_url"], "https://example.com");
        assert_eq!(body["success"][0], "Successfully Inserted a new URL!");

        let req = test::TestRequest::get()
            .uri(&target)
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"].as_array().map(Vec::len), Some(0));

        let req = test::TestRequest::get()
            .uri(&format!("/u/{}", code))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&resp), "https://example.com");
    }

    #[actix_web::test]
    async fn test_create_empty_url_flashes_error() {
        let services = test_services().await;
        let before = services.urls.list().await.unwrap().len();
        let app = init_test_app!(services, Config::default());

        let req = test::TestRequest::post()
            .uri("/urls")
            .set_form([("longURL", "")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/urls/new");
        let cookie = session_cookie(&resp);

        let req = test::TestRequest::get()
            .uri("/urls/new")
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["error"][0], "Incorrect or empty URL, nothing created!");

        assert_eq!(services.urls.list().await.unwrap().len(), before);
    }

    #[actix_web::test]
    async fn test_index_lists_seeded_urls() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        let req = test::TestRequest::get().uri("/urls").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let urls = body["data"]["urls"].as_array().unwrap();
        assert_eq!(urls.len(), seeds::SEED_URLS.len());
        assert!(body["username"].is_null());
    }

    #[actix_web::test]
    async fn test_unknown_code_falls_back_home() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        for uri in ["/u/zzzzzz", "/urls/zzzzzz", "/no/such/page"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FOUND, "{}", uri);
            assert_eq!(location(&resp), "/");

            let req = test::TestRequest::get()
                .uri("/")
                .cookie(session_cookie(&resp))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["error"][0], "Sorry, page was not found!");
        }
    }

    #[actix_web::test]
    async fn test_unknown_route_for_other_methods_is_404() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        let req = test::TestRequest::put().uri("/no/such/page").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_update_and_delete() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        let req = test::TestRequest::post()
            .uri("/urls/b2xVn2")
            .set_form([("updatedURL", "https://rust-lang.org")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/urls/b2xVn2");
        assert_eq!(
            services.urls.lookup("b2xVn2").await.unwrap().long_url,
            "https://rust-lang.org"
        );

        let req = test::TestRequest::post()
            .uri("/urls/zzzzzz")
            .set_form([("updatedURL", "https://rust-lang.org")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/");

        let req = test::TestRequest::get()
            .uri("/urls/b2xVn2/edit")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/urls/b2xVn2");

        let req = test::TestRequest::post()
            .uri("/urls/b2xVn2/delete")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/");
        assert!(services.urls.lookup("b2xVn2").await.is_err());

        // Deleting again reports the miss
        let req = test::TestRequest::post()
            .uri("/urls/b2xVn2/delete")
            .to_request();
        let resp = test::call_service(&app, req).await;
        let req = test::TestRequest::get()
            .uri("/")
            .cookie(session_cookie(&resp))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["error"][0],
            "Sorry there is no item with that url to delete!"
        );
    }

    #[actix_web::test]
    async fn test_update_unknown_code_ignores_submitted_url() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        for (uri, updated) in [
            ("/urls/zzzzzz", ""),
            ("/urls/zzzzzz", "not-a-url"),
            ("/urls/a%0Ab", ""),
        ] {
            let req = test::TestRequest::post()
                .uri(uri)
                .set_form([("updatedURL", updated)])
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FOUND, "{}", uri);
            assert_eq!(location(&resp), "/", "{}", uri);

            let req = test::TestRequest::get()
                .uri("/")
                .cookie(session_cookie(&resp))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(
                body["error"][0],
                "Sorry there is no item with that url to update!"
            );
        }

        // A known code with a bad URL stays on its page
        let req = test::TestRequest::post()
            .uri("/urls/b2xVn2")
            .set_form([("updatedURL", "")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/urls/b2xVn2");
        assert_eq!(
            services.urls.lookup("b2xVn2").await.unwrap().long_url,
            "http://www.lighthouselabs.ca"
        );
    }

    #[actix_web::test]
    async fn test_cookieless_clients_cannot_grow_session_store() {
        let mut config = Config::default();
        config.session.max_sessions = 10;
        let services = Services::new(&config);
        seeds::seed(&services).await.unwrap();
        let app = init_test_app!(services, config);

        for _ in 0..50 {
            let req = test::TestRequest::get().uri("/no/such/page").to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FOUND);
        }
        assert_eq!(services.sessions.count(), 10);
    }

    #[actix_web::test]
    async fn test_login_logout_flow() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([
                ("email", "user@example.com"),
                ("password", "purple-monkey-dinosaur"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/urls");
        let cookie = session_cookie(&resp);

        let req = test::TestRequest::get()
            .uri("/urls")
            .cookie(cookie.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["username"], "user@example.com");
        assert_eq!(body["success"][0], "You have succesfully logged in!");

        let req = test::TestRequest::post()
            .uri("/logout")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/");

        // Logout moves the session to a new id and drops the old entry
        let logout_cookie = session_cookie(&resp);
        assert_ne!(logout_cookie.value(), cookie.value());
        assert_eq!(services.sessions.count(), 1);

        let req = test::TestRequest::get()
            .uri("/")
            .cookie(logout_cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["username"].is_null());
        assert_eq!(body["success"][0], "Successfully logged out!");

        let req = test::TestRequest::get()
            .uri("/urls")
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["username"].is_null());
    }

    #[actix_web::test]
    async fn test_login_issues_new_session_id() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        // An existing anonymous session, e.g. one planted by someone else
        let req = test::TestRequest::get().uri("/no/such/page").to_request();
        let resp = test::call_service(&app, req).await;
        let anonymous = session_cookie(&resp);

        let req = test::TestRequest::post()
            .uri("/login")
            .cookie(anonymous.clone())
            .set_form([
                ("email", "user@example.com"),
                ("password", "purple-monkey-dinosaur"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        let logged_in = session_cookie(&resp);
        assert_ne!(logged_in.value(), anonymous.value());

        let req = test::TestRequest::get()
            .uri("/urls")
            .cookie(anonymous)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["username"].is_null());

        // Pending flashes travel with the state to the new id
        let req = test::TestRequest::get()
            .uri("/urls")
            .cookie(logged_in)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["username"], "user@example.com");
        assert_eq!(body["error"][0], "Sorry, page was not found!");
        assert_eq!(body["success"][0], "You have succesfully logged in!");
    }

    #[actix_web::test]
    async fn test_bad_login_goes_back() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        let req = test::TestRequest::post()
            .uri("/login")
            .insert_header(("referer", "http://localhost:8080/login?next=urls"))
            .set_form([("email", "user@example.com"), ("password", "wrong")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/login?next=urls");

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "user@example.com"), ("password", "wrong")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/login");

        // Referers that would leave the site fall back to the login page
        for referer in [
            "http://localhost:8080//evil.example",
            "http://localhost:8080/\\evil.example",
            "javascript:alert(1)",
            "not a url",
        ] {
            let req = test::TestRequest::post()
                .uri("/login")
                .insert_header(("referer", referer))
                .set_form([("email", "user@example.com"), ("password", "wrong")])
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(location(&resp), "/login", "{}", referer);
        }
    }

    #[actix_web::test]
    async fn test_logout_without_login() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        let req = test::TestRequest::post().uri("/logout").to_request();
        let resp = test::call_service(&app, req).await;
        let req = test::TestRequest::get()
            .uri("/login")
            .cookie(session_cookie(&resp))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["error"][0], "Sorry you are not logged in!");
    }

    #[actix_web::test]
    async fn test_register() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        let req = test::TestRequest::post()
            .uri("/register")
            .set_form([("email", "new@example.com"), ("password", "hunter2")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/urls");
        assert!(services.users.exists("new@example.com").await.unwrap());

        let req = test::TestRequest::get()
            .uri("/urls")
            .cookie(session_cookie(&resp))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["username"], "new@example.com");

        // Duplicate email
        let req = test::TestRequest::post()
            .uri("/register")
            .set_form([("email", "user@example.com"), ("password", "x")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/register");

        let req = test::TestRequest::get()
            .uri("/register")
            .cookie(session_cookie(&resp))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["error"][0], "A user with this email already exists.");
    }

    #[actix_web::test]
    async fn test_requests_without_session_changes_set_no_cookie() {
        let services = test_services().await;
        let app = init_test_app!(services, Config::default());

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(resp.response().cookies().count(), 0);
        assert_eq!(services.sessions.count(), 0);
    }
}

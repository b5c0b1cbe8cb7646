//! Test utilities and helpers.
//!
//! This module is only compiled when running tests.

#![cfg(test)]

use crate::config::Config;
use crate::seeds;
use crate::services::Services;

/// Fresh stores pre-populated with the seed data
pub async fn test_services() -> Services {
    let services = Services::new(&Config::default());
    seeds::seed(&services)
        .await
        .expect("Failed to seed test stores");
    services
}

/// Build the full application (session middleware and routes) around
/// `services` and initialise it as an actix test service.
macro_rules! init_test_app {
    ($services:expr, $config:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::middleware::SessionMiddleware::new(
                    $services.sessions.clone(),
                    &$config.session,
                ))
                .configure(|cfg| {
                    $services.register(cfg);
                    $crate::routes::configure_routes(cfg);
                }),
        )
        .await
    };
}

pub(crate) use init_test_app;

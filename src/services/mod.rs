use std::sync::Arc;
use std::time::Duration;

use actix_web::web;

mod short_url;
mod user;

pub use short_url::{ShortUrlService, ShortUrlServiceTrait};
pub use user::{UserService, UserServiceTrait};

use crate::{
    config::Config,
    repositories::{SessionRepository, ShortUrlRepository, UserRepository},
    utils::RandomCodeGenerator,
};

pub type ShortUrlServiceType = ShortUrlService<ShortUrlRepository, RandomCodeGenerator>;
pub type UserServiceType = UserService<UserRepository>;

/// Process-wide stores and the services over them.
///
/// Built once before the server starts; every worker receives clones of the
/// same `web::Data` handles so all requests see one set of maps.
#[derive(Clone)]
pub struct Services {
    pub urls: web::Data<ShortUrlServiceType>,
    pub users: web::Data<UserServiceType>,
    pub sessions: web::Data<SessionRepository>,
}

impl Services {
    pub fn new(config: &Config) -> Self {
        let short_url_repository = Arc::new(ShortUrlRepository::new());
        let user_repository = Arc::new(UserRepository::new());

        let short_url_service = ShortUrlService::new(
            short_url_repository,
            RandomCodeGenerator::new(config.short_code.length),
            config.short_code.max_attempts,
        );
        let user_service = UserService::new(user_repository);

        Self {
            urls: web::Data::new(short_url_service),
            users: web::Data::new(user_service),
            sessions: web::Data::new(SessionRepository::new(
                config.session.max_sessions,
                Duration::from_secs(config.session.idle_timeout_secs),
            )),
        }
    }

    /// Service Register
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.urls.clone());
        cfg.app_data(self.users.clone());
        cfg.app_data(self.sessions.clone());
    }
}

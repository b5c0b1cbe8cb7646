//! Cookie-backed session context.
//!
//! Each request gets one [`Session`]: the state stored under the id carried
//! in the session cookie, or a fresh state when the cookie is missing or
//! unknown. Handlers read and mutate it through the extractor; the
//! middleware writes it back once the handler has produced a response.
//! Logging in or out moves the state to a new session id.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ok, ready, LocalBoxFuture, Ready};
use log::debug;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::errors::AppError;
use crate::models::{FlashKind, Flashes, SessionState, User};
use crate::repositories::{SessionRepository, SessionRepositoryTrait};

/// Per-request handle on the caller's session state
#[derive(Clone)]
pub struct Session {
    id: Uuid,
    state: Rc<RefCell<SessionState>>,
    renew: Rc<Cell<bool>>,
}

impl Session {
    fn new(id: Uuid, state: SessionState) -> Self {
        Self {
            id,
            state: Rc::new(RefCell::new(state)),
            renew: Rc::new(Cell::new(false)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.state.borrow().user_id
    }

    /// Email of the logged-in user, shown as the username on pages
    pub fn username(&self) -> Option<String> {
        self.state.borrow().email.clone()
    }

    pub fn login(&self, user: &User) {
        self.state.borrow_mut().login(user);
        self.renew.set(true);
    }

    pub fn logout(&self) {
        self.state.borrow_mut().logout();
        self.renew.set(true);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.state
            .borrow_mut()
            .push_flash(FlashKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.state.borrow_mut().push_flash(FlashKind::Error, message);
    }

    pub fn take_flashes(&self) -> Flashes {
        self.state.borrow_mut().take_flashes()
    }

    fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    fn needs_new_id(&self) -> bool {
        self.renew.get()
    }
}

impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Session>()
                .cloned()
                .ok_or_else(|| AppError::Internal("Session middleware is not installed".into())),
        )
    }
}

pub struct SessionMiddleware {
    store: web::Data<SessionRepository>,
    cookie_name: Rc<str>,
    cookie_secure: bool,
}

impl SessionMiddleware {
    pub fn new(store: web::Data<SessionRepository>, config: &SessionConfig) -> Self {
        Self {
            store,
            cookie_name: Rc::from(config.cookie_name.as_str()),
            cookie_secure: config.cookie_secure,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionMiddlewareService {
            service: Rc::new(service),
            store: self.store.clone(),
            cookie_name: self.cookie_name.clone(),
            cookie_secure: self.cookie_secure,
        })
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
    store: web::Data<SessionRepository>,
    cookie_name: Rc<str>,
    cookie_secure: bool,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let store = self.store.clone();
        let cookie_name = self.cookie_name.clone();
        let cookie_secure = self.cookie_secure;

        Box::pin(async move {
            let cookie_id = req
                .cookie(&cookie_name)
                .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

            let loaded = match cookie_id {
                Some(id) => store
                    .load(&id)
                    .await
                    .map_err(AppError::from)?
                    .map(|state| (id, state)),
                None => None,
            };

            let (session, previous) = match loaded {
                Some((id, state)) => (Session::new(id, state.clone()), Some(state)),
                None => (Session::new(Uuid::new_v4(), SessionState::default()), None),
            };

            req.extensions_mut().insert(session.clone());
            let mut res = service.call(req).await?;

            let state = session.snapshot();
            let renew = session.needs_new_id();

            // Untouched fresh sessions are not kept, and unchanged ones are
            // not written back.
            match &previous {
                None if state == SessionState::default() => return Ok(res),
                Some(previous) if !renew && *previous == state => return Ok(res),
                _ => {}
            }

            let id = match &previous {
                Some(_) if renew => {
                    store.remove(&session.id()).await.map_err(AppError::from)?;
                    let id = Uuid::new_v4();
                    debug!("Renewed session {} as {}", session.id(), id);
                    id
                }
                Some(_) => session.id(),
                None => {
                    debug!("Started session {}", session.id());
                    session.id()
                }
            };

            store.store(id, state).await.map_err(AppError::from)?;

            if previous.is_none() || id != session.id() {
                let cookie = Cookie::build(cookie_name.to_string(), id.to_string())
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .secure(cookie_secure)
                    .finish();
                res.response_mut()
                    .add_cookie(&cookie)
                    .map_err(actix_web::error::ErrorInternalServerError)?;
            }

            Ok(res)
        })
    }
}

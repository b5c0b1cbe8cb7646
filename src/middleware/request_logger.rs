use std::rc::Rc;
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::{ok, LocalBoxFuture, Ready};
use log::{debug, warn};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Logs each request with its status and handling time, and tags the
/// response with an `X-Request-ID`.
///
/// A caller-supplied request id is echoed back; otherwise a UUID v4 is
/// generated. Server errors are always reported; everything else only when
/// verbose.
pub struct RequestLogger {
    verbose: bool,
}

impl RequestLogger {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLoggerMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestLoggerMiddleware {
            service: Rc::new(service),
            verbose: self.verbose,
        })
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: Rc<S>,
    verbose: bool,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
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
        let verbose = self.verbose;
        let method = req.method().clone();
        let path = req.path().to_owned();
        let started = Instant::now();
        let request_id = request_id(&req);

        if verbose {
            debug!("--> {} {} [{}]", method, path, request_id);
        }

        Box::pin(async move {
            let mut res = service.call(req).await?;
            let status = res.status();
            let elapsed_ms = started.elapsed().as_millis();

            if status.is_server_error() {
                warn!(
                    "<-- {} {} {} in {}ms [{}]",
                    method, path, status, elapsed_ms, request_id
                );
            } else if verbose {
                debug!(
                    "<-- {} {} {} in {}ms [{}]",
                    method, path, status, elapsed_ms, request_id
                );
            }

            if let Ok(value) = HeaderValue::from_str(&request_id) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
            Ok(res)
        })
    }
}

fn request_id(req: &ServiceRequest) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

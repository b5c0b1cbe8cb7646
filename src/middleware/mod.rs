mod request_logger;
mod session;

pub use request_logger::RequestLogger;
pub use session::{Session, SessionMiddleware};

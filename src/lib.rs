//! # hola
//!
//! A tiny greeting web service.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /` | `¡Hola, Usuario!`, or `¡Hola, <nombre>!` with `?nombre=` |
//! | `GET /hello/{name}` | `¡Hola, <name>!`, or `400` unless `name` is ASCII letters only |
//!
//! Every response, whatever the route or status, leaves with the fixed
//! [`SecurityHeaders`](middleware::SecurityHeaders) set. The headers are
//! applied by a [`Decorator`](middleware::Decorator) stage the router runs
//! after every handler, including the 404, 405 and 500 it produces itself.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), hola::Error> {
//!     hola::Server::bind("127.0.0.1:5000").await?.serve(hola::app()).await
//! }
//! ```
//!
//! The HTTP layer underneath is deliberately small: a radix-tree router via
//! [`matchit`], hyper for the wire, tokio for I/O, and graceful shutdown on
//! SIGTERM / Ctrl-C.

mod error;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod greeting;
pub mod middleware;

pub use error::Error;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;

/// The greeting application: both routes plus the security headers.
pub fn app() -> Router {
    Router::new()
        .get("/", greeting::index)
        .get("/hello/{name}", greeting::hello)
        .decorate(middleware::SecurityHeaders)
}

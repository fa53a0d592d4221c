//! Response decoration.
//!
//! A [`Decorator`] is a post-processing stage the router runs on every
//! response it emits: handler output, `404`, `405`, a `500` from a panicking
//! handler. Decorators are registered on the router with
//! [`Router::decorate`](crate::Router::decorate) and run in registration
//! order. There is no way for a route to opt out.
//!
//! ```rust
//! use hola::{Response, Router};
//! use hola::middleware::SecurityHeaders;
//!
//! let app = Router::new()
//!     .decorate(SecurityHeaders)
//!     .decorate(|res: &mut Response| res.set_header("x-served-by", "hola"));
//! ```

mod security_headers;

pub use security_headers::SecurityHeaders;

use crate::response::Response;

/// A stage that mutates every outgoing response.
///
/// Implementations must not depend on request state; they see only the
/// response. Closures `Fn(&mut Response)` implement it directly.
pub trait Decorator: Send + Sync + 'static {
    fn decorate(&self, response: &mut Response);
}

impl<F> Decorator for F
where
    F: Fn(&mut Response) + Send + Sync + 'static,
{
    fn decorate(&self, response: &mut Response) {
        self(response)
    }
}

//! Radix-tree request router and the response pipeline.
//!
//! One tree per HTTP method, O(path-length) lookup. [`Router::handle`] is the
//! only way a request turns into a response, and it runs every registered
//! [`Decorator`] on whatever comes out: handler output, 404, 405 or the 500
//! that replaces a panicking handler.

use std::borrow::Cow;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;
use tracing::{debug, error};

use crate::method::Method;
use crate::middleware::Decorator;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// What a route turns into once registered: the handler's future, already
/// mapped to a [`Response`] and boxed so it can be moved onto its own task.
type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Routes of different handler types share one tree, so each handler is
/// erased to the same closure shape at registration.
type BoxedHandler = Arc<dyn Fn(Request) -> ResponseFuture + Send + Sync + 'static>;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Every builder method returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    decorators: Vec<Box<dyn Decorator>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), decorators: Vec::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// A handler is any `async fn(Request) -> impl IntoResponse`; returning
    /// `Result<Response, E>` with `E: IntoResponse` lets it bail out with `?`.
    /// Path parameters use `{name}` syntax and `req.param("name")` retrieves
    /// them:
    ///
    /// ```rust
    /// # use hola::{Method, Request, Response, Router};
    /// # async fn hello(_: Request) -> Response { Response::text("") }
    /// Router::new().on(Method::Get, "/hello/{name}", hello);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on<F, Fut, R>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + Send + 'static,
    {
        let boxed: BoxedHandler = Arc::new(move |req: Request| -> ResponseFuture {
            let fut = handler(req);
            Box::pin(async move { fut.await.into_response() })
        });
        self.routes
            .entry(method)
            .or_default()
            .insert(path, boxed)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Shorthand for [`Router::on`] with [`Method::Get`]. `HEAD` requests for
    /// the same path are served by it too.
    pub fn get<F, Fut, R>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + Send + 'static,
    {
        self.on(Method::Get, path, handler)
    }

    /// Append a response post-processing stage. Decorators run in the order
    /// they are registered, on every response.
    pub fn decorate(mut self, decorator: impl Decorator) -> Self {
        self.decorators.push(Box::new(decorator));
        self
    }

    /// Routes one request and produces one fully decorated response.
    ///
    /// Handlers only see the path parameters and the query string; the
    /// request body is never read.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>> {
        let (parts, body) = req.into_parts();
        drop(body);
        let path = parts.uri.path().to_owned();
        let query = parts.uri.query().map(str::to_owned);

        let response = match Method::try_from(&parts.method) {
            Ok(method) => self.route(method, &path, query).await,
            Err(()) => self.fallback(&path),
        };

        let response = self.finish(response);
        debug!(method = %parts.method, %path, status = response.status, "request handled");
        response.into_inner()
    }

    async fn route(&self, method: Method, path: &str, query: Option<String>) -> Response {
        let (found, head_via_get) = match self.lookup(method, path) {
            Some(found) => (Some(found), false),
            None if method == Method::Head => (self.lookup(Method::Get, path), true),
            None => (None, false),
        };

        let Some((handler, params)) = found else {
            return self.fallback(path);
        };

        // A panic unwinds only the spawned task; the JoinError becomes a 500.
        let fut = (*handler)(Request::new(query, params));
        let response = match tokio::spawn(fut).await {
            Ok(response) => response,
            Err(e) => {
                error!(%path, "handler failed: {e}");
                Response::status(Status::InternalServerError)
            }
        };

        if head_via_get { response.into_head() } else { response }
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), decode_param(v)))
            .collect();
        Some((handler, params))
    }

    /// Methods with a route matching `path`, in a stable order.
    fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| *method)
            .collect();
        if allowed.contains(&Method::Get) && !allowed.contains(&Method::Head) {
            allowed.push(Method::Head);
        }
        allowed.sort();
        allowed
    }

    /// `404` when nothing is routed at `path`, otherwise `405` with `allow`.
    fn fallback(&self, path: &str) -> Response {
        let allowed = self.allowed_methods(path);
        if allowed.is_empty() {
            return Response::builder().status(Status::NotFound).text("Not Found");
        }

        let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
        Response::builder()
            .status(Status::MethodNotAllowed)
            .header("allow", &allow)
            .no_body()
    }

    fn finish(&self, mut response: Response) -> Response {
        for decorator in &self.decorators {
            decorator.decorate(&mut response);
        }
        response
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// Percent-decodes a raw path segment. Segments that do not decode to UTF-8
/// are passed through untouched.
fn decode_param(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_owned())
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn echo_name(req: Request) -> String {
        req.param("name").unwrap_or_default().to_owned()
    }

    async fn boom(_req: Request) -> Response {
        panic!("handler exploded")
    }

    fn app() -> Router {
        Router::new()
            .get("/hello/{name}", echo_name)
            .get("/boom", boom)
            .decorate(|res: &mut Response| res.set_header("x-decorated", "yes"))
    }

    fn request(method: &str, uri: &str) -> http::Request<Full<Bytes>> {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn body_of(res: http::Response<Full<Bytes>>) -> Bytes {
        res.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn path_params_are_percent_decoded() {
        let res = app().handle(request("GET", "/hello/%46er")).await;
        assert_eq!(res.status(), 200);
        assert_eq!(body_of(res).await, "Fer");
    }

    #[tokio::test]
    async fn undecodable_params_pass_through() {
        let res = app().handle(request("GET", "/hello/%FF")).await;
        assert_eq!(body_of(res).await, "%FF");
    }

    #[tokio::test]
    async fn unknown_path_is_404_and_decorated() {
        let res = app().handle(request("GET", "/nope")).await;
        assert_eq!(res.status(), 404);
        assert_eq!(res.headers()["x-decorated"], "yes");
    }

    #[tokio::test]
    async fn wrong_method_is_405_with_allow() {
        let res = app().handle(request("POST", "/hello/Fer")).await;
        assert_eq!(res.status(), 405);
        assert_eq!(res.headers()["allow"], "GET, HEAD");
        assert_eq!(res.headers()["x-decorated"], "yes");
    }

    #[tokio::test]
    async fn post_body_is_ignored() {
        let req = http::Request::builder()
            .method("POST")
            .uri("/hello/Fer")
            .body(Full::new(Bytes::from(vec![b'x'; 1 << 20])))
            .unwrap();
        let res = app().handle(req).await;
        assert_eq!(res.status(), 405);
    }

    #[tokio::test]
    async fn unrecognised_method_on_a_route_is_405() {
        let res = app().handle(request("BREW", "/hello/Fer")).await;
        assert_eq!(res.status(), 405);
        assert_eq!(res.headers()["allow"], "GET, HEAD");
        assert_eq!(res.headers()["x-decorated"], "yes");
    }

    #[tokio::test]
    async fn unrecognised_method_on_unknown_path_is_404() {
        let res = app().handle(request("BREW", "/nope")).await;
        assert_eq!(res.status(), 404);
        assert!(res.headers().get("allow").is_none());
        assert_eq!(res.headers()["x-decorated"], "yes");
    }

    #[tokio::test]
    async fn head_is_served_by_get_and_keeps_its_length() {
        let res = app().handle(request("HEAD", "/hello/Fer")).await;
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()["content-length"], "3");
        assert!(body_of(res).await.is_empty());
    }

    #[tokio::test]
    async fn panicking_handler_becomes_decorated_500() {
        let res = app().handle(request("GET", "/boom")).await;
        assert_eq!(res.status(), 500);
        assert_eq!(res.headers()["x-decorated"], "yes");
    }

    #[tokio::test]
    async fn decorators_run_in_registration_order() {
        let router = app()
            .decorate(|res: &mut Response| res.set_header("x-order", "first"))
            .decorate(|res: &mut Response| res.set_header("x-order", "second"));
        let res = router.handle(request("GET", "/hello/Fer")).await;
        assert_eq!(res.headers()["x-order"], "second");
    }

    #[test]
    #[should_panic(expected = "invalid route `/hello/{other}`")]
    fn conflicting_routes_panic() {
        let _ = app().get("/hello/{other}", echo_name);
    }
}

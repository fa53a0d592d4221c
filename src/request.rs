//! What a handler gets to see of an incoming request.

use std::collections::HashMap;

/// An incoming HTTP request, reduced to the parts routes read: the path
/// parameters extracted by the router and the raw query string.
pub struct Request {
    query: Option<String>,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(query: Option<String>, params: HashMap<String, String>) -> Self {
        Self { query, params }
    }

    /// Returns a named path parameter, percent-decoded.
    ///
    /// For a route `/hello/{name}`, `req.param("name")` on `/hello/Fer` returns `Some("Fer")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first value of a query-string parameter, form-urlencoded
    /// decoded (`+` becomes a space).
    ///
    /// For `/?nombre=Ana&nombre=Eva`, `req.query("nombre")` returns `Some("Ana")`.
    pub fn query(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

#[cfg(test)]
impl Request {
    /// Builds a request for handler-level tests.
    pub(crate) fn get(uri: &str, params: &[(&str, &str)]) -> Self {
        let query = uri.split_once('?').map(|(_, q)| q.to_owned());
        Self::new(
            query,
            params.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
        )
    }
}

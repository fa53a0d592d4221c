use crate::middleware::Decorator;
use crate::response::Response;

/// Browser-hardening headers, applied verbatim to every response.
static HEADERS: [(&str, &str); 9] = [
    ("content-security-policy", "default-src 'self'; frame-ancestors 'none'; form-action 'self'"),
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("cross-origin-resource-policy", "same-origin"),
    ("permissions-policy", "geolocation=(), microphone=(), camera=()"),
    ("cache-control", "no-store, no-cache, must-revalidate, private"),
    ("pragma", "no-cache"),
    ("expires", "0"),
    ("server", "WebServer"),
];

/// Sets the fixed security header set on a response.
///
/// Existing values for the same header names are replaced, so a handler
/// cannot weaken the policy and applying the decorator twice is a no-op.
/// Status and body are left untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecurityHeaders;

impl SecurityHeaders {
    /// The `(name, value)` pairs this decorator sets.
    pub fn headers() -> &'static [(&'static str, &'static str)] {
        &HEADERS
    }
}

impl Decorator for SecurityHeaders {
    fn decorate(&self, response: &mut Response) {
        for (name, value) in HEADERS.iter() {
            response.set_header(name, value);
        }
    }
}

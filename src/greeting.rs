//! The greeting routes and the name they greet.
//!
//! | Route | Name source |
//! |---|---|
//! | `GET /` | query parameter `nombre`, `Usuario` when absent or empty |
//! | `GET /hello/{name}` | path parameter, must be one or more ASCII letters |
//!
//! `GET /` always answers `200`. A path name that fails the check is answered
//! with `400` and [`InvalidNameFormat`]'s fixed message.

use tracing::debug;

use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// Name used by `GET /` when the caller does not supply one.
pub const DEFAULT_NAME: &str = "Usuario";

/// A candidate name failed the letters-only check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("El nombre solo puede contener letras.")]
pub struct InvalidNameFormat;

impl IntoResponse for InvalidNameFormat {
    fn into_response(self) -> Response {
        Response::builder()
            .status(Status::BadRequest)
            .text(self.to_string())
    }
}

/// A name made of one or more ASCII letters (`^[a-zA-Z]+$`).
///
/// Digits, punctuation, whitespace and non-ASCII letters such as `ñ` or `é`
/// are all rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParameter(String);

impl NameParameter {
    pub fn parse(candidate: &str) -> Result<Self, InvalidNameFormat> {
        if !candidate.is_empty() && candidate.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(candidate.to_owned()))
        } else {
            Err(InvalidNameFormat)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn greet(name: &str) -> Response {
    Response::text(format!("¡Hola, {name}!"))
}

/// `GET /`: greets `?nombre=` as given, or the default name when it is
/// absent or empty. The body is plain text, so the value is echoed verbatim.
pub async fn index(req: Request) -> Response {
    match req.query("nombre").filter(|n| !n.is_empty()) {
        Some(nombre) => greet(&nombre),
        None => greet(DEFAULT_NAME),
    }
}

/// `GET /hello/{name}`: greets the path parameter.
pub async fn hello(req: Request) -> Result<Response, InvalidNameFormat> {
    let candidate = req.param("name").unwrap_or_default();
    let name = NameParameter::parse(candidate).inspect_err(|_| {
        debug!(name = %candidate, "rejected name");
    })?;
    Ok(greet(name.as_str()))
}

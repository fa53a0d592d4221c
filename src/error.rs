//! Unified error type.

/// The error type returned by hola's fallible operations.
///
/// Application-level failures (a bad name, an unknown route) are expressed as
/// HTTP [`Response`](crate::Response) values, not as `Error`s. This type
/// surfaces infrastructure failures: binding to a port or reading the bound
/// address.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

//! Production collaborators for the upload flow.
//!
//! [`HmacAuthorizer`] issues the signed, single-use upload credentials
//! and [`HttpTransport`] performs the actual blob POST. Both implement
//! the traits from blobcast-upload, which stays transport-free.

mod auth;
mod http;

pub use auth::{HmacAuthorizer, file_digest, verify};
pub use http::HttpTransport;

//! HTTP access to the document service.
//!
//! [`DocumentApi`] is the seam the session layer talks through;
//! [`HttpDocumentApi`] is the reqwest implementation used in production.

/// The service seam.
pub mod api;
/// Files prepared for upload.
pub mod file;
/// HTTP implementation of the service seam.
pub mod http;

pub use api::DocumentApi;
pub use file::UploadFile;
pub use http::HttpDocumentApi;

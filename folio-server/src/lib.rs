//! HTTP layer of the Folio catalog service.
//!
//! Everything request-shaped lives here: configuration, application state,
//! the router, the `/books` search handler, and the error-to-response
//! mapping. Query building and persistence live in `folio-core`.

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;

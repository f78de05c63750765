//! # Folio Core
//!
//! Core library for the Folio catalog service: a read-only search API over
//! a Project Gutenberg style book catalog stored in PostgreSQL.
//!
//! ## Overview
//!
//! `folio-core` owns everything between the HTTP layer and the database:
//!
//! - **Filter normalization**: turning raw comma-separated query parameters
//!   into typed, validated filter sets ([`query::filters`])
//! - **Query building**: composing the count and page queries from a filter
//!   set with bound parameters only ([`query::sql`])
//! - **Persistence**: pool management and the repository executing the
//!   search and batch-hydrating related entities ([`database`])
//! - **API types**: the response DTOs shared with the server ([`api_types`])
//!
//! ## Architecture
//!
//! The search operation runs in two connection scopes: one for the
//! count/page query pair, one for the five relation batch queries. Related
//! entities are fetched per page, not per book, and grouped by book id
//! before assembly.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Response types shared across the API boundary
pub mod api_types;

/// Connection pool and repository implementations
pub mod database;

/// Error types for catalog operations
pub mod error;

/// Filter normalization and SQL query building
pub mod query;

pub use api_types::{AuthorDetails, BookDetails, BooksResponse, FormatDetails};
pub use database::PostgresCatalog;
pub use error::{CatalogError, Result};
pub use query::{BookFilters, PageRequest};

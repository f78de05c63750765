//! Filter normalization and SQL composition for the catalog search.
//!
//! [`filters`] turns raw query-string values into a typed [`BookFilters`]
//! set; [`sql`] turns that set into a count query and a page query with
//! every user value passed as a bound parameter.

pub mod filters;
pub mod sql;

pub use filters::{BookFilters, PAGE_SIZE, PageRequest};
pub use sql::BookQueryBuilder;

pub mod books;
pub mod relations;

use serde::{Deserialize, Serialize};

/// Response body for `GET /books`.
///
/// `total_count` counts every book matching the filters, ignoring
/// pagination; `books` carries the requested page only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooksResponse {
    pub total_count: i64,
    pub books: Vec<BookDetails>,
}

/// A book with all related entities attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDetails {
    pub title: String,
    /// The catalog's media type (e.g. `Text`).
    pub genre: String,
    pub authors: Vec<AuthorDetails>,
    pub languages: Vec<String>,
    pub subjects: Vec<String>,
    pub bookshelves: Vec<String>,
    pub formats: Vec<FormatDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDetails {
    pub name: String,
    pub birth_year: Option<i16>,
    pub death_year: Option<i16>,
}

/// A downloadable rendition of a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatDetails {
    pub mime_type: String,
    pub url: String,
}

//! The catalog search operation.
//!
//! One search runs in two connection scopes: the count/page query pair on
//! the first connection, the five relation batch queries on the second.
//! Each connection is released (dropped) when its scope ends, on success
//! and on error alike.

use sqlx::PgPool;
use tracing::debug;

use crate::{
    api_types::{BookDetails, BooksResponse},
    error::{CatalogError, Result},
    query::{BookFilters, BookQueryBuilder, PageRequest},
};

use super::relations::{self, BookRelations};

#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    #[allow(dead_code)]
    gutenberg_id: i32,
    #[allow(dead_code)]
    download_count: i32,
    media_type: String,
}

#[derive(Clone, Debug)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute a catalog search: total count, one page of books ordered by
    /// download count descending, and their related entities.
    pub async fn search(
        &self,
        filters: &BookFilters,
        page: PageRequest,
    ) -> Result<BooksResponse> {
        let builder = BookQueryBuilder::new(filters);

        let (total_count, rows) = {
            let mut conn = self.pool.acquire().await.map_err(|e| {
                CatalogError::Database(format!("connection acquire failed: {}", e))
            })?;

            let mut count_query = builder.count_query();
            let total_count: i64 = count_query
                .build_query_scalar()
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| {
                    CatalogError::Database(format!("count query failed: {}", e))
                })?;

            let mut page_query = builder.page_query(page);
            let rows: Vec<BookRow> = page_query
                .build_query_as()
                .fetch_all(&mut *conn)
                .await
                .map_err(|e| {
                    CatalogError::Database(format!("page query failed: {}", e))
                })?;

            (total_count, rows)
        };

        debug!(
            total_count,
            page = page.page(),
            returned = rows.len(),
            "book search executed"
        );

        if rows.is_empty() {
            return Ok(BooksResponse {
                total_count,
                books: Vec::new(),
            });
        }

        let book_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let relations = {
            let mut conn = self.pool.acquire().await.map_err(|e| {
                CatalogError::Database(format!("connection acquire failed: {}", e))
            })?;
            relations::hydrate(&mut conn, &book_ids).await?
        };

        Ok(BooksResponse {
            total_count,
            books: assemble(rows, relations),
        })
    }
}

/// Zip the ordered page rows with the relation maps. A book id missing
/// from a map yields an empty list, same as a present-but-empty entry.
fn assemble(rows: Vec<BookRow>, mut relations: BookRelations) -> Vec<BookDetails> {
    rows.into_iter()
        .map(|row| BookDetails {
            title: row.title,
            genre: row.media_type,
            authors: relations.authors.remove(&row.id).unwrap_or_default(),
            languages: relations.languages.remove(&row.id).unwrap_or_default(),
            subjects: relations.subjects.remove(&row.id).unwrap_or_default(),
            bookshelves: relations.bookshelves.remove(&row.id).unwrap_or_default(),
            formats: relations.formats.remove(&row.id).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_types::AuthorDetails;

    fn row(id: i64, title: &str) -> BookRow {
        BookRow {
            id,
            title: title.to_string(),
            gutenberg_id: id as i32,
            download_count: 0,
            media_type: "Text".to_string(),
        }
    }

    #[test]
    fn assembly_preserves_page_order() {
        let rows = vec![row(3, "first"), row(1, "second"), row(2, "third")];
        let books = assemble(rows, BookRelations::default());
        let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn missing_relation_keys_become_empty_lists() {
        let mut relations = BookRelations::default();
        relations.authors.insert(
            1,
            vec![AuthorDetails {
                name: "Verne, Jules".to_string(),
                birth_year: Some(1828),
                death_year: Some(1905),
            }],
        );

        let books = assemble(vec![row(1, "with author"), row(2, "without")], relations);
        assert_eq!(books[0].authors.len(), 1);
        assert!(books[1].authors.is_empty());
        assert!(books[0].languages.is_empty());
        assert!(books[1].formats.is_empty());
    }

    #[test]
    fn genre_carries_the_media_type() {
        let books = assemble(vec![row(5, "any")], BookRelations::default());
        assert_eq!(books[0].genre, "Text");
    }
}

//! Batch hydration of book relations.
//!
//! Given the book ids of one result page, five queries fetch every related
//! row in one round trip each, keyed by book id. A book with no rows for a
//! relation simply has no entry in that map; assembly treats a missing key
//! as an empty list.

use std::collections::HashMap;

use sqlx::PgConnection;

use crate::{
    api_types::{AuthorDetails, FormatDetails},
    error::{CatalogError, Result},
};

/// Related rows for one page of books, keyed by book id.
#[derive(Debug, Default)]
pub struct BookRelations {
    pub authors: HashMap<i64, Vec<AuthorDetails>>,
    pub languages: HashMap<i64, Vec<String>>,
    pub subjects: HashMap<i64, Vec<String>>,
    pub bookshelves: HashMap<i64, Vec<String>>,
    pub formats: HashMap<i64, Vec<FormatDetails>>,
}

#[derive(Debug, sqlx::FromRow)]
struct AuthorRow {
    book_id: i64,
    name: String,
    birth_year: Option<i16>,
    death_year: Option<i16>,
}

#[derive(Debug, sqlx::FromRow)]
struct CodeRow {
    book_id: i64,
    code: String,
}

#[derive(Debug, sqlx::FromRow)]
struct NameRow {
    book_id: i64,
    name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct FormatRow {
    book_id: i64,
    mime_type: String,
    url: String,
}

const AUTHORS_SQL: &str = "SELECT ba.book_id, a.name, a.birth_year, a.death_year \
     FROM books_book_authors ba \
     JOIN books_author a ON ba.author_id = a.id \
     WHERE ba.book_id = ANY($1)";

const LANGUAGES_SQL: &str = "SELECT bl.book_id, l.code \
     FROM books_book_languages bl \
     JOIN books_language l ON bl.language_id = l.id \
     WHERE bl.book_id = ANY($1)";

const SUBJECTS_SQL: &str = "SELECT bs.book_id, s.name \
     FROM books_book_subjects bs \
     JOIN books_subject s ON bs.subject_id = s.id \
     WHERE bs.book_id = ANY($1)";

const BOOKSHELVES_SQL: &str = "SELECT bb.book_id, bsh.name \
     FROM books_book_bookshelves bb \
     JOIN books_bookshelf bsh ON bb.bookshelf_id = bsh.id \
     WHERE bb.book_id = ANY($1)";

const FORMATS_SQL: &str = "SELECT f.book_id, f.mime_type, f.url \
     FROM books_format f \
     WHERE f.book_id = ANY($1)";

/// Fetch all five relation sets for `book_ids` on one connection.
///
/// Callers short-circuit the empty page before getting here; an empty id
/// set never reaches the store.
pub async fn hydrate(conn: &mut PgConnection, book_ids: &[i64]) -> Result<BookRelations> {
    debug_assert!(!book_ids.is_empty());

    let author_rows: Vec<AuthorRow> = fetch(conn, AUTHORS_SQL, book_ids, "authors").await?;
    let language_rows: Vec<CodeRow> =
        fetch(conn, LANGUAGES_SQL, book_ids, "languages").await?;
    let subject_rows: Vec<NameRow> = fetch(conn, SUBJECTS_SQL, book_ids, "subjects").await?;
    let bookshelf_rows: Vec<NameRow> =
        fetch(conn, BOOKSHELVES_SQL, book_ids, "bookshelves").await?;
    let format_rows: Vec<FormatRow> = fetch(conn, FORMATS_SQL, book_ids, "formats").await?;

    Ok(BookRelations {
        authors: group_rows(author_rows, |r| {
            (
                r.book_id,
                AuthorDetails {
                    name: r.name,
                    birth_year: r.birth_year,
                    death_year: r.death_year,
                },
            )
        }),
        languages: group_rows(language_rows, |r| (r.book_id, r.code)),
        subjects: group_rows(subject_rows, |r| (r.book_id, r.name)),
        bookshelves: group_rows(bookshelf_rows, |r| (r.book_id, r.name)),
        formats: group_rows(format_rows, |r| {
            (
                r.book_id,
                FormatDetails {
                    mime_type: r.mime_type,
                    url: r.url,
                },
            )
        }),
    })
}

async fn fetch<R>(
    conn: &mut PgConnection,
    sql: &'static str,
    book_ids: &[i64],
    relation: &'static str,
) -> Result<Vec<R>>
where
    R: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    sqlx::query_as(sql)
        .bind(book_ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| CatalogError::Database(format!("{} batch query failed: {}", relation, e)))
}

/// Group rows by book id, preserving row order within each bucket.
fn group_rows<R, T>(rows: Vec<R>, split: impl Fn(R) -> (i64, T)) -> HashMap<i64, Vec<T>> {
    let mut map: HashMap<i64, Vec<T>> = HashMap::new();
    for row in rows {
        let (book_id, value) = split(row);
        map.entry(book_id).or_default().push(value);
    }
    map
}

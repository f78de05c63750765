use sqlx::{Postgres, QueryBuilder};

use super::filters::{BookFilters, PageRequest};

/// Composes the count and page queries for one search request.
///
/// Both queries are built from the same filter set and push their
/// conditions in the same order, so their WHERE clauses and bound values
/// are identical; the page query additionally appends ordering and the
/// limit/offset binds. Only static SQL fragments are pushed as text;
/// every user-supplied value goes through `push_bind`.
#[derive(Debug)]
pub struct BookQueryBuilder<'f> {
    filters: &'f BookFilters,
}

impl<'f> BookQueryBuilder<'f> {
    pub fn new(filters: &'f BookFilters) -> Self {
        Self { filters }
    }

    /// `SELECT COUNT(*)` over the filtered book set, ignoring pagination.
    pub fn count_query(&self) -> QueryBuilder<'f, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM books_book b WHERE 1=1");
        self.push_filters(&mut qb);
        qb
    }

    /// The page query: scalar book columns, ordered by download count
    /// descending, limited to the requested page window.
    pub fn page_query(&self, page: PageRequest) -> QueryBuilder<'f, Postgres> {
        let mut qb = QueryBuilder::new(
            "SELECT b.id, b.title, b.gutenberg_id, b.download_count, b.media_type \
             FROM books_book b WHERE 1=1",
        );
        self.push_filters(&mut qb);
        qb.push(" ORDER BY b.download_count DESC");
        qb.push(" LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());
        qb
    }

    fn push_filters(&self, qb: &mut QueryBuilder<'f, Postgres>) {
        let filters = self.filters;

        if !filters.gutenberg_ids.is_empty() {
            qb.push(" AND b.gutenberg_id = ANY(");
            qb.push_bind(&filters.gutenberg_ids);
            qb.push(")");
        }

        if let Some(title) = &filters.title {
            qb.push(" AND b.title ILIKE ");
            qb.push_bind(like_pattern(title));
            qb.push(" ESCAPE E'\\\\'");
        }

        if !filters.authors.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM books_book_authors ba \
                 JOIN books_author a ON ba.author_id = a.id \
                 WHERE ba.book_id = b.id AND (",
            );
            push_substring_alternatives(qb, "a.name", &filters.authors);
            qb.push("))");
        }

        if !filters.languages.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM books_book_languages bl \
                 JOIN books_language l ON bl.language_id = l.id \
                 WHERE bl.book_id = b.id AND LOWER(l.code) = ANY(",
            );
            qb.push_bind(&filters.languages);
            qb.push("))");
        }

        if !filters.mime_types.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM books_format f \
                 WHERE f.book_id = b.id AND f.mime_type = ANY(",
            );
            qb.push_bind(&filters.mime_types);
            qb.push("))");
        }

        if !filters.topics.is_empty() {
            // Subjects and bookshelves are separate EXISTS sub-clauses, so
            // the pattern list is bound once per sub-clause.
            qb.push(
                " AND (EXISTS (SELECT 1 FROM books_book_subjects bs \
                 JOIN books_subject s ON bs.subject_id = s.id \
                 WHERE bs.book_id = b.id AND (",
            );
            push_substring_alternatives(qb, "s.name", &filters.topics);
            qb.push(
                ")) OR EXISTS (SELECT 1 FROM books_book_bookshelves bb \
                 JOIN books_bookshelf bsh ON bb.bookshelf_id = bsh.id \
                 WHERE bb.book_id = b.id AND (",
            );
            push_substring_alternatives(qb, "bsh.name", &filters.topics);
            qb.push(")))");
        }
    }
}

/// Pushes `column ILIKE $n [OR column ILIKE $m ...]`, one bind per value.
fn push_substring_alternatives(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    values: &[String],
) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(column);
        qb.push(" ILIKE ");
        qb.push_bind(like_pattern(value));
        qb.push(" ESCAPE E'\\\\'");
    }
}

fn like_pattern(value: &str) -> String {
    format!("%{}%", escape_like_literal(value))
}

fn escape_like_literal(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder_count(sql: &str) -> usize {
        sql.matches('$').count()
    }

    #[test]
    fn unfiltered_count_query_has_no_conditions() {
        let filters = BookFilters::default();
        let qb = BookQueryBuilder::new(&filters).count_query();
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM books_book b WHERE 1=1");
    }

    #[test]
    fn unfiltered_page_query_only_binds_pagination() {
        let filters = BookFilters::default();
        let qb = BookQueryBuilder::new(&filters).page_query(PageRequest::default());
        let sql = qb.sql();
        assert!(sql.contains("ORDER BY b.download_count DESC"));
        assert!(sql.ends_with("LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn each_category_contributes_one_conjunct() {
        let filters = BookFilters::from_params(
            Some("7,42"),
            Some("pride"),
            Some("austen"),
            Some("en"),
            Some("text/html"),
            Some("romance"),
        );
        let qb = BookQueryBuilder::new(&filters).count_query();
        let sql = qb.sql();
        assert!(sql.contains("b.gutenberg_id = ANY($1)"));
        assert!(sql.contains("b.title ILIKE $2"));
        assert!(sql.contains("books_book_authors"));
        assert!(sql.contains("a.name ILIKE $3"));
        assert!(sql.contains("LOWER(l.code) = ANY($4)"));
        assert!(sql.contains("f.mime_type = ANY($5)"));
        assert!(sql.contains("books_book_subjects"));
        assert!(sql.contains("books_book_bookshelves"));
        assert_eq!(placeholder_count(sql), 7);
    }

    #[test]
    fn count_and_page_queries_share_the_where_clause() {
        let filters = BookFilters::from_params(
            Some("11"),
            None,
            Some("verne, wells"),
            Some("fr"),
            None,
            Some("science"),
        );
        let builder = BookQueryBuilder::new(&filters);
        let count_sql = builder.count_query().sql().to_string();
        let page_sql = builder.page_query(PageRequest::default()).sql().to_string();

        let where_clause = count_sql
            .strip_prefix("SELECT COUNT(*) FROM books_book b")
            .unwrap();
        assert!(page_sql.contains(where_clause));
    }

    #[test]
    fn topic_filter_binds_each_pattern_twice() {
        let filters =
            BookFilters::from_params(None, None, None, None, None, Some("dog,cat"));
        let qb = BookQueryBuilder::new(&filters).count_query();
        let sql = qb.sql();
        // One bind per value in the subjects sub-clause and another in the
        // bookshelves sub-clause.
        assert_eq!(placeholder_count(sql), 4);
        assert_eq!(sql.matches("s.name ILIKE").count(), 2);
        assert_eq!(sql.matches("bsh.name ILIKE").count(), 2);
    }

    #[test]
    fn author_values_combine_with_or() {
        let filters =
            BookFilters::from_params(None, None, Some("twain,poe"), None, None, None);
        let qb = BookQueryBuilder::new(&filters).count_query();
        let sql = qb.sql();
        assert!(sql.contains("a.name ILIKE $1 ESCAPE E'\\\\' OR a.name ILIKE $2"));
    }

    #[test]
    fn pagination_binds_come_last() {
        let filters =
            BookFilters::from_params(None, Some("island"), None, None, None, None);
        let qb = BookQueryBuilder::new(&filters).page_query(PageRequest::new(3).unwrap());
        assert!(qb.sql().ends_with("LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like_literal("100%"), "100\\%");
        assert_eq!(escape_like_literal("a_b"), "a\\_b");
        assert_eq!(escape_like_literal("back\\slash"), "back\\\\slash");
        assert_eq!(like_pattern("dog"), "%dog%");
    }

    #[test]
    fn empty_categories_are_no_ops() {
        let filters = BookFilters::from_params(
            Some("abc,xyz"),
            None,
            Some(" , "),
            None,
            None,
            None,
        );
        let qb = BookQueryBuilder::new(&filters).count_query();
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM books_book b WHERE 1=1");
    }
}

use axum::{
    Json,
    extract::{Query, State},
};
use folio_core::{BookFilters, BooksResponse, PageRequest};
use serde::Deserialize;

use crate::{
    errors::{AppError, AppResult},
    infra::app_state::AppState,
};

/// Raw query parameters for `GET /books`. All optional; list-valued
/// filters are comma-separated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BooksParams {
    pub gutenberg_id: Option<String>,
    pub language: Option<String>,
    pub mime_type: Option<String>,
    pub topic: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub page: Option<u32>,
}

impl BooksParams {
    fn filters(&self) -> BookFilters {
        BookFilters::from_params(
            self.gutenberg_id.as_deref(),
            self.title.as_deref(),
            self.author.as_deref(),
            self.language.as_deref(),
            self.mime_type.as_deref(),
            self.topic.as_deref(),
        )
    }

    fn page(&self) -> Result<PageRequest, AppError> {
        match self.page {
            None => Ok(PageRequest::default()),
            Some(n) => {
                PageRequest::new(n).ok_or_else(|| AppError::bad_request("page must be >= 1"))
            }
        }
    }
}

/// Search the catalog.
pub async fn list_books_handler(
    State(state): State<AppState>,
    Query(params): Query<BooksParams>,
) -> AppResult<Json<BooksResponse>> {
    let page = params.page()?;
    let filters = params.filters();

    let response = state.catalog.books().search(&filters, page).await?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_translate_into_normalized_filters() {
        let params = BooksParams {
            gutenberg_id: Some("7,42,abc".to_string()),
            language: Some("EN,fr".to_string()),
            mime_type: Some("text/html".to_string()),
            topic: Some("Dog".to_string()),
            author: Some(" Austen ".to_string()),
            title: Some("pride".to_string()),
            page: None,
        };

        let filters = params.filters();
        assert_eq!(filters.gutenberg_ids, vec![7, 42]);
        assert_eq!(filters.languages, vec!["en", "fr"]);
        assert_eq!(filters.mime_types, vec!["text/html"]);
        assert_eq!(filters.topics, vec!["dog"]);
        assert_eq!(filters.authors, vec!["austen"]);
        assert_eq!(filters.title.as_deref(), Some("pride"));
    }

    #[test]
    fn absent_params_yield_an_empty_filter_set() {
        assert!(BooksParams::default().filters().is_empty());
    }

    #[test]
    fn page_defaults_to_one_and_rejects_zero() {
        let mut params = BooksParams::default();
        assert_eq!(params.page().unwrap(), PageRequest::default());

        params.page = Some(0);
        let err = params.page().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);

        params.page = Some(3);
        assert_eq!(params.page().unwrap().offset(), 50);
    }
}

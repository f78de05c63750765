/// Books returned per page. Fixed; the API exposes only a page number.
pub const PAGE_SIZE: i64 = 25;

/// Normalized filter set for the catalog search.
///
/// Each field is one independently-toggleable filter category; empty
/// fields contribute nothing to the query. Categories combine with AND,
/// values within a category with OR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilters {
    /// Exact-match Gutenberg ids.
    pub gutenberg_ids: Vec<i32>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Case-insensitive substrings matched against author names.
    pub authors: Vec<String>,
    /// Lowercased language codes, matched exactly.
    pub languages: Vec<String>,
    /// MIME types, matched exactly and case-sensitively.
    pub mime_types: Vec<String>,
    /// Case-insensitive substrings matched against subject and bookshelf
    /// names.
    pub topics: Vec<String>,
}

impl BookFilters {
    /// Build a filter set from raw comma-separated query parameters.
    ///
    /// Normalization is lossy by design: blank tokens vanish, and
    /// non-numeric `gutenberg_id` tokens are dropped rather than rejected.
    pub fn from_params(
        gutenberg_id: Option<&str>,
        title: Option<&str>,
        author: Option<&str>,
        language: Option<&str>,
        mime_type: Option<&str>,
        topic: Option<&str>,
    ) -> Self {
        Self {
            gutenberg_ids: parse_id_list(gutenberg_id),
            title: title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            authors: parse_list(author, Case::Lower),
            languages: parse_list(language, Case::Lower),
            mime_types: parse_list(mime_type, Case::Keep),
            topics: parse_list(topic, Case::Lower),
        }
    }

    /// True when no category holds a usable value.
    pub fn is_empty(&self) -> bool {
        self.gutenberg_ids.is_empty()
            && self.title.is_none()
            && self.authors.is_empty()
            && self.languages.is_empty()
            && self.mime_types.is_empty()
            && self.topics.is_empty()
    }
}

/// A validated page number (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
}

impl PageRequest {
    /// Returns `None` for page 0; pages start at 1.
    pub fn new(page: u32) -> Option<Self> {
        (page >= 1).then_some(Self { page })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * PAGE_SIZE
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1 }
    }
}

#[derive(Clone, Copy)]
enum Case {
    Keep,
    Lower,
}

fn parse_list(raw: Option<&str>, case: Case) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match case {
            Case::Keep => token.to_string(),
            Case::Lower => token.to_lowercase(),
        })
        .collect()
}

fn parse_id_list(raw: Option<&str>) -> Vec<i32> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.split(',')
        .filter_map(|token| token.trim().parse::<i32>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list_drops_non_numeric_tokens() {
        assert_eq!(parse_id_list(Some("7,42,abc")), vec![7, 42]);
        assert_eq!(parse_id_list(Some(" 1 , ,2,3.5,x")), vec![1, 2]);
        assert_eq!(parse_id_list(Some("abc")), Vec::<i32>::new());
        assert_eq!(parse_id_list(None), Vec::<i32>::new());
    }

    #[test]
    fn list_parsing_trims_and_drops_blanks() {
        assert_eq!(
            parse_list(Some(" en ,FR,,  "), Case::Lower),
            vec!["en".to_string(), "fr".to_string()]
        );
        assert_eq!(
            parse_list(Some("text/html, application/epub+zip"), Case::Keep),
            vec!["text/html".to_string(), "application/epub+zip".to_string()]
        );
        assert!(parse_list(Some(",,,"), Case::Lower).is_empty());
    }

    #[test]
    fn mime_types_keep_their_case() {
        let filters =
            BookFilters::from_params(None, None, None, None, Some("Text/HTML"), None);
        assert_eq!(filters.mime_types, vec!["Text/HTML".to_string()]);
    }

    #[test]
    fn blank_params_leave_filters_empty() {
        let filters = BookFilters::from_params(
            Some("x,y"),
            Some("   "),
            Some(" , "),
            None,
            None,
            Some(""),
        );
        assert!(filters.is_empty());
    }

    #[test]
    fn page_zero_is_rejected() {
        assert!(PageRequest::new(0).is_none());
        assert_eq!(PageRequest::new(1), Some(PageRequest::default()));
    }

    #[test]
    fn offset_steps_by_page_size() {
        assert_eq!(PageRequest::new(1).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(2).unwrap().offset(), 25);
        assert_eq!(PageRequest::new(4).unwrap().offset(), 75);
    }
}

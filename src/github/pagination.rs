//! `Link` header handling for paginated REST listings
//!
//! GitHub advertises further pages through a header of the form
//! `<https://api.github.com/...&page=2>; rel="next", <...>; rel="last"`.

/// Explicit page bounds requested by a caller.
///
/// When either bound is set the walk fetches exactly one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self { page, per_page }
    }

    pub fn per_page(per_page: u32) -> Self {
        Self {
            page: None,
            per_page: Some(per_page),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.page.is_some() || self.per_page.is_some()
    }

    /// Append `page` / `per_page` query parameters to `url`
    pub fn apply(&self, url: &mut url::Url) {
        if !self.is_bounded() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        if let Some(page) = self.page {
            pairs.append_pair("page", &page.to_string());
        }
        if let Some(per_page) = self.per_page {
            pairs.append_pair("per_page", &per_page.to_string());
        }
    }
}

/// Extract the `rel="next"` target from a `Link` header value.
///
/// Returns `None` for empty or malformed headers.
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let parts: Vec<&str> = link.split(';').collect();
        if parts.len() != 2 || !parts[1].contains(r#"rel="next""#) {
            return None;
        }
        let target = parts[0].trim().trim_start_matches('<').trim_end_matches('>');
        if target.is_empty() {
            None
        } else {
            Some(target.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_after_prev() {
        let header = r#"<https://api.github.com/repos/o/r/issues?page=1>; rel="prev", <https://api.github.com/repos/o/r/issues?page=3>; rel="next""#;
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://api.github.com/repos/o/r/issues?page=3")
        );
    }

    #[test]
    fn test_no_next_link() {
        let header = r#"<https://api.github.com/repos/o/r/issues?page=1>; rel="first", <https://api.github.com/repos/o/r/issues?page=1>; rel="prev""#;
        assert_eq!(parse_next_link(header), None);
    }

    #[test]
    fn test_malformed_headers() {
        assert_eq!(parse_next_link(""), None);
        assert_eq!(parse_next_link("garbage"), None);
        assert_eq!(parse_next_link(r#"<>; rel="next""#), None);
        assert_eq!(parse_next_link(r#"<https://x>; rel="next"; extra"#), None);
    }

    #[test]
    fn test_page_request_bounds() {
        assert!(!PageRequest::default().is_bounded());
        assert!(PageRequest::per_page(5).is_bounded());

        let mut url = url::Url::parse("https://api.github.com/repos/o/r/releases").unwrap();
        PageRequest::new(Some(2), Some(50)).apply(&mut url);
        assert_eq!(url.query(), Some("page=2&per_page=50"));
    }
}

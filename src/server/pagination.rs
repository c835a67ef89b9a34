use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, Uri},
};

pub const QUESTIONS_PER_PAGE: usize = 10;

/// `?page=N`, 1-indexed. Anything that is not an integer means page 1, and
/// when `page` is repeated the first value wins. Extraction never fails.
#[derive(Debug, Default)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    pub fn from_uri(uri: &Uri) -> PageQuery {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        PageQuery {
            page: pairs
                .into_iter()
                .find(|(key, _)| key == "page")
                .map(|(_, value)| value),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for PageQuery {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PageQuery::from_uri(&parts.uri))
    }
}

/// Slice for `page`. Out-of-range pages, including zero and negatives, are empty.
pub fn paginate<T>(items: &[T], page: i64) -> &[T] {
    if page < 1 {
        return &[];
    }
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE))
        .unwrap_or(usize::MAX);
    if start >= items.len() {
        return &[];
    }
    let end = (start + QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}

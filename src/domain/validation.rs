use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("Invalid URL")]
    InvalidUrl,
}

/// True when `candidate` parses as an absolute URL (a scheme is required).
#[must_use]
pub fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok()
}

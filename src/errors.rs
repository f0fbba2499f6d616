#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookieError {
    #[error("Cookie name {name:?} does not match key {key:?}")]
    NameMismatch { key: String, name: String },

    #[error("Cookie not found: {0}")]
    NotFound(String),

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(String),
}

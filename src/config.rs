use time::macros::datetime;
use time::OffsetDateTime;

const DEFAULT_PATH: &str = "/";

/// Latest expiry a cookie can get from a `Max-Age` attribute.
const MAX_EXPIRY: OffsetDateTime = datetime!(9999-12-31 23:59:59 UTC);

/// Parser configuration. Only affects how `Set-Cookie` headers are turned into cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    /// Path given to cookies whose `Set-Cookie` header carries no `Path` attribute
    pub default_path: String,
    /// Ceiling for `now + Max-Age` when the sum does not fit in a date
    pub max_expiry: OffsetDateTime,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            default_path: DEFAULT_PATH.to_string(),
            max_expiry: MAX_EXPIRY,
        }
    }
}

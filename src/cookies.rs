//! Cookies: [`Cookie`], [`CookieCollection`], header parsing and serialization.

mod collection;
mod cookie;
mod date;
mod grammar;
mod headers;
mod parser;

pub use cookie::Cookie;
pub use cookie::SameSite;

pub use collection::CookieCollection;

pub use parser::parse_cookie_header;
pub use parser::parse_set_cookie_header;
pub use parser::CookiePairs;
pub use parser::CookieParser;

pub use date::format_http_date;
pub use date::parse_http_date;

pub use headers::HeaderStore;
pub use headers::COOKIE;
pub use headers::SET_COOKIE;

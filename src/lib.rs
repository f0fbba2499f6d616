//! HTTP cookie handling: parse `Cookie` and `Set-Cookie` headers, keep cookies in an
//! ordered collection and write them back as headers.

pub mod clock;
pub mod config;
pub mod cookies;
pub mod errors;

pub use clock::{Clock, ClockHandle, FixedClock, SystemClock};
pub use config::CookieConfig;
pub use cookies::{Cookie, CookieCollection, CookieParser, SameSite};
pub use errors::CookieError;

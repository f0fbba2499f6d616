//! The [`Cookie`] value type and its header serializations.
//!
//! A cookie is built either directly or by the header parsers. All fields are
//! public; the parsers guarantee that `name` and `value` fit the cookie grammar,
//! but cookies built by hand are not checked. Serialization percent-encodes the
//! name and value, so any text survives a round trip.
//!
//! Equality and hashing cover `name`, `value`, `path`, `expires`, `domain`,
//! `secure` and `http_only`. The `same_site` policy and the raw `extension`
//! text take no part in identity.
//!
//! ```rust
//! use gosub_cookies::cookies::{Cookie, SameSite};
//!
//! let mut c = Cookie::new("session", "abc123");
//! c.http_only = true;
//! c.same_site = Some(SameSite::Lax);
//!
//! assert_eq!(c.to_cookie_header(), "session=abc123");
//! assert_eq!(c.to_set_cookie_header(), "session=abc123; path=/; HttpOnly; SameSite=Lax");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::clock::{Clock, SystemClock};
use crate::cookies::date::format_http_date;
use crate::cookies::grammar::{encode_name, encode_value};

const DEFAULT_PATH: &str = "/";

/// SameSite policy of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SameSite {
    /// Cookie only sent with same-site requests
    Strict,
    /// Cookie also sent on top-level cross-site navigations
    Lax,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = ();

    /// Case-insensitive. Anything but `strict` or `lax` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("strict") {
            Ok(SameSite::Strict)
        } else if s.eq_ignore_ascii_case("lax") {
            Ok(SameSite::Lax)
        } else {
            Err(())
        }
    }
}

/// One cookie and its attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name (case-sensitive), unencoded.
    pub name: String,

    /// Cookie value, unencoded. Surrounding double quotes are part of the value.
    pub value: String,

    /// Path scoping. `"/"` unless set otherwise.
    pub path: String,

    /// Absolute expiry. Session cookies have `None`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires: Option<OffsetDateTime>,

    /// Domain scoping, without a leading dot when parsed.
    pub domain: Option<String>,

    /// If `true`, cookie is sent only over HTTPS.
    pub secure: bool,

    /// If `true`, cookie is hidden from client-side scripts.
    pub http_only: bool,

    /// SameSite policy, if any.
    pub same_site: Option<SameSite>,

    /// Unrecognized `Set-Cookie` attribute text, written back verbatim.
    pub extension: Option<String>,
}

impl Cookie {
    /// Creates a session cookie with the default path and no other attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: DEFAULT_PATH.to_string(),
            expires: None,
            domain: None,
            secure: false,
            http_only: false,
            same_site: None,
            extension: None,
        }
    }

    /// Serializes to the `name=value` form used in `Cookie` request headers.
    pub fn to_cookie_header(&self) -> String {
        format!("{}={}", encode_name(&self.name), encode_value(&self.value))
    }

    /// Serializes to a `Set-Cookie` header value.
    ///
    /// Attributes are written in a fixed order: domain, path, expires, Secure,
    /// HttpOnly, SameSite, then the extension text as-is. Expiry is written with
    /// second precision.
    ///
    /// Empty `domain` and `path` values are left out, so a cookie with an empty
    /// path parses back with the parser's default path instead.
    pub fn to_set_cookie_header(&self) -> String {
        let mut header = self.to_cookie_header();

        if let Some(domain) = self.domain.as_deref().filter(|d| !d.is_empty()) {
            header.push_str("; domain=");
            header.push_str(domain);
        }
        if !self.path.is_empty() {
            header.push_str("; path=");
            header.push_str(&self.path);
        }
        if let Some(expires) = self.expires.and_then(format_http_date) {
            header.push_str("; expires=");
            header.push_str(&expires);
        }
        if self.secure {
            header.push_str("; Secure");
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if let Some(same_site) = self.same_site {
            header.push_str("; SameSite=");
            header.push_str(same_site.as_str());
        }
        if let Some(extension) = &self.extension {
            header.push_str("; ");
            header.push_str(extension);
        }

        header
    }

    /// Returns `true` if the cookie has an expiry strictly before `clock.now()`.
    /// Session cookies never expire.
    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        self.expires.is_some_and(|expires| expires < clock.now())
    }

    /// [`is_expired`](Self::is_expired) against the wall clock.
    pub fn is_expired_now(&self) -> bool {
        self.is_expired(&SystemClock)
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_set_cookie_header())
    }
}

impl PartialEq for Cookie {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.value == other.value
            && self.path == other.path
            && self.expires == other.expires
            && self.domain == other.domain
            && self.secure == other.secure
            && self.http_only == other.http_only
    }
}

impl Eq for Cookie {}

impl Hash for Cookie {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.value.hash(state);
        self.path.hash(state);
        self.expires.hash(state);
        self.domain.hash(state);
        self.secure.hash(state);
        self.http_only.hash(state);
    }
}

//! `Cookie` and `Set-Cookie` header parsing.
//!
//! Both parsers are best-effort and never fail loudly:
//! - a `Cookie` header yields every `name=value` pair that can be found; the
//!   rest of the header is skipped.
//! - a `Set-Cookie` header is all-or-nothing: if any part of it does not fit the
//!   grammar the whole header is discarded.
//!
//! Pairs in a `Cookie` header are separated by exactly `"; "`. `Set-Cookie`
//! attributes also accept `;` followed by any whitespace.
//!
//! When both `Max-Age` and `Expires` are present, `Max-Age` wins. When an
//! attribute is repeated, the last occurrence wins. Unrecognized attributes are
//! all kept, in order, in [`Cookie::extension`].

use time::{Duration, OffsetDateTime};

use crate::clock::{ClockHandle, SystemClock};
use crate::config::CookieConfig;
use crate::cookies::date::parse_http_date;
use crate::cookies::grammar::{classify_attribute, decode, match_pair, Attribute, COOKIE_PAIR_SCAN};
use crate::cookies::Cookie;

/// Parses cookie headers with a given configuration and clock.
///
/// The clock is only read for `Max-Age`, which is relative to "now".
#[derive(Clone)]
pub struct CookieParser {
    config: CookieConfig,
    clock: ClockHandle,
}

impl Default for CookieParser {
    fn default() -> Self {
        Self::new(None, SystemClock::handle())
    }
}

impl CookieParser {
    /// Creates a parser. Uses the default configuration when `config` is `None`.
    pub fn new(config: Option<CookieConfig>, clock: ClockHandle) -> Self {
        Self {
            config: config.unwrap_or_default(),
            clock,
        }
    }

    pub fn config(&self) -> &CookieConfig {
        &self.config
    }

    pub fn clock(&self) -> &ClockHandle {
        &self.clock
    }

    /// Returns all `name=value` pairs of a `Cookie` request header.
    pub fn parse_cookie_header<'h>(&self, header: &'h str) -> CookiePairs<'h> {
        CookiePairs::new(header)
    }

    /// Parses one cookie and its attributes from a `Set-Cookie` header value.
    ///
    /// Returns `None` when the header does not match the grammar as a whole.
    pub fn parse_set_cookie_header(&self, header: &str) -> Option<Cookie> {
        let cookie = self.parse_set_cookie(header);
        if cookie.is_none() {
            log::debug!("discarding malformed Set-Cookie header: {header:?}");
        }
        cookie
    }

    fn parse_set_cookie(&self, header: &str) -> Option<Cookie> {
        let mut segments = header.split(';');
        let (name, value) = match_pair(segments.next()?)?;

        let mut cookie = Cookie::new(decode(name), decode(value));
        cookie.path = self.config.default_path.clone();

        let mut expires = None;
        let mut max_age = None;
        let mut extensions = Vec::new();

        for segment in segments {
            match classify_attribute(segment.trim_start())? {
                Attribute::Expires(date) => expires = Some(date),
                Attribute::MaxAge(seconds) => max_age = Some(seconds),
                Attribute::Domain(domain) => cookie.domain = Some(domain.to_string()),
                Attribute::Path(path) => cookie.path = path.to_string(),
                Attribute::Secure => cookie.secure = true,
                Attribute::HttpOnly => cookie.http_only = true,
                Attribute::SameSite(policy) => cookie.same_site = policy.parse().ok(),
                Attribute::Extension(raw) => extensions.push(raw),
            }
        }

        cookie.expires = match max_age {
            Some(seconds) => Some(self.expires_after(seconds)),
            None => expires.and_then(parse_http_date),
        };
        if !extensions.is_empty() {
            cookie.extension = Some(extensions.join("; "));
        }

        Some(cookie)
    }

    /// `now + seconds`, truncated to whole seconds and capped at the configured maximum.
    fn expires_after(&self, seconds: &str) -> OffsetDateTime {
        let now = self.clock.now();
        let now = now.replace_nanosecond(0).unwrap_or(now);

        seconds
            .parse::<i64>()
            .ok()
            .and_then(|secs| now.checked_add(Duration::seconds(secs)))
            .map_or(self.config.max_expiry, |at| at.min(self.config.max_expiry))
    }
}

/// Lazy iterator over the cookies of a `Cookie` header.
///
/// A clone taken before iterating replays the same cookies. Yielded cookies
/// only have `name` and `value` set.
#[derive(Debug, Clone)]
pub struct CookiePairs<'h> {
    header: &'h str,
    pos: usize,
}

impl<'h> CookiePairs<'h> {
    fn new(header: &'h str) -> Self {
        Self { header, pos: 0 }
    }
}

impl Iterator for CookiePairs<'_> {
    type Item = Cookie;

    fn next(&mut self) -> Option<Cookie> {
        if self.pos > self.header.len() {
            return None;
        }

        let Some(caps) = COOKIE_PAIR_SCAN.captures_at(self.header, self.pos) else {
            self.pos = self.header.len() + 1;
            return None;
        };
        let (whole, name, value) = (caps.get(0)?, caps.name("name")?, caps.name("value")?);
        self.pos = whole.end();

        Some(Cookie::new(decode(name.as_str()), decode(value.as_str())))
    }
}

/// Parses a `Cookie` request header with the default parser.
pub fn parse_cookie_header(header: &str) -> CookiePairs<'_> {
    CookiePairs::new(header)
}

/// Parses a `Set-Cookie` header with the default configuration and the wall clock.
pub fn parse_set_cookie_header(header: &str) -> Option<Cookie> {
    CookieParser::default().parse_set_cookie_header(header)
}

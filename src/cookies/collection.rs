//! An ordered set of cookies keyed by name.
//!
//! [`CookieCollection`] holds at most one cookie per name. Iteration follows
//! insertion order, and replacing a cookie keeps its original position. The
//! collection can be filled from request/response headers and written back to
//! them.
//!
//! This type is **not** internally synchronized.
//!
//! ```rust
//! use gosub_cookies::cookies::{Cookie, CookieCollection};
//!
//! let mut cookies = CookieCollection::new();
//! cookies.set_by_name("theme", "dark");
//! cookies.add(Cookie::new("session", "abc123"));
//! cookies.set_by_name("theme", "light");
//!
//! let names: Vec<_> = cookies.names().collect();
//! assert_eq!(names, ["theme", "session"]);
//!
//! let mut headers = http::HeaderMap::new();
//! cookies.add_request_headers(&mut headers).unwrap();
//! assert_eq!(headers["cookie"], "theme=light; session=abc123");
//! ```

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::cookies::headers::{HeaderStore, COOKIE, SET_COOKIE};
use crate::cookies::{Cookie, CookieParser};
use crate::errors::CookieError;

/// Cookies of one request or response, unique by name, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Cookie>", into = "Vec<Cookie>")]
pub struct CookieCollection {
    /// Cookies in insertion order
    entries: Vec<Cookie>,
    /// Cookie name to position in `entries`
    index: HashMap<String, usize>,
}

impl CookieCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection from the `Cookie` and `Set-Cookie` headers in `headers`.
    pub fn from_headers(headers: &impl HeaderStore) -> Self {
        let mut cookies = Self::new();
        cookies.fill_from_headers(headers);
        cookies
    }

    /// Sets the cookie `name` to a fresh cookie with `value` and default attributes.
    pub fn set_by_name(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.add(Cookie::new(name, value));
    }

    /// Stores `cookie` under `name`. Fails if the cookie carries a different name.
    pub fn set_cookie(&mut self, name: &str, cookie: Cookie) -> Result<(), CookieError> {
        if cookie.name != name {
            return Err(CookieError::NameMismatch {
                key: name.to_string(),
                name: cookie.name,
            });
        }

        self.add(cookie);
        Ok(())
    }

    /// Adds `cookie`, replacing any cookie with the same name in place.
    pub fn add(&mut self, cookie: Cookie) {
        match self.index.get(&cookie.name) {
            Some(&pos) => self.entries[pos] = cookie,
            None => {
                self.index.insert(cookie.name.clone(), self.entries.len());
                self.entries.push(cookie);
            }
        }
    }

    /// Returns the cookie `name`, or [`CookieError::NotFound`].
    pub fn get(&self, name: &str) -> Result<&Cookie, CookieError> {
        self.get_optional(name)
            .ok_or_else(|| CookieError::NotFound(name.to_string()))
    }

    /// Returns the cookie `name`, if present.
    pub fn get_optional(&self, name: &str) -> Option<&Cookie> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Removes and returns the cookie `name`. Remaining cookies keep their order.
    pub fn remove(&mut self, name: &str) -> Option<Cookie> {
        let pos = self.index.remove(name)?;
        let cookie = self.entries.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(cookie)
    }

    /// Drops every cookie that has expired according to `clock`.
    pub fn remove_expired(&mut self, clock: &dyn Clock) {
        self.entries.retain(|cookie| !cookie.is_expired(clock));
        self.reindex();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates cookies in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Cookie> {
        self.entries.iter()
    }

    /// Iterates cookie names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|cookie| cookie.name.as_str())
    }

    /// Returns a detached name to cookie map.
    pub fn to_map(&self) -> HashMap<String, Cookie> {
        self.entries
            .iter()
            .map(|cookie| (cookie.name.clone(), cookie.clone()))
            .collect()
    }

    /// Adds every cookie from the `Cookie` and `Set-Cookie` headers, using the default parser.
    ///
    /// `Cookie` headers are read first. Later cookies replace earlier ones with the same
    /// name. Malformed `Set-Cookie` headers are skipped.
    pub fn fill_from_headers(&mut self, headers: &impl HeaderStore) {
        self.fill_from_headers_with(&CookieParser::default(), headers);
    }

    /// [`fill_from_headers`](Self::fill_from_headers) with a specific parser.
    pub fn fill_from_headers_with(&mut self, parser: &CookieParser, headers: &impl HeaderStore) {
        for header in headers.get_all(COOKIE) {
            for cookie in parser.parse_cookie_header(&header) {
                log::trace!("cookie from request header: {}", cookie.name);
                self.add(cookie);
            }
        }

        for header in headers.get_all(SET_COOKIE) {
            if let Some(cookie) = parser.parse_set_cookie_header(&header) {
                log::trace!("cookie from response header: {}", cookie.name);
                self.add(cookie);
            }
        }
    }

    /// Replaces all `Cookie` headers with one header holding every cookie, `; `-separated.
    ///
    /// When the collection is empty the `Cookie` header is only removed. On error
    /// `headers` is left untouched.
    pub fn add_request_headers<'h, H: HeaderStore>(&self, headers: &'h mut H) -> Result<&'h mut H, CookieError> {
        let mut values = Vec::new();
        if !self.is_empty() {
            let value = self
                .entries
                .iter()
                .map(Cookie::to_cookie_header)
                .collect::<Vec<_>>()
                .join("; ");
            values.push(value);
        }

        replace_header(headers, COOKIE, &values)?;
        Ok(headers)
    }

    /// Replaces all `Set-Cookie` headers with one header per cookie, in collection order.
    ///
    /// On error `headers` is left untouched.
    pub fn add_response_headers<'h, H: HeaderStore>(&self, headers: &'h mut H) -> Result<&'h mut H, CookieError> {
        let values: Vec<_> = self.entries.iter().map(Cookie::to_set_cookie_header).collect();

        replace_header(headers, SET_COOKIE, &values)?;
        Ok(headers)
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, cookie)| (cookie.name.clone(), pos))
            .collect();
    }
}

/// Swaps every value of header `name` for `values`. Nothing is written unless all values are accepted.
fn replace_header<H: HeaderStore>(headers: &mut H, name: &str, values: &[String]) -> Result<(), CookieError> {
    for value in values {
        headers.check(name, value)?;
    }

    headers.delete(name);
    for value in values {
        headers.add(name, value)?;
    }
    Ok(())
}

impl PartialEq for CookieCollection {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for CookieCollection {}

impl<'a> IntoIterator for &'a CookieCollection {
    type Item = &'a Cookie;
    type IntoIter = std::slice::Iter<'a, Cookie>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for CookieCollection {
    type Item = Cookie;
    type IntoIter = std::vec::IntoIter<Cookie>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<Cookie> for CookieCollection {
    fn extend<I: IntoIterator<Item = Cookie>>(&mut self, iter: I) {
        for cookie in iter {
            self.add(cookie);
        }
    }
}

impl FromIterator<Cookie> for CookieCollection {
    fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
        let mut cookies = Self::new();
        cookies.extend(iter);
        cookies
    }
}

impl From<Vec<Cookie>> for CookieCollection {
    fn from(cookies: Vec<Cookie>) -> Self {
        cookies.into_iter().collect()
    }
}

impl From<CookieCollection> for Vec<Cookie> {
    fn from(cookies: CookieCollection) -> Self {
        cookies.entries
    }
}

//! Header storage seen by [`CookieCollection`](crate::cookies::CookieCollection).
//!
//! The collection only needs three things from a header container: read every
//! value of a header, append a value, and drop a header entirely. Header names
//! are case-insensitive in every implementation.

use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::errors::CookieError;

/// Request header carrying `name=value` pairs.
pub const COOKIE: &str = "Cookie";

/// Response header carrying one cookie with attributes.
pub const SET_COOKIE: &str = "Set-Cookie";

/// A multi-valued header container.
pub trait HeaderStore {
    /// Returns every value of header `name`, in order. Empty if the header is absent.
    fn get_all(&self, name: &str) -> Vec<String>;

    /// Appends a value for header `name`, keeping existing values.
    fn add(&mut self, name: &str, value: &str) -> Result<(), CookieError>;

    /// Fails the way [`add`](Self::add) would for `name` and `value`, without writing anything.
    fn check(&self, _name: &str, _value: &str) -> Result<(), CookieError> {
        Ok(())
    }

    /// Removes all values of header `name`.
    fn delete(&mut self, name: &str);
}

impl HeaderStore for HeaderMap {
    fn get_all(&self, name: &str) -> Vec<String> {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            return Vec::new();
        };

        HeaderMap::get_all(self, &name)
            .iter()
            .filter_map(|value| match value.to_str() {
                Ok(text) => Some(text.to_string()),
                Err(_) => {
                    log::debug!("skipping non-text value in {name} header");
                    None
                }
            })
            .collect()
    }

    fn add(&mut self, name: &str, value: &str) -> Result<(), CookieError> {
        let (header_name, header_value) = to_header(name, value)?;
        self.append(header_name, header_value);
        Ok(())
    }

    fn check(&self, name: &str, value: &str) -> Result<(), CookieError> {
        to_header(name, value).map(|_| ())
    }

    fn delete(&mut self, name: &str) {
        if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
            self.remove(&name);
        }
    }
}

/// Only values that [`HeaderValue::to_str`] reads back are accepted, so `get_all`
/// returns everything `add` wrote.
fn to_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), CookieError> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| CookieError::InvalidHeaderName(name.to_string()))?;

    let visible = value.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b));
    let header_value = HeaderValue::from_str(value)
        .ok()
        .filter(|_| visible)
        .ok_or_else(|| CookieError::InvalidHeaderValue(value.to_string()))?;

    Ok((header_name, header_value))
}

/// Plain `(name, value)` list, as produced by simple HTTP/1 parsers.
impl HeaderStore for Vec<(String, String)> {
    fn get_all(&self, name: &str) -> Vec<String> {
        self.iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
            .collect()
    }

    fn add(&mut self, name: &str, value: &str) -> Result<(), CookieError> {
        self.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn delete(&mut self, name: &str) {
        self.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }
}

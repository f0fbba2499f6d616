//! Lexical rules shared by the `Cookie` and `Set-Cookie` parsers.
//!
//! ```text
//! cookie-pair   = token "=" cookie-value
//! token         = 1*<any CHAR except CTLs, SP or ()<>@,;:\"/[]?={}>
//! cookie-value  = DQUOTE *cookie-octet DQUOTE / *cookie-octet
//! cookie-octet  = %x21 / %x23-2B / %x2D-3A / %x3C-5B / %x5D-7E
//! cookie-av     = expires-av / max-age-av / domain-av / path-av /
//!                 secure-av / httponly-av / samesite-av / extension-av
//! ```
//!
//! Attribute names are matched case-insensitively. A segment that is well-formed
//! but fits none of the known attributes is an extension and is kept verbatim.
//! `Expires` only counts when its value has the shape of an HTTP date.

use lazy_static::lazy_static;
use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use crate::cookies::date::is_http_date;

const TOKEN: &str = r#"[^\x00-\x20\x7f()<>@,;:\\"/\[\]?={}]+"#;
const COOKIE_OCTET: &str = r"[\x21\x23-\x2b\x2d-\x3a\x3c-\x5b\x5d-\x7e]";
const DOMAIN_VALUE: &str = r"[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*";
const AV_VALUE: &str = r"[^\x00-\x1f\x7f;]+";

lazy_static! {
    static ref COOKIE_VALUE: String = format!(r#""{COOKIE_OCTET}*"|{COOKIE_OCTET}*"#);

    /// One pair inside a `Cookie` header, at the start or after `"; "`.
    pub(crate) static ref COOKIE_PAIR_SCAN: Regex = Regex::new(&format!(
        r"(?:^|; )(?P<name>{TOKEN})=(?P<value>{})",
        *COOKIE_VALUE
    ))
    .expect("valid cookie-pair scan pattern");

    /// A pair that must span the whole input.
    static ref COOKIE_PAIR: Regex = Regex::new(&format!(
        r"^(?P<name>{TOKEN})=(?P<value>{})$",
        *COOKIE_VALUE
    ))
    .expect("valid cookie-pair pattern");

    static ref AV_SEGMENT: Regex = Regex::new(&format!("^{AV_VALUE}$")).expect("valid av pattern");
    static ref EXPIRES_AV: Regex = Regex::new(r"(?i)^Expires=(?P<expires>.*)$").expect("valid expires pattern");
    static ref MAX_AGE_AV: Regex = Regex::new(r"(?i)^Max-Age=(?P<max_age>[0-9]+)$").expect("valid max-age pattern");
    static ref DOMAIN_AV: Regex = Regex::new(&format!(r"(?i)^Domain=\.?(?P<domain>{DOMAIN_VALUE})$"))
        .expect("valid domain pattern");
    static ref PATH_AV: Regex = Regex::new(&format!(r"(?i)^Path=(?P<path>{AV_VALUE})$")).expect("valid path pattern");
    static ref SECURE_AV: Regex = Regex::new(r"(?i)^Secure$").expect("valid secure pattern");
    static ref HTTP_ONLY_AV: Regex = Regex::new(r"(?i)^HttpOnly$").expect("valid httponly pattern");
    static ref SAME_SITE_AV: Regex = Regex::new(r"(?i)^SameSite=(?P<same_site>\w+)$").expect("valid samesite pattern");
}

/// Bytes that are escaped in a cookie value: everything outside `cookie-octet`, plus `%`.
const VALUE_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b',')
    .add(b';')
    .add(b'\\')
    .add(b'%');

/// Bytes that are escaped in a cookie name: everything outside `token`, plus `%`.
const NAME_ESCAPES: &AsciiSet = &VALUE_ESCAPES
    .add(b'(')
    .add(b')')
    .add(b'<')
    .add(b'>')
    .add(b'@')
    .add(b':')
    .add(b'/')
    .add(b'[')
    .add(b']')
    .add(b'?')
    .add(b'=')
    .add(b'{')
    .add(b'}');

/// A classified `Set-Cookie` attribute segment. Values borrow from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attribute<'a> {
    Expires(&'a str),
    MaxAge(&'a str),
    Domain(&'a str),
    Path(&'a str),
    Secure,
    HttpOnly,
    SameSite(&'a str),
    Extension(&'a str),
}

/// Splits a whole-input `name=value` pair. Returns raw (still encoded) text.
pub(crate) fn match_pair(input: &str) -> Option<(&str, &str)> {
    let caps = COOKIE_PAIR.captures(input)?;
    Some((caps.name("name")?.as_str(), caps.name("value")?.as_str()))
}

/// Classifies one attribute segment, `None` if the segment is not a valid `cookie-av` at all.
pub(crate) fn classify_attribute(segment: &str) -> Option<Attribute<'_>> {
    if !AV_SEGMENT.is_match(segment) {
        return None;
    }

    let attribute = if let Some(v) = group(&EXPIRES_AV, segment, "expires").filter(|v| is_http_date(v)) {
        Attribute::Expires(v)
    } else if let Some(v) = group(&MAX_AGE_AV, segment, "max_age") {
        Attribute::MaxAge(v)
    } else if let Some(v) = group(&DOMAIN_AV, segment, "domain") {
        Attribute::Domain(v)
    } else if let Some(v) = group(&PATH_AV, segment, "path") {
        Attribute::Path(v)
    } else if SECURE_AV.is_match(segment) {
        Attribute::Secure
    } else if HTTP_ONLY_AV.is_match(segment) {
        Attribute::HttpOnly
    } else if let Some(v) = group(&SAME_SITE_AV, segment, "same_site") {
        Attribute::SameSite(v)
    } else {
        Attribute::Extension(segment)
    };

    Some(attribute)
}

fn group<'h>(re: &Regex, haystack: &'h str, name: &str) -> Option<&'h str> {
    re.captures(haystack)?.name(name).map(|m| m.as_str())
}

pub(crate) fn encode_name(name: &str) -> String {
    percent_encode(name.as_bytes(), NAME_ESCAPES).to_string()
}

pub(crate) fn encode_value(value: &str) -> String {
    percent_encode(value.as_bytes(), VALUE_ESCAPES).to_string()
}

/// Percent-decodes a name or value. Invalid UTF-8 is replaced, never rejected.
pub(crate) fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_accepts_plain_and_quoted_values() {
        assert_eq!(match_pair("foo=bar"), Some(("foo", "bar")));
        assert_eq!(match_pair(r#"foo="bar""#), Some(("foo", r#""bar""#)));
        assert_eq!(match_pair("foo="), Some(("foo", "")));
    }

    #[test]
    fn pair_rejects_bad_names_and_values() {
        assert_eq!(match_pair("=bar"), None);
        assert_eq!(match_pair("fo o=bar"), None);
        assert_eq!(match_pair("foo=ba r"), None);
        assert_eq!(match_pair("foo=ba,r"), None);
        assert_eq!(match_pair(r#"foo="bar"#), None);
        assert_eq!(match_pair("foo:x=bar"), None);
    }

    #[test]
    fn attributes_are_case_insensitive() {
        assert_eq!(classify_attribute("path=/a"), Some(Attribute::Path("/a")));
        assert_eq!(classify_attribute("PATH=/a"), Some(Attribute::Path("/a")));
        assert_eq!(classify_attribute("secure"), Some(Attribute::Secure));
        assert_eq!(classify_attribute("HTTPONLY"), Some(Attribute::HttpOnly));
        assert_eq!(classify_attribute("max-age=10"), Some(Attribute::MaxAge("10")));
        assert_eq!(classify_attribute("samesite=lax"), Some(Attribute::SameSite("lax")));
    }

    #[test]
    fn domain_drops_one_leading_dot() {
        assert_eq!(classify_attribute("Domain=.example.com"), Some(Attribute::Domain("example.com")));
        assert_eq!(classify_attribute("Domain=10.0.0.1"), Some(Attribute::Domain("10.0.0.1")));
        assert_eq!(classify_attribute("Domain=ex_ample.com"), Some(Attribute::Extension("Domain=ex_ample.com")));
    }

    #[test]
    fn malformed_known_attributes_become_extensions() {
        assert_eq!(classify_attribute("Max-Age=soon"), Some(Attribute::Extension("Max-Age=soon")));
        assert_eq!(classify_attribute("Secure=1"), Some(Attribute::Extension("Secure=1")));
        assert_eq!(classify_attribute("Path="), Some(Attribute::Extension("Path=")));
        assert_eq!(classify_attribute("Priority=High"), Some(Attribute::Extension("Priority=High")));
    }

    #[test]
    fn expires_keeps_raw_date_text() {
        assert_eq!(
            classify_attribute("expires=Wed, 09 Jun 2021 10:18:14 GMT"),
            Some(Attribute::Expires("Wed, 09 Jun 2021 10:18:14 GMT"))
        );
        assert_eq!(
            classify_attribute("Expires=Wed, 31 Feb 2021 10:18:14 GMT"),
            Some(Attribute::Expires("Wed, 31 Feb 2021 10:18:14 GMT"))
        );
    }

    #[test]
    fn expires_without_a_date_is_an_extension() {
        assert_eq!(classify_attribute("Expires=whenever"), Some(Attribute::Extension("Expires=whenever")));
        assert_eq!(classify_attribute("Expires="), Some(Attribute::Extension("Expires=")));
    }

    #[test]
    fn empty_or_control_segments_are_invalid() {
        assert_eq!(classify_attribute(""), None);
        assert_eq!(classify_attribute("Path=/\x01"), None);
    }

    #[test]
    fn encoding_escapes_delimiters_and_percent() {
        assert_eq!(encode_value("a b;c,d\"e\\f%"), "a%20b%3Bc%2Cd%22e%5Cf%25");
        assert_eq!(encode_name("a=b"), "a%3Db");
        assert_eq!(encode_value("a=b"), "a=b");
        assert_eq!(encode_value("h\u{e9}"), "h%C3%A9");
    }

    #[test]
    fn decoding_reverses_encoding() {
        for s in ["plain", "with space", "semi;colon", "100%", "caf\u{e9}", "a=b"] {
            assert_eq!(decode(&encode_value(s)), s);
            assert_eq!(decode(&encode_name(s)), s);
        }
        assert_eq!(decode("%FF"), "\u{fffd}");
    }
}

//! Cookie expiry dates.
//!
//! Four legacy grammars are accepted, tried in this order:
//!
//! | grammar    | example                              |
//! |------------|--------------------------------------|
//! | RFC 1123   | `Wed, 09 Jun 2021 10:18:14 GMT`      |
//! | RFC 1036   | `Wednesday, 09-Jun-21 10:18:14 GMT`  |
//! | IIS        | `Wed, 9-Jun-2021 10:18:14 GMT`       |
//! | asctime    | `Wed Jun  9 10:18:14 2021`           |
//!
//! Weekday, month and zone names are case-insensitive. The weekday is not checked
//! against the date. Anything that does not match, or names an impossible date,
//! yields `None`.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

const WKDAY: &str = "Mon|Tue|Wed|Thu|Fri|Sat|Sun";
const WEEKDAY: &str = "Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday";
const MONTH: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";
const TIME: &str = r"(?P<hour>\d{2}):(?P<minute>\d{2}):(?P<second>\d{2})";
const ZONE: &str = r"UT|GMT|EST|EDT|CST|CDT|MST|MDT|PST|PDT|[+-]?\d{4}";

lazy_static! {
    static ref RFC1123_DATE: Regex = Regex::new(&format!(
        r"(?i)^(?:{WKDAY}), (?P<day>\d{{1,2}}) (?P<month>{MONTH}) (?P<year>\d{{4}}|\d{{2}}) {TIME} (?P<zone>{ZONE})$"
    ))
    .expect("valid rfc1123 pattern");
    static ref RFC1036_DATE: Regex = Regex::new(&format!(
        r"(?i)^(?:{WEEKDAY}), (?P<day>\d{{2}})-(?P<month>{MONTH})-(?P<year>\d{{2}}) {TIME} GMT$"
    ))
    .expect("valid rfc1036 pattern");
    static ref IIS_DATE: Regex = Regex::new(&format!(
        r"(?i)^(?:{WKDAY}), (?P<day>\d{{1,2}})-(?P<month>{MONTH})-(?P<year>\d{{4}}|\d{{2}}) {TIME} GMT$"
    ))
    .expect("valid iis pattern");
    static ref ANSI_C_DATE: Regex = Regex::new(&format!(
        r"(?i)^(?:{WKDAY}) (?P<month>{MONTH}) (?P<day>\d{{2}}| \d) {TIME} (?P<year>\d{{4}})$"
    ))
    .expect("valid asctime pattern");
}

/// Parses an expiry date in any of the accepted grammars. The result is in UTC.
pub fn parse_http_date(input: &str) -> Option<OffsetDateTime> {
    if let Some(caps) = RFC1123_DATE.captures(input) {
        return assemble(&caps, zone_offset(&caps["zone"])?);
    }

    [&*RFC1036_DATE, &*IIS_DATE, &*ANSI_C_DATE]
        .into_iter()
        .find_map(|re| re.captures(input))
        .and_then(|caps| assemble(&caps, UtcOffset::UTC))
}

/// Returns `true` if `input` has the shape of one of the accepted grammars, even
/// when it names an impossible date such as 31 Feb.
pub(crate) fn is_http_date(input: &str) -> bool {
    [&*RFC1123_DATE, &*RFC1036_DATE, &*IIS_DATE, &*ANSI_C_DATE]
        .into_iter()
        .any(|re| re.is_match(input))
}

/// Formats `at` the way `Expires` attributes are written, e.g. `Wed, 09 Jun 2021 10:18:14 GMT`.
pub fn format_http_date(at: OffsetDateTime) -> Option<String> {
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );

    let utc = at.checked_to_offset(UtcOffset::UTC)?;
    match utc.format(format) {
        Ok(formatted) => Some(formatted),
        Err(e) => {
            log::debug!("cannot format cookie expiry {at}: {e}");
            None
        }
    }
}

fn assemble(caps: &Captures<'_>, offset: UtcOffset) -> Option<OffsetDateTime> {
    let date = Date::from_calendar_date(
        full_year(&caps["year"])?,
        month(&caps["month"])?,
        caps["day"].trim().parse().ok()?,
    )
    .ok()?;
    let time = Time::from_hms(
        caps["hour"].parse().ok()?,
        caps["minute"].parse().ok()?,
        caps["second"].parse().ok()?,
    )
    .ok()?;

    PrimitiveDateTime::new(date, time)
        .assume_offset(offset)
        .checked_to_offset(UtcOffset::UTC)
}

/// Two-digit years follow the usual cookie convention: 70-99 is the 1900s, 00-69 the 2000s.
fn full_year(digits: &str) -> Option<i32> {
    let year: i32 = digits.parse().ok()?;
    Some(match digits.len() {
        2 if year >= 70 => 1900 + year,
        2 => 2000 + year,
        _ => year,
    })
}

fn month(name: &str) -> Option<Month> {
    let month = match name.to_ascii_lowercase().as_str() {
        "jan" => Month::January,
        "feb" => Month::February,
        "mar" => Month::March,
        "apr" => Month::April,
        "may" => Month::May,
        "jun" => Month::June,
        "jul" => Month::July,
        "aug" => Month::August,
        "sep" => Month::September,
        "oct" => Month::October,
        "nov" => Month::November,
        "dec" => Month::December,
        _ => return None,
    };
    Some(month)
}

fn zone_offset(zone: &str) -> Option<UtcOffset> {
    let hours = match zone.to_ascii_uppercase().as_str() {
        "UT" | "GMT" => 0,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        numeric => {
            let (sign, digits) = match numeric.as_bytes().first()? {
                b'-' => (-1, &numeric[1..]),
                b'+' => (1, &numeric[1..]),
                _ => (1, numeric),
            };
            let hh: i8 = digits.get(0..2)?.parse().ok()?;
            let mm: i8 = digits.get(2..4)?.parse().ok()?;
            return UtcOffset::from_hms(sign * hh, sign * mm, 0).ok();
        }
    };
    UtcOffset::from_hms(hours, 0, 0).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const EXPECTED: OffsetDateTime = datetime!(2021-06-09 10:18:14 UTC);

    #[test]
    fn parses_rfc1123() {
        assert_eq!(parse_http_date("Wed, 09 Jun 2021 10:18:14 GMT"), Some(EXPECTED));
        assert_eq!(parse_http_date("Wed, 9 Jun 2021 10:18:14 UT"), Some(EXPECTED));
        assert_eq!(parse_http_date("wed, 09 JUN 2021 10:18:14 gmt"), Some(EXPECTED));
        assert_eq!(parse_http_date("Wed, 09 Jun 21 10:18:14 GMT"), Some(EXPECTED));
    }

    #[test]
    fn rfc1123_zones_are_applied() {
        assert_eq!(parse_http_date("Wed, 09 Jun 2021 06:18:14 EDT"), Some(EXPECTED));
        assert_eq!(parse_http_date("Wed, 09 Jun 2021 02:18:14 PST"), Some(EXPECTED));
        assert_eq!(parse_http_date("Wed, 09 Jun 2021 12:18:14 +0200"), Some(EXPECTED));
        assert_eq!(parse_http_date("Wed, 09 Jun 2021 05:48:14 -0430"), Some(EXPECTED));
        assert_eq!(parse_http_date("Wed, 09 Jun 2021 10:18:14 0000"), Some(EXPECTED));
    }

    #[test]
    fn parses_rfc1036() {
        assert_eq!(parse_http_date("Wednesday, 09-Jun-21 10:18:14 GMT"), Some(EXPECTED));
        assert_eq!(
            parse_http_date("Sunday, 06-Nov-94 08:49:37 GMT"),
            Some(datetime!(1994-11-06 08:49:37 UTC))
        );
    }

    #[test]
    fn parses_iis() {
        assert_eq!(parse_http_date("Wed, 9-Jun-2021 10:18:14 GMT"), Some(EXPECTED));
        assert_eq!(parse_http_date("Wed, 09-Jun-21 10:18:14 GMT"), Some(EXPECTED));
    }

    #[test]
    fn parses_asctime() {
        assert_eq!(parse_http_date("Wed Jun  9 10:18:14 2021"), Some(EXPECTED));
        assert_eq!(parse_http_date("Wed Jun 09 10:18:14 2021"), Some(EXPECTED));
        assert_eq!(parse_http_date("Wed Jun 9 10:18:14 2021"), None);
    }

    #[test]
    fn two_digit_year_pivot() {
        assert_eq!(full_year("69"), Some(2069));
        assert_eq!(full_year("70"), Some(1970));
        assert_eq!(full_year("2000"), Some(2000));
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_http_date(""), None);
        assert_eq!(parse_http_date("tomorrow"), None);
        assert_eq!(parse_http_date("Wed, 31 Feb 2021 10:18:14 GMT"), None);
        assert_eq!(parse_http_date("Wed, 09 Jun 2021 25:18:14 GMT"), None);
        assert_eq!(parse_http_date("Wed, 09 Jun 2021 10:18:14 CET"), None);
        assert_eq!(parse_http_date(" Wed, 09 Jun 2021 10:18:14 GMT"), None);
        assert_eq!(parse_http_date("Wednesday, 09-Jun-2021 10:18:14 EST"), None);
    }

    #[test]
    fn date_shape_ignores_calendar_validity() {
        assert!(is_http_date("Wed, 09 Jun 2021 10:18:14 GMT"));
        assert!(is_http_date("Wed Jun  9 10:18:14 2021"));
        assert!(is_http_date("Wed, 31 Feb 2021 10:18:14 GMT"));
        assert!(!is_http_date("someday"));
        assert!(!is_http_date("Wed, 09 Jun 2021 10:18:14 CET"));
    }

    #[test]
    fn formats_in_gmt() {
        assert_eq!(format_http_date(EXPECTED).as_deref(), Some("Wed, 09 Jun 2021 10:18:14 GMT"));
        assert_eq!(
            format_http_date(datetime!(2021-06-09 12:18:14 +2)).as_deref(),
            Some("Wed, 09 Jun 2021 10:18:14 GMT")
        );
    }

    #[test]
    fn formatted_dates_parse_back() {
        for at in [EXPECTED, datetime!(1970-01-01 00:00:00 UTC), datetime!(2038-01-19 03:14:08 UTC)] {
            let formatted = format_http_date(at).unwrap();
            assert_eq!(parse_http_date(&formatted), Some(at));
        }
    }
}

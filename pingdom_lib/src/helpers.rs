//! Helpers for query encoding, cookie lookup, and value formatting.

use crate::error::{Error, Result};
use chrono::{DateTime, Local, Utc};
use reqwest::header::HeaderValue;
use std::fmt::Display;
use url::form_urlencoded;

/// Form-encode `pairs` sorted by key; values of one key keep their order.
///
/// Sorting makes the encoding independent of map iteration order.
pub fn encode_query<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = pairs.into_iter().collect();
    pairs.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in &pairs {
        serializer.append_pair(k.as_ref(), v.as_ref());
    }
    serializer.finish()
}

/// Value of the first cookie named `name` set by `response`, if any.
pub fn response_cookie(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

/// True if `value` is a non-empty RFC 6265 cookie value: no whitespace,
/// control characters, double quotes, commas, semicolons or backslashes.
pub fn is_cookie_value(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| {
            matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
        })
}

/// A `Cookie` request header carrying `pairs`, rejecting unsafe values.
pub fn cookie_header(pairs: &[(&str, &str)]) -> Result<HeaderValue> {
    if let Some((name, _)) = pairs.iter().find(|(_, v)| !is_cookie_value(v)) {
        return Err(Error::Config(format!("invalid value for the {} cookie", name)));
    }
    let joined = pairs
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ");
    let mut value = HeaderValue::from_str(&joined)
        .map_err(|_| Error::Config("cookie header is not a valid header value".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Join ids into the comma-separated form the API expects ("1,2,3").
pub fn join_ids<T: Display>(ids: &[T]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Format a Unix timestamp for display. If `use_utc` is true, shows UTC;
/// otherwise converts to local timezone. Out-of-range values print as-is.
pub fn format_timestamp_display(ts: i64, use_utc: bool) -> String {
    let dt = match DateTime::<Utc>::from_timestamp(ts, 0) {
        Some(d) => d,
        None => return ts.to_string(),
    };
    if use_utc {
        dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    } else {
        dt.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_query_sorts_keys() {
        let q = encode_query(vec![("b", "2"), ("a", "1"), ("c", "x y")]);
        assert_eq!(q, "a=1&b=2&c=x+y");
    }

    #[test]
    fn encode_query_keeps_repeated_keys_in_order() {
        let q = encode_query(vec![("b", "z"), ("a", "2"), ("a", "1")]);
        assert_eq!(q, "a=2&a=1&b=z");
    }

    #[test]
    fn cookie_values() {
        assert!(is_cookie_value("qw4us4Ed7aLSGugMRDHkqM9G6mwuKdn9Hz90r6IHhRc%3D"));
        assert!(is_cookie_value("test_org"));
        assert!(!is_cookie_value(""));
        assert!(!is_cookie_value("org; jwt=evil"));
        assert!(!is_cookie_value("a,b"));
        assert!(!is_cookie_value("a b"));
        assert!(!is_cookie_value("\"quoted\""));
        assert!(!is_cookie_value("back\\slash"));
    }

    #[test]
    fn cookie_header_joins_pairs() {
        let v = cookie_header(&[("a", "1"), ("b", "2")]).unwrap();
        assert_eq!(v.to_str().unwrap(), "a=1; b=2");
        assert!(v.is_sensitive());
    }

    #[test]
    fn cookie_header_rejects_injection() {
        let r = cookie_header(&[("login_session_swicus_org_id", "org; jwt=evil")]);
        match r {
            Err(Error::Config(msg)) => assert!(msg.contains("login_session_swicus_org_id")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn join_ids_commas() {
        assert_eq!(join_ids(&[1, 2, 3]), "1,2,3");
        assert_eq!(join_ids::<i64>(&[]), "");
    }

    #[test]
    fn timestamp_utc() {
        assert_eq!(format_timestamp_display(0, true), "1970-01-01 00:00:00 UTC");
    }
}

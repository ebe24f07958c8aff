/*
[INPUT]:  Response headers from any transport (reqwest map, plain maps)
[OUTPUT]: Case-insensitive header values
[POS]:    Session layer - single header accessor used by usage tracking
[UPDATE]: When a new header container needs to feed usage tracking
*/

use std::collections::{BTreeMap, HashMap};

use reqwest::header::HeaderMap;

pub const REQUESTS_USED_HEADER: &str = "x-requests-used";
pub const REQUESTS_REMAINING_HEADER: &str = "x-requests-remaining";
pub const DAILY_LIMIT_HEADER: &str = "x-daily-limit";

/// Read access to response headers, matching names case-insensitively
pub trait HeaderLookup {
    fn header(&self, name: &str) -> Option<&str>;

    /// Header parsed as a signed integer; `None` when missing or malformed
    fn header_i64(&self, name: &str) -> Option<i64> {
        self.header(name).and_then(|value| value.trim().parse().ok())
    }
}

impl HeaderLookup for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        // HeaderName lookups are already case-insensitive
        self.get(name).and_then(|value| value.to_str().ok())
    }
}

impl HeaderLookup for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        find_ignore_case(self.iter(), name)
    }
}

impl HeaderLookup for BTreeMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        find_ignore_case(self.iter(), name)
    }
}

impl<T: HeaderLookup + ?Sized> HeaderLookup for &T {
    fn header(&self, name: &str) -> Option<&str> {
        (**self).header(name)
    }
}

fn find_ignore_case<'a>(
    mut entries: impl Iterator<Item = (&'a String, &'a String)>,
    name: &str,
) -> Option<&'a str> {
    entries
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

//! Preference signals: where a visitor's language choice comes from and how
//! it is remembered between visits.

/// Cookie carrying the last chosen locale id.
pub const LOCALE_COOKIE: &str = "vitepress-locale";

/// Durable client storage key for the last confirmed locale id.
pub const PREFERRED_LANG_KEY: &str = "vitepress-preferred-lang";

/// One year, in seconds.
pub const COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

/// Cookie string persisting `locale` for the whole site.
pub fn locale_cookie(locale: &str) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}",
        LOCALE_COOKIE, locale, COOKIE_MAX_AGE_SECS
    )
}

/// Value of the first cookie called `name` in a `Cookie` header.
pub fn cookie_value<'h>(header: &'h str, name: &str) -> Option<&'h str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// Language tags of an `Accept-Language` header in header order.
///
/// Weights are dropped, not sorted on: the header order is the priority.
pub fn parse_accept_language(header: &str) -> Vec<&str> {
    header
        .split(',')
        .filter_map(|entry| {
            let tag = entry.split(';').next().unwrap_or("").trim();
            (!tag.is_empty() && tag != "*").then_some(tag)
        })
        .collect()
}

/// Everything a request tells us about the visitor's language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSignals<'a> {
    /// Previously stored choice (cookie or client storage).
    pub stored: Option<&'a str>,
    /// Advertised languages, highest priority first.
    pub languages: Vec<&'a str>,
}

impl<'a> PreferenceSignals<'a> {
    pub fn new(stored: Option<&'a str>, languages: Vec<&'a str>) -> Self {
        Self { stored, languages }
    }

    /// Signals from raw `Cookie` and `Accept-Language` header values.
    pub fn from_headers(cookie: Option<&'a str>, accept_language: Option<&'a str>) -> Self {
        Self {
            stored: cookie
                .and_then(|header| cookie_value(header, LOCALE_COOKIE))
                .filter(|value| !value.is_empty()),
            languages: accept_language
                .map(parse_accept_language)
                .unwrap_or_default(),
        }
    }
}

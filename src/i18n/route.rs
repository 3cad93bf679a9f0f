//! Route codec: the one place that knows a localized URL looks like
//! `"/" + segment + path`.

use crate::i18n::LocalePathMap;

/// A URL split into its locale and the locale-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRoute {
    /// Configured locale id, `None` when the URL has no locale prefix.
    pub locale: Option<String>,
    /// Always starts with `/`, except for an empty input URL.
    pub path: String,
}

impl ParsedRoute {
    pub fn has_locale(&self) -> bool {
        self.locale.is_some()
    }
}

/// Decodes and encodes localized URLs against a [`LocalePathMap`].
#[derive(Debug, Clone, Copy)]
pub struct RouteCodec<'a> {
    map: &'a LocalePathMap,
}

impl<'a> RouteCodec<'a> {
    pub fn new(map: &'a LocalePathMap) -> Self {
        Self { map }
    }

    /// Split a URL into locale and remaining path, ignoring query and fragment.
    pub fn decode(&self, url: &str) -> ParsedRoute {
        let (path, _) = split_suffix(url);

        if let Some(rest) = path.strip_prefix('/') {
            let (segment, remainder) = match rest.find('/') {
                Some(index) => rest.split_at(index),
                None => (rest, ""),
            };
            if let Some(locale) = self.map.locale_of(segment) {
                return ParsedRoute {
                    locale: Some(locale.to_string()),
                    path: if remainder.is_empty() {
                        "/".to_string()
                    } else {
                        remainder.to_string()
                    },
                };
            }
        }

        ParsedRoute {
            locale: None,
            path: path.to_string(),
        }
    }

    /// URL of `path` under `locale`; `None` if the locale is not configured.
    pub fn encode(&self, locale: &str, path: &str) -> Option<String> {
        self.map
            .path_of(locale)
            .map(|segment| prefix_path(segment, path))
    }

    /// The page behind `url` in every configured locale, in configuration order.
    pub fn alternates(&self, url: &str) -> Vec<(&'a str, String)> {
        let route = self.decode(url);
        self.map
            .pairs()
            .map(|(locale, segment)| (locale, prefix_path(segment, &route.path)))
            .collect()
    }
}

fn prefix_path(segment: &str, path: &str) -> String {
    match path {
        "" | "/" => format!("/{}/", segment),
        _ if path.starts_with('/') => format!("/{}{}", segment, path),
        _ => format!("/{}/{}", segment, path),
    }
}

/// Split a URL into its path and its `?query#fragment` suffix.
pub fn split_suffix(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(index) => url.split_at(index),
        None => (url, ""),
    }
}

//! Redirect policy: decide whether a request needs a locale redirect.
//!
//! Trailing-slash canonicalization of a locale root is permanent (301).
//! Picking a locale for an unprefixed URL is temporary (302) so caches and
//! crawlers never pin a visitor to one language.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::i18n::route::split_suffix;
use crate::i18n::{LocalePathMap, ParsedRoute, PreferenceSignals, RouteCodec};

/// What the server should do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 301 to the canonical URL.
    PermanentRedirect(String),
    /// 302 to the chosen locale's version of the URL.
    TemporaryRedirect { location: String, locale: String },
    /// Serve the request as is.
    PassThrough,
}

impl Action {
    pub fn location(&self) -> Option<&str> {
        match self {
            Action::PermanentRedirect(location) => Some(location),
            Action::TemporaryRedirect { location, .. } => Some(location),
            Action::PassThrough => None,
        }
    }
}

/// Decides which request paths are never localized (assets, dev-tool internals).
pub trait AssetFilter {
    fn is_passthrough(&self, path: &str) -> bool;
}

/// Static assets by extension plus build-tool internal paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAssetFilter;

fn asset_extension_regex() -> &'static Regex {
    static ASSET_EXTENSION: OnceLock<Regex> = OnceLock::new();
    ASSET_EXTENSION.get_or_init(|| {
        Regex::new(r"\.(js|css|png|jpg|jpeg|gif|svg|ico|woff|woff2|ttf|eot)$")
            .expect("asset extension pattern is valid")
    })
}

impl AssetFilter for DefaultAssetFilter {
    fn is_passthrough(&self, path: &str) -> bool {
        asset_extension_regex().is_match(path)
            || path.starts_with("/@")
            || path.starts_with("/__")
            || path.contains("/.vitepress/")
    }
}

impl<F> AssetFilter for F
where
    F: Fn(&str) -> bool,
{
    fn is_passthrough(&self, path: &str) -> bool {
        self(path)
    }
}

/// Pure redirect decision over a locale path map.
#[derive(Debug, Clone)]
pub struct RedirectPolicy<'a, F = DefaultAssetFilter> {
    map: &'a LocalePathMap,
    filter: F,
}

impl<'a> RedirectPolicy<'a, DefaultAssetFilter> {
    pub fn new(map: &'a LocalePathMap) -> Self {
        Self {
            map,
            filter: DefaultAssetFilter,
        }
    }
}

impl<'a, F: AssetFilter> RedirectPolicy<'a, F> {
    pub fn with_filter(map: &'a LocalePathMap, filter: F) -> Self {
        Self { map, filter }
    }

    /// Decode `raw_url` and decide.
    pub fn evaluate(&self, raw_url: &str, signals: &PreferenceSignals<'_>) -> Action {
        let route = RouteCodec::new(self.map).decode(raw_url);
        self.decide(&route, raw_url, signals)
    }

    /// Decide for an already decoded route.
    pub fn decide(
        &self,
        route: &ParsedRoute,
        raw_url: &str,
        signals: &PreferenceSignals<'_>,
    ) -> Action {
        let (raw_path, suffix) = split_suffix(raw_url);
        if self.filter.is_passthrough(raw_path) {
            return Action::PassThrough;
        }

        let codec = RouteCodec::new(self.map);

        match route.locale.as_deref() {
            Some(locale) if route.path == "/" && !raw_path.ends_with('/') => {
                match codec.encode(locale, "/") {
                    Some(canonical) => {
                        let location = format!("{}{}", canonical, suffix);
                        debug!("Canonicalizing {} -> {}", raw_url, location);
                        Action::PermanentRedirect(location)
                    }
                    None => Action::PassThrough,
                }
            }
            Some(_) => Action::PassThrough,
            None => {
                let locale = self
                    .map
                    .resolve_locale(signals.stored, signals.languages.iter().copied());
                match codec.encode(locale, &route.path) {
                    Some(target) => {
                        let location = format!("{}{}", target, suffix);
                        debug!("Redirecting {} -> {} ({})", raw_url, location, locale);
                        Action::TemporaryRedirect {
                            location,
                            locale: locale.to_string(),
                        }
                    }
                    None => Action::PassThrough,
                }
            }
        }
    }
}

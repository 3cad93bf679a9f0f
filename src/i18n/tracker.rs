//! Client-side locale tracker.
//!
//! Runs once per page load inside a single-threaded host (a page's script
//! engine, a webview, a test harness). Everything the host owns is reached
//! through the traits below so the tracker never touches ambient globals.
//!
//! On load it either
//! - remembers the locale found in the current URL,
//! - or, on an unprefixed site root, resolves a locale and forces a full
//!   reload to that locale's root (soft navigation is not possible before
//!   the host router is initialized),
//!
//! and then registers a hook that remembers the locale after every in-page
//! navigation. Storage failures are swallowed: detection keeps working from
//! the URL alone.

use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info};

use crate::i18n::route::split_suffix;
use crate::i18n::{locale_cookie, LocalePathMap, RouteCodec};

/// A durable per-browser store could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write rejected: {0}")]
    Rejected(String),
}

/// Durable per-browser preference storage (local storage + cookie jar).
///
/// Hosts keep the stored locale under [`PREFERRED_LANG_KEY`](crate::i18n::PREFERRED_LANG_KEY).
pub trait PreferenceStore {
    /// Last confirmed locale id, if any.
    fn stored_locale(&self) -> Result<Option<String>, StorageError>;
    fn store_locale(&self, locale: &str) -> Result<(), StorageError>;
    /// Write a full `Set-Cookie`-style string.
    fn set_cookie(&self, cookie: &str) -> Result<(), StorageError>;
}

/// The host's navigation facilities.
pub trait Navigator {
    /// Languages the browser advertises, highest priority first.
    fn languages(&self) -> Vec<String>;
    /// Replace the current page with `url`, reloading everything.
    fn full_reload(&self, url: &str);
}

/// The host router's lifecycle hooks.
pub trait RouteHooks {
    /// Call `hook` with the new path after every in-page navigation.
    fn on_after_route_change(&mut self, hook: Box<dyn Fn(&str)>);
}

/// Supplies the deployed base path of the site (`/` or `/docs/`).
pub trait RootPathResolver {
    fn root_path(&self) -> String;
}

/// A fixed, known base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRoot(pub String);

impl RootPathResolver for StaticRoot {
    fn root_path(&self) -> String {
        crate::config::normalize_base(&self.0)
    }
}

/// Base path derived from the URLs of assets emitted into the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetUrls(pub Vec<String>);

impl RootPathResolver for AssetUrls {
    fn root_path(&self) -> String {
        detect_base_path(self.0.iter().map(String::as_str))
    }
}

/// The base is whatever precedes the first `/assets/` or `/vp-icons.css`
/// in an asset URL's path. Absolute URLs are reduced to their path first.
pub fn detect_base_path<'u, I>(asset_urls: I) -> String
where
    I: IntoIterator<Item = &'u str>,
{
    for url in asset_urls {
        let path = url_path(url);
        let marker = ["/assets/", "/vp-icons.css"]
            .iter()
            .filter_map(|marker| path.find(marker))
            .min();
        if let Some(index) = marker {
            return path[..=index].to_string();
        }
    }
    "/".to_string()
}

fn url_path(url: &str) -> &str {
    let (without_suffix, _) = split_suffix(url);
    let after_host = match without_suffix.split_once("://") {
        Some((_, rest)) => Some(rest),
        // Network-path reference: `//host/path`
        None => without_suffix.strip_prefix("//"),
    };
    match after_host {
        Some(rest) => rest.find('/').map(|index| &rest[index..]).unwrap_or("/"),
        None => without_suffix,
    }
}

/// Result of running the tracker at page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The URL carried a locale; it was persisted.
    Tracked(String),
    /// The visitor landed on the bare root and was sent to this URL.
    Redirected(String),
    /// No locale in the URL and not the root; nothing to do.
    Untracked,
}

/// Remembers the active locale and redirects a bare root visit once.
#[derive(Clone)]
pub struct ClientLocaleTracker {
    map: Rc<LocalePathMap>,
    store: Rc<dyn PreferenceStore>,
    base: String,
}

impl ClientLocaleTracker {
    pub fn new(
        map: Rc<LocalePathMap>,
        store: Rc<dyn PreferenceStore>,
        root: &dyn RootPathResolver,
    ) -> Self {
        Self {
            map,
            store,
            base: crate::config::normalize_base(&root.root_path()),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Page-load entry point. The host calls this after its own setup.
    pub fn on_load(
        &self,
        pathname: &str,
        navigator: &dyn Navigator,
        hooks: &mut dyn RouteHooks,
    ) -> LoadOutcome {
        let local_path = self.strip_base(pathname);
        let route = RouteCodec::new(&self.map).decode(local_path);

        let outcome = match route.locale {
            Some(locale) => {
                self.persist(&locale);
                LoadOutcome::Tracked(locale)
            }
            None if local_path.is_empty() || local_path == "/" => {
                let target = self.redirect_target(navigator);
                info!("Redirecting root visit to {}", target);
                navigator.full_reload(&target);
                return LoadOutcome::Redirected(target);
            }
            None => LoadOutcome::Untracked,
        };

        let tracker = self.clone();
        hooks.on_after_route_change(Box::new(move |to: &str| {
            tracker.after_route_change(to);
        }));

        outcome
    }

    /// Persist the locale of a path the host router just navigated to.
    pub fn after_route_change(&self, to: &str) -> Option<String> {
        let route = RouteCodec::new(&self.map).decode(self.strip_base(to));
        let locale = route.locale?;
        self.persist(&locale);
        Some(locale)
    }

    fn redirect_target(&self, navigator: &dyn Navigator) -> String {
        let stored = match self.store.stored_locale() {
            Ok(stored) => stored,
            Err(e) => {
                debug!("Ignoring unreadable stored locale: {}", e);
                None
            }
        };
        let languages = navigator.languages();
        let locale = self
            .map
            .resolve_locale(stored.as_deref(), languages.iter().map(String::as_str));

        let localized = RouteCodec::new(&self.map)
            .encode(locale, "/")
            .unwrap_or_else(|| "/".to_string());
        format!("{}{}", self.base.trim_end_matches('/'), localized)
    }

    fn persist(&self, locale: &str) {
        if let Err(e) = self.store.store_locale(locale) {
            debug!("Could not store locale {}: {}", locale, e);
        }
        if let Err(e) = self.store.set_cookie(&locale_cookie(locale)) {
            debug!("Could not set locale cookie for {}: {}", locale, e);
        }
    }

    /// Path relative to the deployed base, keeping its leading `/`.
    fn strip_base<'p>(&self, path: &'p str) -> &'p str {
        if self.base == "/" {
            return path;
        }
        let base_without_slash = self.base.trim_end_matches('/');
        if path == base_without_slash {
            return "/";
        }
        match path.strip_prefix(base_without_slash) {
            Some(rest) if rest.starts_with('/') => rest,
            _ => path,
        }
    }
}

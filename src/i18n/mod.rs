//! Locale routing for multi-language static sites.
//!
//! Decides *which path* a visitor should see, never *what content* it holds.
//!
//! # Architecture
//!
//! - `path_map`: validated locale id ↔ path segment bijection, built once at startup
//! - `matcher`: exact / family / simple language tag matching
//! - `preference`: cookie and `Accept-Language` signals, persistence constants
//! - `route`: URL decoding and encoding (`"/" + segment + path`)
//! - `redirect`: pure 301 / 302 / pass-through decision for the server
//! - `tracker`: client-side locale persistence and one-time root redirect
//! - `snapshot`: serialized locale tables handed to the client
//! - `switcher`: same page, other locale
//!
//! # Example
//!
//! ```rust,ignore
//! use i18n_router::config::Locales;
//! use i18n_router::i18n::{LocalePathMap, PreferenceSignals, RedirectPolicy};
//!
//! let map = LocalePathMap::build(&Locales::from(vec![("zh-CN", "zh"), ("en-US", "en")]), "en-US")?;
//! let signals = PreferenceSignals::from_headers(None, Some("zh-HK,en;q=0.8"));
//! let action = RedirectPolicy::new(&map).evaluate("/", &signals);
//! assert_eq!(action.location(), Some("/zh/"));
//! ```

mod error;
mod matcher;
mod path_map;
mod preference;
mod redirect;
mod route;
mod snapshot;
mod switcher;
mod tracker;

pub use error::ConfigError;
pub use matcher::{normalize_tag, LanguageMatcher};
pub use path_map::LocalePathMap;
pub use preference::{
    cookie_value, locale_cookie, parse_accept_language, PreferenceSignals, COOKIE_MAX_AGE_SECS,
    LOCALE_COOKIE, PREFERRED_LANG_KEY,
};
pub use redirect::{Action, AssetFilter, DefaultAssetFilter, RedirectPolicy};
pub use route::{split_suffix, ParsedRoute, RouteCodec};
pub use snapshot::{ClientSnapshot, SNAPSHOT_GLOBAL};
pub use switcher::LocaleSwitcher;
pub use tracker::{
    detect_base_path, AssetUrls, ClientLocaleTracker, LoadOutcome, Navigator, PreferenceStore,
    RootPathResolver, RouteHooks, StaticRoot, StorageError,
};

//! Language switching between pages of the same site.
//!
//! Works on a page's source-relative path as the site generator reports it
//! (`zh/guide/intro.md`), not on the browser URL.

use tracing::warn;

use crate::i18n::{LocalePathMap, RouteCodec};

#[derive(Debug, Clone, Copy)]
pub struct LocaleSwitcher<'a> {
    map: &'a LocalePathMap,
}

impl<'a> LocaleSwitcher<'a> {
    pub fn new(map: &'a LocalePathMap) -> Self {
        Self { map }
    }

    /// Locale of the page at `relative_path`, from its first directory.
    pub fn current_locale(&self, relative_path: &str) -> Option<&'a str> {
        let (segment, _) = relative_path.trim_start_matches('/').split_once('/')?;
        self.map.locale_of(segment)
    }

    pub fn available_locales(&self) -> Vec<&'a str> {
        self.map.all_locales()
    }

    /// URL of the page at `relative_path` in `target`.
    ///
    /// `index.md` maps to the locale root and `.md` suffixes are dropped.
    /// An unconfigured target is logged and yields `None`.
    pub fn switch_target(&self, relative_path: &str, target: &str) -> Option<String> {
        let codec = RouteCodec::new(self.map);
        if !self.map.is_valid_locale(target) {
            warn!("Locale \"{}\" not found in configuration", target);
            return None;
        }

        let relative = relative_path.trim_start_matches('/');
        let page = match relative.split_once('/') {
            Some((segment, rest)) if self.map.is_valid_path(segment) => rest,
            _ => relative,
        };

        let path = if page.is_empty() || page == "index.md" {
            "/".to_string()
        } else if let Some(dir) = page.strip_suffix("/index.md") {
            format!("/{}/", dir)
        } else {
            format!("/{}", page.strip_suffix(".md").unwrap_or(page))
        };

        codec.encode(target, &path)
    }
}

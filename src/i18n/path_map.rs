//! Locale path map: the validated bijection between locale ids and URL
//! path segments.
//!
//! Built once at startup from [`RouterConfig`](crate::config::RouterConfig)
//! and never mutated afterwards, so a single instance can be shared by
//! reference (or behind an `Arc`) across every request.

use std::collections::HashMap;

use tracing::debug;

use crate::config::{Locales, RouterConfig};
use crate::i18n::{ConfigError, LanguageMatcher};

#[derive(Debug, Clone, PartialEq, Eq)]
struct LocaleEntry {
    locale: String,
    segment: String,
}

/// Bidirectional locale id ↔ path segment lookup.
///
/// Locale ids keep their configured casing but are looked up
/// case-insensitively. Path segments are matched exactly.
#[derive(Debug, Clone)]
pub struct LocalePathMap {
    /// Configuration order
    entries: Vec<LocaleEntry>,
    /// Lowercased locale id -> entry index
    by_locale: HashMap<String, usize>,
    /// Path segment -> entry index
    by_segment: HashMap<String, usize>,
    default_index: usize,
}

impl LocalePathMap {
    /// Build the map from configured locales and the default locale.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the locale set is empty, a locale or
    /// path segment repeats, a segment cannot appear as a single URL path
    /// component, or the default locale is not configured.
    pub fn build(locales: &Locales, default_locale: &str) -> Result<Self, ConfigError> {
        if locales.is_empty() {
            return Err(ConfigError::NoLocales);
        }
        if default_locale.trim().is_empty() {
            return Err(ConfigError::MissingDefaultLocale);
        }

        let pairs = locales.pairs();
        let mut entries = Vec::with_capacity(pairs.len());
        let mut by_locale = HashMap::with_capacity(pairs.len());
        let mut by_segment: HashMap<String, usize> = HashMap::with_capacity(pairs.len());

        for (index, (locale, segment)) in pairs.into_iter().enumerate() {
            if locale.trim().is_empty() {
                return Err(ConfigError::EmptyLocale);
            }
            if !is_valid_segment(segment) {
                return Err(ConfigError::InvalidPathSegment {
                    locale: locale.to_string(),
                    segment: segment.to_string(),
                });
            }
            if by_locale.insert(locale.to_lowercase(), index).is_some() {
                return Err(ConfigError::DuplicateLocale(locale.to_string()));
            }
            if let Some(&first) = by_segment.get(segment) {
                let first: &LocaleEntry = &entries[first];
                return Err(ConfigError::DuplicatePathSegment {
                    segment: segment.to_string(),
                    first: first.locale.clone(),
                    second: locale.to_string(),
                });
            }
            by_segment.insert(segment.to_string(), index);
            entries.push(LocaleEntry {
                locale: locale.to_string(),
                segment: segment.to_string(),
            });
        }

        let default_index = *by_locale
            .get(&default_locale.to_lowercase())
            .ok_or_else(|| ConfigError::UnknownDefaultLocale(default_locale.to_string()))?;

        debug!(
            "Built locale path map with {} locales (default: {})",
            entries.len(),
            entries[default_index].locale
        );

        Ok(Self {
            entries,
            by_locale,
            by_segment,
            default_index,
        })
    }

    pub fn from_config(config: &RouterConfig) -> Result<Self, ConfigError> {
        Self::build(&config.locales, &config.default_locale)
    }

    /// Path segment for a locale, if configured.
    pub fn path_of(&self, locale: &str) -> Option<&str> {
        self.entry_for_locale(locale).map(|entry| entry.segment.as_str())
    }

    /// Locale id for an exact path segment, if configured.
    pub fn locale_of(&self, segment: &str) -> Option<&str> {
        self.by_segment
            .get(segment)
            .map(|&index| self.entries[index].locale.as_str())
    }

    /// The configured spelling of a locale id given in any casing.
    pub fn canonical_locale(&self, locale: &str) -> Option<&str> {
        self.entry_for_locale(locale).map(|entry| entry.locale.as_str())
    }

    pub fn is_valid_locale(&self, locale: &str) -> bool {
        self.entry_for_locale(locale).is_some()
    }

    pub fn is_valid_path(&self, segment: &str) -> bool {
        self.by_segment.contains_key(segment)
    }

    /// All locale ids in configuration order.
    pub fn all_locales(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.locale.as_str()).collect()
    }

    /// All path segments in configuration order.
    pub fn all_path_segments(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.segment.as_str()).collect()
    }

    /// (locale id, path segment) pairs in configuration order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.locale.as_str(), entry.segment.as_str()))
    }

    pub fn default_locale(&self) -> &str {
        &self.entries[self.default_index].locale
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Matcher seeded with every configured locale.
    pub fn matcher(&self) -> LanguageMatcher<'_> {
        LanguageMatcher::new(self.entries.iter().map(|entry| entry.locale.as_str()))
    }

    /// Best configured locale for a single browser language tag.
    pub fn find_best_match(&self, tag: &str) -> Option<&str> {
        self.matcher().find(tag)
    }

    /// Collapse preference signals into one locale: a stored choice naming a
    /// configured locale wins, then the first language tag that matches,
    /// then the default locale.
    pub fn resolve_locale<'t, I>(&self, stored: Option<&str>, tags: I) -> &str
    where
        I: IntoIterator<Item = &'t str>,
    {
        if let Some(locale) = stored.and_then(|stored| self.canonical_locale(stored.trim())) {
            return locale;
        }
        self.matcher()
            .best_of(tags)
            .unwrap_or_else(|| self.default_locale())
    }

    fn entry_for_locale(&self, locale: &str) -> Option<&LocaleEntry> {
        self.by_locale
            .get(&locale.to_lowercase())
            .map(|&index| &self.entries[index])
    }
}

/// A segment must be usable as exactly one URL path component.
fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
}

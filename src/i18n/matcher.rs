//! Language matching: pick the best configured locale for a browser
//! language tag.
//!
//! Tiers, first match wins:
//! 1. exact, case-insensitive (`zh-cn` → `zh-CN`)
//! 2. family: a regional locale sharing the primary subtag (`zh-HK` → `zh-CN`)
//! 3. simple: a bare locale equal to the primary subtag (`zh-HK` → `zh`)

/// Matches language tags against an ordered set of locale ids.
#[derive(Debug, Clone)]
pub struct LanguageMatcher<'a> {
    locales: Vec<&'a str>,
}

impl<'a> LanguageMatcher<'a> {
    pub fn new<I>(locales: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            locales: locales.into_iter().collect(),
        }
    }

    /// Best locale for one tag (`en_US`, `zh-HK`, `FR`...), or `None`.
    pub fn find(&self, tag: &str) -> Option<&'a str> {
        let normalized = normalize_tag(tag);
        if normalized.is_empty() {
            return None;
        }

        if let Some(exact) = self
            .locales
            .iter()
            .find(|locale| locale.eq_ignore_ascii_case(&normalized))
        {
            return Some(*exact);
        }

        let primary = primary_subtag(&normalized);
        let family_prefix = format!("{}-", primary);
        if let Some(family) = self
            .locales
            .iter()
            .find(|locale| locale.to_lowercase().starts_with(&family_prefix))
        {
            return Some(*family);
        }

        self.locales
            .iter()
            .find(|locale| locale.eq_ignore_ascii_case(primary))
            .copied()
    }

    /// First non-empty match over tags given in priority order.
    pub fn best_of<'t, I>(&self, tags: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'t str>,
    {
        tags.into_iter().find_map(|tag| self.find(tag))
    }
}

/// Trim, lowercase and turn `_` separators into `-`.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_lowercase()
}

fn primary_subtag(normalized: &str) -> &str {
    normalized.split('-').next().unwrap_or(normalized)
}

use anyhow::{Context, Result};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::i18n::ConfigError;

/// Process configuration for the redirecting static server.
#[derive(Debug, Clone)]
pub struct Config {
    // Routing
    pub router: RouterConfig,

    // Static site
    pub site_dir: PathBuf,
    pub site_base: String,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config_path = std::env::var("I18N_CONFIG").context("I18N_CONFIG not set")?;

        Ok(Self {
            router: RouterConfig::from_file(&config_path)?,

            site_dir: std::env::var("SITE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("docs/.vitepress/dist")),
            site_base: normalize_base(
                &std::env::var("SITE_BASE").unwrap_or_else(|_| "/".to_string()),
            ),

            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }
}

/// Ensure a deployment base starts and ends with `/`.
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// User-facing router configuration, as written in the site's JSON config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RouterConfig {
    pub locales: Locales,
    pub default_locale: String,
    #[serde(default)]
    pub locale_names: HashMap<String, String>,
    /// Handed to the theme untouched.
    #[serde(default)]
    pub rewrites: HashMap<String, String>,
    #[serde(default)]
    pub switcher_position: SwitcherPosition,
}

impl RouterConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read router config {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Invalid router config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: RouterConfig = serde_json::from_str(raw).context("Malformed router config")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the same invariants the path map enforces, without building it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::i18n::LocalePathMap::from_config(self).map(|_| ())
    }

    /// Display name for a locale, falling back to the locale id itself.
    pub fn display_name<'a>(&'a self, locale: &'a str) -> &'a str {
        self.locale_names
            .get(locale)
            .map(String::as_str)
            .unwrap_or(locale)
    }
}

/// Where the theme renders its language switcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitcherPosition {
    #[default]
    Nav,
    Sidebar,
    None,
}

/// Configured locales: either a plain list (segment = locale id) or an
/// explicit locale id to path segment mapping. Order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locales {
    List(Vec<String>),
    Mapping(Vec<(String, String)>),
}

impl Locales {
    /// (locale id, path segment) pairs in configuration order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        match self {
            Locales::List(ids) => ids.iter().map(|id| (id.as_str(), id.as_str())).collect(),
            Locales::Mapping(pairs) => pairs
                .iter()
                .map(|(id, segment)| (id.as_str(), segment.as_str()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Locales::List(ids) => ids.is_empty(),
            Locales::Mapping(pairs) => pairs.is_empty(),
        }
    }
}

impl From<Vec<&str>> for Locales {
    fn from(ids: Vec<&str>) -> Self {
        Locales::List(ids.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<(&str, &str)>> for Locales {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        Locales::Mapping(
            pairs
                .into_iter()
                .map(|(id, segment)| (id.to_string(), segment.to_string()))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for Locales {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LocalesVisitor;

        impl<'de> Visitor<'de> for LocalesVisitor {
            type Value = Locales;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a list of locale ids or a map of locale id to path segment")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Locales, A::Error> {
                let mut ids = Vec::new();
                while let Some(id) = seq.next_element::<String>()? {
                    ids.push(id);
                }
                Ok(Locales::List(ids))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Locales, A::Error> {
                let mut pairs: Vec<(String, String)> = Vec::new();
                while let Some((id, segment)) = map.next_entry::<String, String>()? {
                    if pairs.iter().any(|(existing, _)| *existing == id) {
                        return Err(de::Error::custom(format!("duplicate locale '{}'", id)));
                    }
                    pairs.push((id, segment));
                }
                Ok(Locales::Mapping(pairs))
            }
        }

        deserializer.deserialize_any(LocalesVisitor)
    }
}

//! Client config artifact: the normalized locale tables, serialized for the
//! page so the client tracker can rebuild the same [`LocalePathMap`].

use serde::de;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::Locales;
use crate::i18n::{ConfigError, LocalePathMap};

/// Global the artifact is assigned to in the emitted script.
pub const SNAPSHOT_GLOBAL: &str = "__I18N_ROUTER__";

/// Serialized snapshot of a [`LocalePathMap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSnapshot {
    pub locales: Vec<String>,
    #[serde(serialize_with = "ordered_map")]
    pub path_to_locale: Vec<(String, String)>,
    #[serde(serialize_with = "ordered_map")]
    pub locale_to_path: Vec<(String, String)>,
    pub default_locale: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    locales: Vec<String>,
    #[serde(default)]
    path_to_locale: Option<HashMap<String, String>>,
    locale_to_path: HashMap<String, String>,
    default_locale: String,
}

impl ClientSnapshot {
    pub fn from_map(map: &LocalePathMap) -> Self {
        Self {
            locales: map.all_locales().into_iter().map(str::to_string).collect(),
            path_to_locale: map
                .pairs()
                .map(|(locale, segment)| (segment.to_string(), locale.to_string()))
                .collect(),
            locale_to_path: map
                .pairs()
                .map(|(locale, segment)| (locale.to_string(), segment.to_string()))
                .collect(),
            default_locale: map.default_locale().to_string(),
        }
    }

    /// Rebuild the path map, re-running every configuration check.
    pub fn to_path_map(&self) -> Result<LocalePathMap, ConfigError> {
        LocalePathMap::build(
            &Locales::Mapping(self.locale_to_path.clone()),
            &self.default_locale,
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// `window.__I18N_ROUTER__ = {...};` for inlining into a page.
    pub fn to_script(&self) -> serde_json::Result<String> {
        Ok(format!("window.{} = {};", SNAPSHOT_GLOBAL, self.to_json()?))
    }

    /// Parse an emitted artifact. The three tables must describe the same
    /// mapping; `pathToLocale` may be omitted.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(raw)?;
        // Object key order is not preserved by the parser; `locales` carries it.
        let locale_to_path = raw
            .locales
            .iter()
            .map(|locale| match raw.locale_to_path.get(locale) {
                Some(segment) => Ok((locale.clone(), segment.clone())),
                None => Err(de::Error::custom(format!(
                    "locale '{}' has no localeToPath entry",
                    locale
                ))),
            })
            .collect::<serde_json::Result<Vec<_>>>()?;

        if let Some(extra) = raw
            .locale_to_path
            .keys()
            .find(|locale| !raw.locales.contains(locale))
        {
            return Err(de::Error::custom(format!(
                "localeToPath names '{}', which is not in locales",
                extra
            )));
        }

        let path_to_locale: Vec<(String, String)> = locale_to_path
            .iter()
            .map(|(locale, segment)| (segment.clone(), locale.clone()))
            .collect();

        if let Some(declared) = &raw.path_to_locale {
            let consistent = declared.len() == path_to_locale.len()
                && path_to_locale
                    .iter()
                    .all(|(segment, locale)| declared.get(segment) == Some(locale));
            if !consistent {
                return Err(de::Error::custom(
                    "pathToLocale is not the inverse of localeToPath",
                ));
            }
        }

        Ok(Self {
            locales: raw.locales,
            path_to_locale,
            locale_to_path,
            default_locale: raw.default_locale,
        })
    }
}

fn ordered_map<S: Serializer>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, value) in pairs {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

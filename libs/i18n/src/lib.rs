//! Localized message catalogs.
//!
//! A [`LocaleStore`] is built once at startup and shared through the
//! application state. Lookups fall back from the requested locale to the
//! default locale and finally to the empty string.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub mod catalog;
pub mod error;
pub mod format;
pub mod plural;

pub use catalog::{CatalogSource, EmbeddedCatalogs, SUPPORTED_LOCALES};
pub use error::{FormatError, I18nError};
pub use format::Message;
pub use plural::{PluralCategory, PluralRules};

/// A loaded catalog and the plural rules of its culture.
#[derive(Debug)]
struct LocaleData {
    rules: PluralRules,
    messages: HashMap<String, String>,
}

pub struct LocaleStore {
    default_locale: &'static str,
    cache_enabled: bool,
    source: Box<dyn CatalogSource>,
    cache: DashMap<String, Arc<LocaleData>>,
}

impl std::fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleStore")
            .field("default_locale", &self.default_locale)
            .field("cache_enabled", &self.cache_enabled)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl LocaleStore {
    /// Store backed by the catalogs embedded in the binary.
    ///
    /// `cache_enabled` keeps parsed catalogs in memory; it is only switched
    /// on in production.
    pub fn new(default_locale: &str, cache_enabled: bool) -> Result<Self, I18nError> {
        Self::with_source(default_locale, cache_enabled, EmbeddedCatalogs)
    }

    pub fn with_source<S>(default_locale: &str, cache_enabled: bool, source: S) -> Result<Self, I18nError>
    where
        S: CatalogSource + 'static,
    {
        let default_locale = supported(default_locale)
            .ok_or_else(|| I18nError::UnsupportedLocale(default_locale.to_string()))?;
        Ok(Self {
            default_locale,
            cache_enabled,
            source: Box::new(source),
            cache: DashMap::new(),
        })
    }

    pub fn default_locale(&self) -> &'static str {
        self.default_locale
    }

    /// Loads every supported catalog so a broken one fails at startup.
    pub fn preload(&self) -> Result<(), I18nError> {
        for (code, _) in SUPPORTED_LOCALES {
            let data = self.locale_data(code)?;
            info!("Loaded locale {} ({} messages)", code, data.messages.len());
        }
        Ok(())
    }

    /// The requested locale if it has a catalog, otherwise the default.
    pub fn resolve_locale(&self, requested: Option<&str>) -> &'static str {
        requested.and_then(supported).unwrap_or(self.default_locale)
    }

    /// Picks the best supported locale from an `Accept-Language` header.
    ///
    /// Entries are tried by descending quality; a bare language (`pt`) or a
    /// different region (`pt-PT`) matches the supported locale of that language.
    pub fn negotiate(&self, accept_language: &str) -> &'static str {
        let mut ranges: Vec<(&str, f32)> = accept_language
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() {
                    return None;
                }
                let quality = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (quality > 0.0).then_some((tag, quality))
            })
            .collect();
        // Stable sort keeps header order among equal qualities
        ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranges
            .into_iter()
            .find_map(|(tag, _)| {
                supported(tag).or_else(|| {
                    let language = tag.split('-').next().unwrap_or(tag);
                    SUPPORTED_LOCALES
                        .iter()
                        .find(|(code, _)| {
                            code.split('-')
                                .next()
                                .is_some_and(|l| l.eq_ignore_ascii_case(language))
                        })
                        .map(|(code, _)| *code)
                })
            })
            .unwrap_or(self.default_locale)
    }

    /// Raw template for `key`, without formatting.
    pub fn translate(&self, locale: Option<&str>, key: &str) -> Result<String, I18nError> {
        Ok(self
            .lookup(locale, key)?
            .map(|(template, _)| template)
            .unwrap_or_default())
    }

    /// Template for `key` formatted with `params`.
    pub fn translate_with(&self, locale: Option<&str>, key: &str, params: &Value) -> Result<String, I18nError> {
        let Some((template, rules)) = self.lookup(locale, key)? else {
            return Ok(String::new());
        };
        let to_error = |source| I18nError::Format {
            key: key.to_string(),
            source,
        };
        Message::parse(&template)
            .and_then(|message| message.format(rules, params))
            .map_err(to_error)
    }

    // Message from the active catalog, else from the default catalog, with
    // the plural rules of whichever catalog supplied it.
    fn lookup(&self, locale: Option<&str>, key: &str) -> Result<Option<(String, PluralRules)>, I18nError> {
        let active = self.resolve_locale(locale);
        let data = self.locale_data(active)?;
        if let Some(template) = data.messages.get(key) {
            return Ok(Some((template.clone(), data.rules)));
        }
        if active == self.default_locale {
            return Ok(None);
        }

        debug!("Key {} missing in {}, falling back to {}", key, active, self.default_locale);
        let fallback = self.locale_data(self.default_locale)?;
        Ok(fallback
            .messages
            .get(key)
            .map(|template| (template.clone(), fallback.rules)))
    }

    fn locale_data(&self, locale: &str) -> Result<Arc<LocaleData>, I18nError> {
        if !self.cache_enabled {
            return self.load(locale).map(Arc::new);
        }
        if let Some(data) = self.cache.get(locale) {
            return Ok(Arc::clone(data.value()));
        }
        // Another request may have loaded it since the read above
        match self.cache.entry(locale.to_string()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let data = Arc::new(self.load(locale)?);
                entry.insert(Arc::clone(&data));
                Ok(data)
            }
        }
    }

    fn load(&self, locale: &str) -> Result<LocaleData, I18nError> {
        let bytes = self
            .source
            .read(locale)
            .ok_or_else(|| I18nError::CatalogNotFound(locale.to_string()))?;
        let messages: HashMap<String, String> =
            serde_json::from_slice(&bytes).map_err(|source| I18nError::MalformedCatalog {
                locale: locale.to_string(),
                source,
            })?;
        let culture = catalog::culture_of(locale).unwrap_or(locale);
        debug!("Parsed catalog {} with {} messages", locale, messages.len());
        Ok(LocaleData {
            rules: PluralRules::for_culture(culture),
            messages,
        })
    }
}

fn supported(locale: &str) -> Option<&'static str> {
    SUPPORTED_LOCALES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(locale))
        .map(|(code, _)| *code)
}

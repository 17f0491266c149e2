use rust_embed::RustEmbed;
use std::borrow::Cow;

/// Locale codes with a catalog, paired with the culture used for plural rules.
pub const SUPPORTED_LOCALES: [(&str, &str); 2] = [("en", "en"), ("pt-BR", "pt")];

/// Plural culture of a supported locale.
pub fn culture_of(locale: &str) -> Option<&'static str> {
    SUPPORTED_LOCALES
        .iter()
        .find(|(code, _)| *code == locale)
        .map(|(_, culture)| *culture)
}

/// Where raw catalog bytes come from.
pub trait CatalogSource: Send + Sync {
    fn read(&self, locale: &str) -> Option<Cow<'static, [u8]>>;
}

#[derive(RustEmbed)]
#[folder = "locale/"]
#[include = "*.json"]
struct LocaleFiles;

/// Catalogs compiled into the binary from `locale/<code>.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalogs;

impl CatalogSource for EmbeddedCatalogs {
    fn read(&self, locale: &str) -> Option<Cow<'static, [u8]>> {
        LocaleFiles::get(&format!("{locale}.json")).map(|file| file.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_locale_is_embedded() {
        for (code, _) in SUPPORTED_LOCALES {
            let bytes = EmbeddedCatalogs.read(code).expect("catalog embedded");
            let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert!(parsed.is_object(), "{code} should be a JSON object");
        }
        assert!(EmbeddedCatalogs.read("fr").is_none());
    }

    #[test]
    fn test_culture_of() {
        assert_eq!(culture_of("en"), Some("en"));
        assert_eq!(culture_of("pt-BR"), Some("pt"));
        assert_eq!(culture_of("pt"), None);
    }
}

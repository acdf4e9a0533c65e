//! Language registry: Single source of truth for all asset languages.
//!
//! The registry is initialized once with `OnceLock` and is immutable
//! afterwards.

use std::sync::OnceLock;

/// Configuration for a supported asset language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "kn")
    pub code: &'static str,

    /// Label shown on the language indicator badge of a gallery card
    pub badge: &'static str,

    /// Suffix used in asset paths and download file names (e.g., "eng", "knd")
    pub file_suffix: &'static str,

    /// Whether this is the primary language shown by default (only one should be true)
    pub is_canonical: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get the canonical (default display) language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not contain exactly one canonical language.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }
}

/// English is canonical; Kannada is the alternate rendition.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            badge: "ENG",
            file_suffix: "eng",
            is_canonical: true,
        },
        LanguageConfig {
            code: "kn",
            badge: "ಕನ್ನಡ",
            file_suffix: "knd",
            is_canonical: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_english() {
        let config = LanguageRegistry::get().get_by_code("en").unwrap();

        assert_eq!(config.badge, "ENG");
        assert_eq!(config.file_suffix, "eng");
        assert!(config.is_canonical);
    }

    #[test]
    fn test_get_by_code_kannada() {
        let config = LanguageRegistry::get().get_by_code("kn").unwrap();

        assert_eq!(config.badge, "ಕನ್ನಡ");
        assert_eq!(config.file_suffix, "knd");
        assert!(!config.is_canonical);
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LanguageRegistry::get().get_by_code("es").is_none());
    }

    #[test]
    fn test_canonical_returns_english() {
        let canonical = LanguageRegistry::get().canonical();
        assert_eq!(canonical.code, "en");
    }
}

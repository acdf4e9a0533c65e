//! Language type: validated handle onto a registry entry.

use crate::i18n::{LanguageConfig, LanguageRegistry};

/// A validated asset language.
///
/// Only languages present in the registry can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "kn")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };

    pub const KANNADA: Language = Language { code: "kn" };

    /// The language every bilingual card shows before any interaction.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is not in the registry, which cannot happen for a
    /// Language built via the constants or `canonical`.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// Label for the language indicator badge ("ENG", "ಕನ್ನಡ").
    pub fn badge(&self) -> &'static str {
        self.config().badge
    }

    /// Suffix used in download file names ("eng", "knd").
    pub fn file_suffix(&self) -> &'static str {
        self.config().file_suffix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_english_constant() {
        let english = Language::ENGLISH;
        assert_eq!(english.code(), "en");
        assert_eq!(english.badge(), "ENG");
        assert_eq!(english.file_suffix(), "eng");
    }

    #[test]
    fn test_kannada_constant() {
        let kannada = Language::KANNADA;
        assert_eq!(kannada.code(), "kn");
        assert_eq!(kannada.badge(), "ಕನ್ನಡ");
        assert_eq!(kannada.file_suffix(), "knd");
    }

    // ==================== canonical Tests ====================

    #[test]
    fn test_canonical_returns_english() {
        let canonical = Language::canonical();
        assert_eq!(canonical, Language::ENGLISH);
    }

    #[test]
    fn test_language_debug() {
        let debug = format!("{:?}", Language::KANNADA);
        assert!(debug.contains("kn"));
    }
}

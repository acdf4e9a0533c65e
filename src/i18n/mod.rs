//! Language support for bilingual assets.
//!
//! Every localized asset on the site exists as an English and a Kannada
//! rendition. This module is the single place that knows which languages
//! exist and how each one is labelled in the UI and in download file names.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported languages and their metadata
//! - `language`: Type-safe Language handle validated against the registry
//!
//! # Example
//!
//! ```rust,ignore
//! use valavaara::i18n::{Language, LanguageRegistry};
//!
//! let primary = Language::canonical();
//! let kannada = Language::KANNADA;
//! assert_eq!(kannada.badge(), "ಕನ್ನಡ");
//! ```

mod language;
mod registry;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};

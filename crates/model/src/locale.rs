//! Locale - Language/country/variant triple used to key localized attributes
//!
//! Parsing accepts the ISO forms `ll`, `ll_CC`, `ll_CC_variant`, `ll__variant`,
//! `_CC` and `_CC_variant`, with either `_` or `-` as separator. The language
//! is two or three lowercase letters, the country two uppercase letters or a
//! three digit area code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// A locale identifying one translation of a localized attribute
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    country: Option<String>,
    variant: Option<String>,
}

impl Locale {
    /// Create a language-only locale
    ///
    /// The language is lowercased first. Like every constructor here, it
    /// accepts only locales whose ISO code parses back to the same locale.
    pub fn new(language: &str) -> ModelResult<Self> {
        Self::from_parts(language, "", "").validated()
    }

    /// Create a language + country locale
    pub fn with_country(language: &str, country: &str) -> ModelResult<Self> {
        Self::from_parts(language, country, "").validated()
    }

    /// Create a locale with all three parts
    pub fn with_variant(language: &str, country: &str, variant: &str) -> ModelResult<Self> {
        Self::from_parts(language, country, variant).validated()
    }

    fn from_parts(language: &str, country: &str, variant: &str) -> Self {
        Self {
            language: language.to_lowercase(),
            country: non_empty(country.to_uppercase()),
            variant: non_empty(variant.to_string()),
        }
    }

    fn validated(self) -> ModelResult<Self> {
        let code = self.to_string();
        match Locale::parse(&code) {
            Ok(parsed) if parsed == self => Ok(parsed),
            _ => Err(ModelError::InvalidLocale { value: code }),
        }
    }

    pub fn english() -> Self {
        Self::from_parts("en", "", "")
    }

    pub fn german() -> Self {
        Self::from_parts("de", "", "")
    }

    pub fn french() -> Self {
        Self::from_parts("fr", "", "")
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Parse an ISO locale code
    pub fn parse(code: &str) -> ModelResult<Self> {
        let invalid = || ModelError::InvalidLocale {
            value: code.to_string(),
        };

        if code.len() < 2 || code.contains('#') {
            return Err(invalid());
        }

        if code.starts_with('_') || code.starts_with('-') {
            return parse_country_only(code).ok_or_else(invalid);
        }

        parse_language_first(code).ok_or_else(invalid)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        match (&self.country, &self.variant) {
            (Some(country), Some(variant)) => write!(f, "_{}_{}", country, variant),
            (Some(country), None) => write!(f, "_{}", country),
            (None, Some(variant)) => write!(f, "__{}", variant),
            (None, None) => Ok(()),
        }
    }
}

impl FromStr for Locale {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locale::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn is_separator(c: char) -> bool {
    c == '_' || c == '-'
}

fn is_language_code(s: &str) -> bool {
    (s.len() == 2 || s.len() == 3) && s.chars().all(|c| c.is_ascii_lowercase())
}

fn is_country_code(s: &str) -> bool {
    s.len() == 2 && s.chars().all(|c| c.is_ascii_uppercase())
}

fn is_area_code(s: &str) -> bool {
    s.len() == 3 && s.chars().all(|c| c.is_ascii_digit())
}

/// `_CC` or `_CC_variant`
fn parse_country_only(code: &str) -> Option<Locale> {
    let rest = &code[1..];
    let country = rest.get(..2)?;
    if !is_country_code(country) {
        return None;
    }

    let tail = &rest[2..];
    if tail.is_empty() {
        return Some(Locale::from_parts("", country, ""));
    }

    let mut chars = tail.chars();
    if !chars.next().is_some_and(is_separator) {
        return None;
    }
    let variant = chars.as_str();
    if variant.is_empty() {
        return None;
    }

    Some(Locale::from_parts("", country, variant))
}

/// `ll`, `ll_CC`, `ll_CC_variant` or `ll__variant`
fn parse_language_first(code: &str) -> Option<Locale> {
    if is_language_code(code) {
        return Some(Locale::from_parts(code, "", ""));
    }

    let separator = if code.contains('_') { '_' } else { '-' };
    let segments: Vec<&str> = code.splitn(3, separator).collect();

    match segments.as_slice() {
        [language, country] => {
            if is_language_code(language) && (is_country_code(country) || is_area_code(country)) {
                Some(Locale::from_parts(language, country, ""))
            } else {
                None
            }
        }
        [language, country, variant] => {
            let country_ok =
                country.is_empty() || is_country_code(country) || is_area_code(country);
            if (language.is_empty() || is_language_code(language))
                && country_ok
                && !variant.is_empty()
            {
                Some(Locale::from_parts(language, country, variant))
            } else {
                None
            }
        }
        _ => None,
    }
}

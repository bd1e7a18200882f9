//! Attributes - Named value slots stored by an item model context
//!
//! A plain attribute holds one value. A localized attribute holds one value
//! per locale. Cloning an attribute deep-copies its locale map.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::locale::Locale;

/// Whether an attribute is plain or localized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Plain,
    Localized,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Plain => write!(f, "plain"),
            AttributeKind::Localized => write!(f, "localized"),
        }
    }
}

/// Stored value of an attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Plain(Value),
    Localized(BTreeMap<Locale, Value>),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Plain(_) => AttributeKind::Plain,
            AttributeValue::Localized(_) => AttributeKind::Localized,
        }
    }
}

/// A single named attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    key: String,
    value: AttributeValue,
}

impl Attribute {
    /// Create a plain attribute
    pub fn plain(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: AttributeValue::Plain(value.into()),
        }
    }

    /// Create an empty localized attribute
    pub fn localized(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: AttributeValue::Localized(BTreeMap::new()),
        }
    }

    /// Create a localized attribute from a prepared locale map
    pub fn localized_with(key: impl Into<String>, values: BTreeMap<Locale, Value>) -> Self {
        Self {
            key: key.into(),
            value: AttributeValue::Localized(values),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> AttributeKind {
        self.value.kind()
    }

    pub fn is_localized(&self) -> bool {
        self.kind() == AttributeKind::Localized
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    /// Plain value, or `None` for a localized attribute
    pub fn plain_value(&self) -> Option<&Value> {
        match &self.value {
            AttributeValue::Plain(value) => Some(value),
            AttributeValue::Localized(_) => None,
        }
    }

    /// Value stored for `locale`, or `None` for a plain attribute or a missing locale
    pub fn localized_value(&self, locale: &Locale) -> Option<&Value> {
        match &self.value {
            AttributeValue::Localized(values) => values.get(locale),
            AttributeValue::Plain(_) => None,
        }
    }

    /// Locales that carry a value, in sorted order
    pub fn locales(&self) -> Vec<&Locale> {
        match &self.value {
            AttributeValue::Localized(values) => values.keys().collect(),
            AttributeValue::Plain(_) => Vec::new(),
        }
    }

    /// Replace the value of a plain attribute. Returns `false` if the attribute is localized.
    pub fn set_plain_value(&mut self, value: Value) -> bool {
        match &mut self.value {
            AttributeValue::Plain(current) => {
                *current = value;
                true
            }
            AttributeValue::Localized(_) => false,
        }
    }

    /// Upsert the value for one locale. Returns `false` if the attribute is plain.
    pub fn set_localized_value(&mut self, locale: Locale, value: Value) -> bool {
        match &mut self.value {
            AttributeValue::Localized(values) => {
                values.insert(locale, value);
                true
            }
            AttributeValue::Plain(_) => false,
        }
    }
}

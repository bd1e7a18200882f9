//! Fluent builder for localized attribute fixtures

use std::marker::PhantomData;

use itemkit_model::{Attribute, Locale};
use serde_json::Value;

/// Collects per-locale values before producing a localized [`Attribute`]
#[derive(Debug, Clone)]
pub struct LocalizedAttributeBuilder<V> {
    attribute: Attribute,
    _value: PhantomData<fn(V)>,
}

impl<V: Into<Value>> LocalizedAttributeBuilder<V> {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            attribute: Attribute::localized(key),
            _value: PhantomData,
        }
    }

    /// Add or replace the value for `locale`
    pub fn with_value(mut self, locale: Locale, value: V) -> Self {
        self.attribute.set_localized_value(locale, value.into());
        self
    }

    /// Produce the attribute. The builder stays usable for further variants.
    pub fn build(&self) -> Attribute {
        self.attribute.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_accumulates_locales() {
        let attribute = LocalizedAttributeBuilder::<&str>::new("name")
            .with_value(Locale::english(), "Widget")
            .with_value(Locale::german(), "Ding")
            .with_value(Locale::english(), "Gizmo")
            .build();

        assert_eq!(attribute.key(), "name");
        assert!(attribute.is_localized());
        assert_eq!(attribute.localized_value(&Locale::english()), Some(&json!("Gizmo")));
        assert_eq!(attribute.localized_value(&Locale::german()), Some(&json!("Ding")));
    }

    #[test]
    fn test_built_attributes_do_not_share_state() {
        let builder =
            LocalizedAttributeBuilder::<i64>::new("rank").with_value(Locale::english(), 1);
        let first = builder.build();
        let second = builder.with_value(Locale::german(), 2).build();

        assert_eq!(first.locales().len(), 1);
        assert_eq!(second.locales().len(), 2);
    }
}

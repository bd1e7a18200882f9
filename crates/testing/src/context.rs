//! In-memory item model context
//!
//! Stands in for a persistence context: owns the attributes of one item and
//! its dynamic handlers, and answers reads and writes from memory.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use itemkit_model::{
    Attribute, AttributeKind, ContextAccessor, DynamicAttributeHandler, ItemModelContext, ItemPk,
    ItemRef, ItemType, Locale, ModelError, ModelResult, TypeCode,
};
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::DefaultLocale;

/// Context holding an item's attributes in memory
#[derive(Debug)]
pub struct InMemoryItemModelContext {
    owner: ItemRef,
    type_code: Option<TypeCode>,
    attributes: HashMap<String, Attribute>,
    dynamic_handlers: HashMap<String, Arc<dyn DynamicAttributeHandler>>,
    default_locale: DefaultLocale,
    copied_from: Option<ItemPk>,
    bound: bool,
}

impl InMemoryItemModelContext {
    /// Create an empty context for an item of `item_type`
    pub fn new(item_type: ItemType, default_locale: DefaultLocale) -> Self {
        Self {
            owner: ItemRef::new(item_type),
            type_code: None,
            attributes: HashMap::new(),
            dynamic_handlers: HashMap::new(),
            default_locale,
            copied_from: None,
            bound: false,
        }
    }

    pub fn with_type_code(mut self, type_code: TypeCode) -> Self {
        self.type_code = Some(type_code);
        self
    }

    /// Seed the context with prepared attributes. Later duplicates replace earlier ones.
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        for attribute in attributes {
            self.attributes.insert(attribute.key().to_string(), attribute);
        }
        self
    }

    /// Whether an item has been wired to this context
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale.get()
    }

    /// Independent copy for a new item
    ///
    /// Attributes are deep-copied. The handler map is copied, the handlers in
    /// it are shared. The copy gets its own identity and must be handed to
    /// [`update_item_after_copy`](Self::update_item_after_copy) once its item
    /// is constructed.
    pub fn copy(&self) -> Self {
        Self {
            owner: ItemRef::new(self.owner.item_type.clone()),
            type_code: self.type_code,
            attributes: self.attributes.clone(),
            dynamic_handlers: self.dynamic_handlers.clone(),
            default_locale: self.default_locale.clone(),
            copied_from: Some(self.owner.pk),
            bound: false,
        }
    }

    /// Finish binding after the owning item has been constructed
    pub fn update_item_after_copy(&mut self, item_type: &ItemType) {
        if self.owner.item_type != *item_type {
            debug!(
                "Rebinding context {} to item type {}",
                self.owner, item_type
            );
            self.owner.item_type = item_type.clone();
        }

        if let Some(source) = self.copied_from.take() {
            for handler in self.dynamic_handlers.values() {
                handler.rebind(&source, &self.owner);
            }
        }

        self.bound = true;
    }

    /// Route `key` through `handler` from now on
    ///
    /// With `purge_shadowed` set, a plain value already stored under `key` is
    /// dropped so the raw attribute view never shows a stale value.
    pub fn set_dynamic_handler(
        &mut self,
        key: &str,
        handler: Arc<dyn DynamicAttributeHandler>,
        purge_shadowed: bool,
    ) {
        if purge_shadowed && self.attributes.remove(key).is_some() {
            debug!(
                "Dropped stored attribute '{}' on {} now governed by a dynamic handler",
                key, self.owner
            );
        }
        if let Some(previous) = self.dynamic_handlers.insert(key.to_string(), handler) {
            let still_routed = self
                .dynamic_handlers
                .values()
                .any(|handler| Arc::ptr_eq(handler, &previous));
            if !still_routed {
                previous.release(&self.owner.pk);
            }
        }
    }

    fn resolve_locale(&self, locale: Option<&Locale>) -> Locale {
        locale.cloned().unwrap_or_else(|| self.default_locale.get())
    }
}

impl Drop for InMemoryItemModelContext {
    fn drop(&mut self) {
        for handler in self.dynamic_handlers.values() {
            handler.release(&self.owner.pk);
        }
    }
}

impl ItemModelContext for InMemoryItemModelContext {
    fn owner(&self) -> &ItemRef {
        &self.owner
    }

    fn type_code(&self) -> Option<TypeCode> {
        self.type_code
    }

    fn get_value(&self, key: &str) -> ModelResult<Value> {
        if let Some(handler) = self.dynamic_handlers.get(key) {
            return handler.get(&self.owner);
        }

        match self.attributes.get(key) {
            None => Ok(Value::Null),
            Some(attribute) => attribute.plain_value().cloned().ok_or_else(|| {
                ModelError::invalid_attribute_kind(key, AttributeKind::Plain, attribute.kind())
            }),
        }
    }

    fn set_value(&mut self, key: &str, value: Value) -> ModelResult<()> {
        if let Some(handler) = self.dynamic_handlers.get(key) {
            return handler.set(&self.owner, value);
        }

        trace!("Setting '{}' on {}", key, self.owner);
        match self.attributes.get_mut(key) {
            Some(attribute) => {
                if attribute.set_plain_value(value) {
                    Ok(())
                } else {
                    Err(ModelError::invalid_attribute_kind(
                        key,
                        AttributeKind::Plain,
                        attribute.kind(),
                    ))
                }
            }
            None => {
                self.attributes
                    .insert(key.to_string(), Attribute::plain(key, value));
                Ok(())
            }
        }
    }

    fn get_localized_value(&self, key: &str, locale: Option<&Locale>) -> ModelResult<Value> {
        let locale = self.resolve_locale(locale);

        if let Some(handler) = self.dynamic_handlers.get(key) {
            return handler.get_localized(&self.owner, &locale);
        }

        match self.attributes.get(key) {
            None => Ok(Value::Null),
            Some(attribute) if attribute.is_localized() => Ok(attribute
                .localized_value(&locale)
                .cloned()
                .unwrap_or(Value::Null)),
            Some(attribute) => Err(ModelError::invalid_attribute_kind(
                key,
                AttributeKind::Localized,
                attribute.kind(),
            )),
        }
    }

    fn set_localized_value(
        &mut self,
        key: &str,
        value: Value,
        locale: Option<&Locale>,
    ) -> ModelResult<()> {
        let locale = self.resolve_locale(locale);

        if let Some(handler) = self.dynamic_handlers.get(key) {
            return handler.set_localized(&self.owner, value, &locale);
        }

        trace!("Setting '{}' [{}] on {}", key, locale, self.owner);
        let attribute = self
            .attributes
            .entry(key.to_string())
            .or_insert_with(|| Attribute::localized(key));
        if attribute.set_localized_value(locale, value) {
            Ok(())
        } else {
            Err(ModelError::invalid_attribute_kind(
                key,
                AttributeKind::Localized,
                attribute.kind(),
            ))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_accessor(&self) -> Option<&dyn ContextAccessor> {
        Some(self)
    }

    fn as_accessor_mut(&mut self) -> Option<&mut dyn ContextAccessor> {
        Some(self)
    }
}

impl ContextAccessor for InMemoryItemModelContext {
    fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    fn put_attribute(&mut self, attribute: Attribute) {
        self.attributes.insert(attribute.key().to_string(), attribute);
    }

    fn remove_attribute(&mut self, key: &str) -> Option<Attribute> {
        self.attributes.remove(key)
    }

    fn attribute_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.attributes.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn has_dynamic_handler(&self, key: &str) -> bool {
        self.dynamic_handlers.contains_key(key)
    }

    fn dynamic_handler_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.dynamic_handlers.keys().cloned().collect();
        keys.sort();
        keys
    }
}

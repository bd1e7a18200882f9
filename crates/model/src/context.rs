//! Item Model Context - The storage seam behind every domain item
//!
//! Items call into their context for every attribute access. Contexts that
//! can expose their raw attribute store do so through the [`ContextAccessor`]
//! capability; contexts backed by real storage simply return `None`.

use std::any::Any;
use std::fmt::Debug;

use serde_json::Value;

use crate::attribute::Attribute;
use crate::error::ModelResult;
use crate::item::{ItemRef, ItemType, TypeCode};
use crate::locale::Locale;

/// Attribute storage and dynamic-attribute dispatch for one item instance
pub trait ItemModelContext: Send + Sync + Debug + Any {
    /// The item this context is bound to
    fn owner(&self) -> &ItemRef;

    /// Type descriptor of the owning item
    fn item_type(&self) -> &ItemType {
        &self.owner().item_type
    }

    /// Optional type discriminator
    fn type_code(&self) -> Option<TypeCode>;

    /// Read a plain attribute. Absent attributes read as `Value::Null`.
    fn get_value(&self, key: &str) -> ModelResult<Value>;

    /// Write a plain attribute
    fn set_value(&mut self, key: &str, value: Value) -> ModelResult<()>;

    /// Read a localized attribute; `None` resolves to the default locale
    fn get_localized_value(&self, key: &str, locale: Option<&Locale>) -> ModelResult<Value>;

    /// Write a localized attribute; `None` resolves to the default locale
    fn set_localized_value(
        &mut self,
        key: &str,
        value: Value,
        locale: Option<&Locale>,
    ) -> ModelResult<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Raw attribute access, if this context supports it
    fn as_accessor(&self) -> Option<&dyn ContextAccessor> {
        None
    }

    /// Mutable raw attribute access, if this context supports it
    fn as_accessor_mut(&mut self) -> Option<&mut dyn ContextAccessor> {
        None
    }
}

/// Raw view of a context's attribute store, bypassing dynamic handlers
pub trait ContextAccessor {
    /// Stored attribute for `key`, ignoring any dynamic handler
    fn attribute(&self, key: &str) -> Option<&Attribute>;

    /// Insert or replace a stored attribute
    fn put_attribute(&mut self, attribute: Attribute);

    /// Remove a stored attribute, returning it if present
    fn remove_attribute(&mut self, key: &str) -> Option<Attribute>;

    /// Keys of all stored attributes, sorted
    fn attribute_keys(&self) -> Vec<String>;

    fn has_dynamic_handler(&self, key: &str) -> bool;

    /// Keys governed by dynamic handlers, sorted
    fn dynamic_handler_keys(&self) -> Vec<String>;
}

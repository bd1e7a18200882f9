//! Dynamic attribute handlers
//!
//! A handler computes or intercepts one attribute of an item. Contexts
//! consult their handler map before their stored attributes, so a registered
//! handler always wins. Handlers are shared between a context and its copies;
//! any per-instance state must be keyed by the [`ItemRef`] they receive.

use std::fmt::Debug;

use serde_json::Value;

use crate::error::ModelResult;
use crate::item::{ItemPk, ItemRef};
use crate::locale::Locale;

/// Strategy computing the value of one attribute
pub trait DynamicAttributeHandler: Send + Sync + Debug {
    /// Compute the attribute value for `item`
    fn get(&self, item: &ItemRef) -> ModelResult<Value>;

    /// Accept a written value for `item`
    fn set(&self, item: &ItemRef, value: Value) -> ModelResult<()>;

    /// Localized read. Handlers without per-locale state ignore the locale.
    fn get_localized(&self, item: &ItemRef, _locale: &Locale) -> ModelResult<Value> {
        self.get(item)
    }

    /// Localized write. Handlers without per-locale state ignore the locale.
    fn set_localized(&self, item: &ItemRef, value: Value, _locale: &Locale) -> ModelResult<()> {
        self.set(item, value)
    }

    /// Carry per-instance state over from a copied item to its copy
    fn rebind(&self, _from: &ItemPk, _to: &ItemRef) {}

    /// Forget per-instance state once `item` is gone
    fn release(&self, _item: &ItemPk) {}
}

//! Typed attribute helpers available on every item
//!
//! Domain types use these to implement their getters and setters on top of
//! the untyped context API. A `Null` value reads back as `None`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ModelResult;
use crate::item::ItemModel;
use crate::locale::Locale;

/// Typed access to an item's attributes
pub trait ItemModelExt: ItemModel {
    /// Read a plain attribute as `V`
    fn get_attribute<V: DeserializeOwned>(&self, key: &str) -> ModelResult<Option<V>> {
        let value = self.item_context().get_value(key)?;
        from_value(value)
    }

    /// Write a plain attribute from any serializable value
    fn set_attribute<V: Serialize>(&mut self, key: &str, value: V) -> ModelResult<()> {
        let value = serde_json::to_value(value)?;
        self.item_context_mut().set_value(key, value)
    }

    /// Read a localized attribute as `V`; `None` uses the default locale
    fn get_localized_attribute<V: DeserializeOwned>(
        &self,
        key: &str,
        locale: Option<&Locale>,
    ) -> ModelResult<Option<V>> {
        let value = self.item_context().get_localized_value(key, locale)?;
        from_value(value)
    }

    /// Write a localized attribute; `None` uses the default locale
    fn set_localized_attribute<V: Serialize>(
        &mut self,
        key: &str,
        value: V,
        locale: Option<&Locale>,
    ) -> ModelResult<()> {
        let value = serde_json::to_value(value)?;
        self.item_context_mut().set_localized_value(key, value, locale)
    }
}

impl<T: ItemModel + ?Sized> ItemModelExt for T {}

fn from_value<V: DeserializeOwned>(value: Value) -> ModelResult<Option<V>> {
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

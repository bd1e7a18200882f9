//! Domain types shared by the integration tests

#![allow(dead_code)]

use std::any::Any;

use itemkit_model::{
    ItemModel, ItemModelContext, ItemModelExt, ItemRef, ItemType, Locale, ModelError, ModelResult,
    TypeCode,
};
use serde_json::Value;

pub const NAME: &str = "name";
pub const PRICE: &str = "price";
pub const DESCRIPTION: &str = "description";

/// Product item with typed accessors over its context
#[derive(Debug)]
pub struct Product {
    context: Box<dyn ItemModelContext>,
}

impl Product {
    pub fn name(&self) -> ModelResult<Option<String>> {
        self.get_attribute(NAME)
    }

    pub fn set_name(&mut self, name: &str) -> ModelResult<()> {
        self.set_attribute(NAME, name)
    }

    pub fn price(&self) -> ModelResult<Option<f64>> {
        self.get_attribute(PRICE)
    }

    pub fn set_price(&mut self, price: f64) -> ModelResult<()> {
        self.set_attribute(PRICE, price)
    }

    pub fn description(&self, locale: Option<&Locale>) -> ModelResult<Option<String>> {
        self.get_localized_attribute(DESCRIPTION, locale)
    }

    pub fn set_description(
        &mut self,
        description: &str,
        locale: Option<&Locale>,
    ) -> ModelResult<()> {
        self.set_localized_attribute(DESCRIPTION, description, locale)
    }

    /// Wrap a context that was not fabricated in memory
    pub fn persisted() -> Self {
        Self {
            context: Box::new(PersistedContext::new(Self::item_type())),
        }
    }
}

impl ItemModel for Product {
    fn item_type() -> ItemType {
        ItemType::from_static("Product")
    }

    fn from_context(context: Box<dyn ItemModelContext>) -> ModelResult<Self> {
        Ok(Self { context })
    }

    fn item_context(&self) -> &dyn ItemModelContext {
        self.context.as_ref()
    }

    fn item_context_mut(&mut self) -> &mut dyn ItemModelContext {
        self.context.as_mut()
    }
}

/// Stand-in for a storage-backed context; exposes no accessor capability
#[derive(Debug)]
pub struct PersistedContext {
    owner: ItemRef,
}

impl PersistedContext {
    pub fn new(item_type: ItemType) -> Self {
        Self {
            owner: ItemRef::new(item_type),
        }
    }

    fn detached() -> ModelError {
        ModelError::unsupported("persisted context is detached in tests")
    }
}

impl ItemModelContext for PersistedContext {
    fn owner(&self) -> &ItemRef {
        &self.owner
    }

    fn type_code(&self) -> Option<TypeCode> {
        None
    }

    fn get_value(&self, _key: &str) -> ModelResult<Value> {
        Err(Self::detached())
    }

    fn set_value(&mut self, _key: &str, _value: Value) -> ModelResult<()> {
        Err(Self::detached())
    }

    fn get_localized_value(&self, _key: &str, _locale: Option<&Locale>) -> ModelResult<Value> {
        Err(Self::detached())
    }

    fn set_localized_value(
        &mut self,
        _key: &str,
        _value: Value,
        _locale: Option<&Locale>,
    ) -> ModelResult<()> {
        Err(Self::detached())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

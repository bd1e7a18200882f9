//! In-Memory Model Factory
//!
//! The entry point test code uses to fabricate items. Every item is built
//! around an [`InMemoryItemModelContext`], so it reads and writes like a
//! persisted item without any backing store.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use itemkit_model::{
    Attribute, ContextAccessor, DynamicAttributeHandler, ItemModel, ItemModelContext, ItemType,
    Locale, ModelError, ModelResult, TypeCode,
};
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::{debug, warn};

use crate::builder::LocalizedAttributeBuilder;
use crate::config::{recover, DefaultLocale, FactoryConfig};
use crate::context::InMemoryItemModelContext;
use crate::handler::InMemoryDynamicAttributeHandler;

type Constructor = fn(InMemoryItemModelContext) -> ModelResult<Box<dyn ItemModel>>;

/// Factory fabricating context-backed items in memory
pub struct InMemoryModelFactory {
    config: FactoryConfig,
    default_locale: DefaultLocale,
    constructors: RwLock<HashMap<ItemType, Constructor>>,
}

impl InMemoryModelFactory {
    pub fn new() -> Self {
        Self::with_config(FactoryConfig::default())
    }

    pub fn with_config(config: FactoryConfig) -> Self {
        let default_locale = DefaultLocale::new(config.default_locale.clone());
        Self {
            config,
            default_locale,
            constructors: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Create an item with an empty context
    pub fn create_instance<T: ItemModel>(&self) -> ModelResult<T> {
        create_with_context(self.context_for::<T>())
    }

    /// Create an item whose context carries `type_code`
    pub fn create_instance_with_type_code<T: ItemModel>(
        &self,
        type_code: TypeCode,
    ) -> ModelResult<T> {
        create_with_context(self.context_for::<T>().with_type_code(type_code))
    }

    /// Create an item whose context is seeded with `attributes`
    pub fn create_instance_with_attributes<T: ItemModel>(
        &self,
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> ModelResult<T> {
        create_with_context(self.context_for::<T>().with_attributes(attributes))
    }

    /// Create an item and attach a dynamic handler for each key
    pub fn create_instance_with_handlers<T, K>(
        &self,
        handlers: impl IntoIterator<Item = (K, Arc<dyn DynamicAttributeHandler>)>,
    ) -> ModelResult<T>
    where
        T: ItemModel,
        K: AsRef<str>,
    {
        let mut item = self.create_instance::<T>()?;
        for (key, handler) in handlers {
            self.add_handler_for_dynamic_attribute(&mut item, key.as_ref(), handler)?;
        }
        Ok(item)
    }

    /// Handler whose reads return `value` until an item writes another one
    pub fn handler_with_initial_value(
        value: impl Into<Value>,
    ) -> Arc<InMemoryDynamicAttributeHandler> {
        Arc::new(InMemoryDynamicAttributeHandler::with_initial_value(value))
    }

    /// Route reads and writes of `key` on `item` through `handler`
    ///
    /// Only items fabricated in memory accept handlers.
    pub fn add_handler_for_dynamic_attribute<T: ItemModel + ?Sized>(
        &self,
        item: &mut T,
        key: &str,
        handler: Arc<dyn DynamicAttributeHandler>,
    ) -> ModelResult<()> {
        let context = item
            .item_context_mut()
            .as_any_mut()
            .downcast_mut::<InMemoryItemModelContext>()
            .ok_or_else(|| {
                ModelError::invalid_context(format!(
                    "dynamic handler for '{}' requires an in-memory item context",
                    key
                ))
            })?;

        debug!("Attaching dynamic handler '{}' to {}", key, context.owner());
        context.set_dynamic_handler(key, handler, self.config.purge_shadowed_attributes);
        Ok(())
    }

    /// Create an independent copy of an item fabricated in memory
    pub fn copy_instance<T: ItemModel>(&self, original: &T) -> ModelResult<T> {
        let context = in_memory_context(original)?;
        debug!("Copying {}", context.owner());
        create_with_context(context.copy())
    }

    /// Copy a type-erased item, rebuilding it through the constructor
    /// registered for its item type
    pub fn copy_boxed(&self, original: &dyn ItemModel) -> ModelResult<Box<dyn ItemModel>> {
        let context = in_memory_context(original)?;
        let constructor = self.constructor_for(context.item_type())?;
        debug!("Copying {} through the registry", context.owner());
        constructor(context.copy())
    }

    /// Raw attribute access for an item fabricated in memory
    pub fn get_context_accessor<T: ItemModel + ?Sized>(
        item: &mut T,
    ) -> ModelResult<&mut dyn ContextAccessor> {
        item.item_context_mut().as_accessor_mut().ok_or_else(|| {
            ModelError::unsupported(
                "context accessor only works with items created by the in-memory factory",
            )
        })
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale.get()
    }

    /// Handle shared with every context this factory creates
    pub fn default_locale_handle(&self) -> &DefaultLocale {
        &self.default_locale
    }

    pub fn set_default_locale(&self, locale: Locale) {
        debug!("Default locale set to {}", locale);
        self.default_locale.set(locale);
    }

    /// Set the default locale from an ISO code such as `de` or `en_US`
    pub fn set_default_locale_code(&self, iso_code: &str) -> ModelResult<()> {
        let locale = Locale::parse(iso_code)?;
        self.set_default_locale(locale);
        Ok(())
    }

    /// Restore the configured default locale
    pub fn reset_default_locale(&self) {
        self.default_locale.reset();
    }

    /// Plain attribute descriptor for fixture setup
    pub fn attribute_for(key: impl Into<String>, value: impl Into<Value>) -> Attribute {
        Attribute::plain(key, value)
    }

    /// Builder for a localized attribute descriptor
    pub fn localized_attribute_for<V: Into<Value>>(
        key: impl Into<String>,
    ) -> LocalizedAttributeBuilder<V> {
        LocalizedAttributeBuilder::new(key)
    }

    /// Register `T` so it can be created from its [`ItemType`] alone
    pub fn register<T: ItemModel>(&self) {
        let item_type = T::item_type();
        debug!("Registering item type {}", item_type);
        recover(self.constructors.write()).insert(item_type, construct_boxed::<T>);
    }

    pub fn is_registered(&self, item_type: &ItemType) -> bool {
        recover(self.constructors.read()).contains_key(item_type)
    }

    /// Create an item of a registered type
    pub fn create_by_type(&self, item_type: &ItemType) -> ModelResult<Box<dyn ItemModel>> {
        let constructor = self.constructor_for(item_type)?;
        constructor(InMemoryItemModelContext::new(
            item_type.clone(),
            self.default_locale.clone(),
        ))
    }

    /// Get the number of registered item types
    pub fn registered_count(&self) -> usize {
        recover(self.constructors.read()).len()
    }

    fn constructor_for(&self, item_type: &ItemType) -> ModelResult<Constructor> {
        recover(self.constructors.read())
            .get(item_type)
            .copied()
            .ok_or_else(|| {
                ModelError::instantiation(
                    item_type.code(),
                    "no constructor registered for this item type",
                )
            })
    }

    fn context_for<T: ItemModel>(&self) -> InMemoryItemModelContext {
        InMemoryItemModelContext::new(T::item_type(), self.default_locale.clone())
    }
}

impl fmt::Debug for InMemoryModelFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut registered: Vec<ItemType> =
            recover(self.constructors.read()).keys().cloned().collect();
        registered.sort();
        f.debug_struct("InMemoryModelFactory")
            .field("config", &self.config)
            .field("default_locale", &self.default_locale.get())
            .field("registered", &registered)
            .finish()
    }
}

impl Default for InMemoryModelFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn construct_boxed<T: ItemModel>(
    context: InMemoryItemModelContext,
) -> ModelResult<Box<dyn ItemModel>> {
    let item: Box<dyn ItemModel> = Box::new(create_with_context::<T>(context)?);
    Ok(item)
}

fn in_memory_context<T: ItemModel + ?Sized>(item: &T) -> ModelResult<&InMemoryItemModelContext> {
    item.item_context()
        .as_any()
        .downcast_ref::<InMemoryItemModelContext>()
        .ok_or_else(|| {
            ModelError::invalid_argument(format!(
                "cannot copy {}: item was not created by the in-memory factory",
                item.item_context().item_type()
            ))
        })
}

fn create_with_context<T: ItemModel>(context: InMemoryItemModelContext) -> ModelResult<T> {
    let item_type = T::item_type();
    let mut item = T::from_context(Box::new(context))
        .map_err(|e| ModelError::instantiation(item_type.code(), e))?;

    let context = item
        .item_context_mut()
        .as_any_mut()
        .downcast_mut::<InMemoryItemModelContext>()
        .ok_or_else(|| {
            ModelError::instantiation(
                item_type.code(),
                "constructed item does not expose the context it was built with",
            )
        })?;
    context.update_item_after_copy(&item_type);

    debug!("Created in-memory item {}", context.owner());
    Ok(item)
}

/// Process-wide factory configured from the environment
static SHARED_FACTORY: Lazy<InMemoryModelFactory> = Lazy::new(|| {
    let config = FactoryConfig::from_env().unwrap_or_else(|e| {
        warn!("Ignoring item factory environment configuration: {}", e);
        FactoryConfig::default()
    });
    InMemoryModelFactory::with_config(config)
});

/// Get the process-wide factory
///
/// Its default locale is global state: tests that change it must run
/// serially and reset it afterwards.
pub fn shared_factory() -> &'static InMemoryModelFactory {
    &SHARED_FACTORY
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    use itemkit_model::{ItemModelExt, ItemRef};
    use serde_json::json;

    #[derive(Debug)]
    struct Catalog {
        context: Box<dyn ItemModelContext>,
    }

    impl ItemModel for Catalog {
        fn item_type() -> ItemType {
            ItemType::from_static("Catalog")
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

    /// Rejects every context it is handed
    #[derive(Debug)]
    struct Unbuildable {
        context: Box<dyn ItemModelContext>,
    }

    impl ItemModel for Unbuildable {
        fn item_type() -> ItemType {
            ItemType::from_static("Unbuildable")
        }

        fn from_context(_context: Box<dyn ItemModelContext>) -> ModelResult<Self> {
            Err(ModelError::invalid_argument("catalog version missing"))
        }

        fn item_context(&self) -> &dyn ItemModelContext {
            self.context.as_ref()
        }

        fn item_context_mut(&mut self) -> &mut dyn ItemModelContext {
            self.context.as_mut()
        }
    }

    /// Builds successfully but keeps a context of its own
    #[derive(Debug)]
    struct Detached {
        context: Box<dyn ItemModelContext>,
    }

    impl ItemModel for Detached {
        fn item_type() -> ItemType {
            ItemType::from_static("Detached")
        }

        fn from_context(_context: Box<dyn ItemModelContext>) -> ModelResult<Self> {
            Ok(Self {
                context: Box::new(ReadOnlyContext {
                    owner: ItemRef::new(Self::item_type()),
                }),
            })
        }

        fn item_context(&self) -> &dyn ItemModelContext {
            self.context.as_ref()
        }

        fn item_context_mut(&mut self) -> &mut dyn ItemModelContext {
            self.context.as_mut()
        }
    }

    #[derive(Debug)]
    struct ReadOnlyContext {
        owner: ItemRef,
    }

    impl ItemModelContext for ReadOnlyContext {
        fn owner(&self) -> &ItemRef {
            &self.owner
        }

        fn type_code(&self) -> Option<TypeCode> {
            None
        }

        fn get_value(&self, _key: &str) -> ModelResult<Value> {
            Ok(Value::Null)
        }

        fn set_value(&mut self, _key: &str, _value: Value) -> ModelResult<()> {
            Err(ModelError::unsupported("read only"))
        }

        fn get_localized_value(&self, _key: &str, _locale: Option<&Locale>) -> ModelResult<Value> {
            Ok(Value::Null)
        }

        fn set_localized_value(
            &mut self,
            _key: &str,
            _value: Value,
            _locale: Option<&Locale>,
        ) -> ModelResult<()> {
            Err(ModelError::unsupported("read only"))
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_create_instance_binds_empty_context() {
        let factory = InMemoryModelFactory::new();
        let catalog: Catalog = factory.create_instance().unwrap();

        let context = catalog
            .item_context()
            .as_any()
            .downcast_ref::<InMemoryItemModelContext>()
            .unwrap();
        assert!(context.is_bound());
        assert_eq!(context.item_type(), &ItemType::from_static("Catalog"));
        assert_eq!(context.type_code(), None);
        assert!(context.attribute_keys().is_empty());
    }

    #[test]
    fn test_create_instance_with_type_code() {
        let factory = InMemoryModelFactory::new();
        let catalog: Catalog = factory.create_instance_with_type_code(604).unwrap();

        assert_eq!(catalog.item_context().type_code(), Some(604));
    }

    #[test]
    fn test_construction_failure_is_wrapped() {
        let factory = InMemoryModelFactory::new();
        let err = factory.create_instance::<Unbuildable>().unwrap_err();

        match err {
            ModelError::Instantiation { item_type, source } => {
                assert_eq!(item_type, "Unbuildable");
                assert!(source.to_string().contains("catalog version missing"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_item_replacing_its_context_is_rejected() {
        let factory = InMemoryModelFactory::new();
        let err = factory.create_instance::<Detached>().unwrap_err();

        match err {
            ModelError::Instantiation { item_type, source } => {
                assert_eq!(item_type, "Detached");
                assert!(source.to_string().contains("does not expose the context"));
            }
            other => panic!("unexpected error: {}", other),
        }

        factory.register::<Detached>();
        let result = factory.create_by_type(&ItemType::from_static("Detached"));
        assert!(matches!(result, Err(ModelError::Instantiation { .. })));
    }

    #[test]
    fn test_registry_creates_by_item_type() {
        let factory = InMemoryModelFactory::new();
        assert_eq!(factory.registered_count(), 0);

        factory.register::<Catalog>();
        assert!(factory.is_registered(&ItemType::from_static("Catalog")));

        let mut item = factory
            .create_by_type(&ItemType::from_static("Catalog"))
            .unwrap();
        assert_eq!(item.item_context().item_type().code(), "Catalog");

        item.set_attribute("id", "Default").unwrap();
        assert_eq!(
            item.get_attribute::<String>("id").unwrap().as_deref(),
            Some("Default")
        );
    }

    #[test]
    fn test_copy_boxed_needs_a_registered_type() {
        let factory = InMemoryModelFactory::new();
        let mut catalog: Catalog = factory.create_instance().unwrap();
        catalog.set_attribute("id", "Spring").unwrap();

        let result = factory.copy_boxed(&catalog);
        assert!(matches!(
            result,
            Err(ModelError::Instantiation { ref item_type, .. }) if item_type == "Catalog"
        ));

        factory.register::<Catalog>();
        let copy = factory.copy_boxed(&catalog).unwrap();
        assert_eq!(
            copy.get_attribute::<String>("id").unwrap().as_deref(),
            Some("Spring")
        );
        assert_ne!(copy.item_context().owner().pk, catalog.item_context().owner().pk);
    }

    #[test]
    fn test_registry_rejects_unknown_item_type() {
        let factory = InMemoryModelFactory::new();
        let result = factory.create_by_type(&ItemType::new("Warehouse"));

        assert!(matches!(
            result,
            Err(ModelError::Instantiation { ref item_type, .. }) if item_type == "Warehouse"
        ));
    }

    #[test]
    fn test_default_locale_management() {
        let factory = InMemoryModelFactory::new();
        assert_eq!(factory.default_locale(), Locale::english());

        factory.set_default_locale_code("de_CH").unwrap();
        assert_eq!(factory.default_locale(), Locale::with_country("de", "CH").unwrap());

        let err = factory.set_default_locale_code("not a locale").unwrap_err();
        assert!(matches!(err, ModelError::InvalidLocale { .. }));
        assert_eq!(factory.default_locale(), Locale::with_country("de", "CH").unwrap());

        factory.set_default_locale(Locale::french());
        assert_eq!(factory.default_locale(), Locale::french());

        factory.reset_default_locale();
        assert_eq!(factory.default_locale(), Locale::english());
    }

    #[test]
    fn test_default_locale_is_per_factory() {
        let german = InMemoryModelFactory::with_config(FactoryConfig::with_default_locale(
            Locale::german(),
        ));
        let english = InMemoryModelFactory::new();

        german.set_default_locale(Locale::french());
        assert_eq!(english.default_locale(), Locale::english());

        german.reset_default_locale();
        assert_eq!(german.default_locale(), Locale::german());
    }

    #[test]
    fn test_handlers_without_purge_keep_shadowed_value() {
        let factory = InMemoryModelFactory::with_config(FactoryConfig {
            purge_shadowed_attributes: false,
            ..FactoryConfig::default()
        });
        let mut catalog: Catalog = factory
            .create_instance_with_attributes([InMemoryModelFactory::attribute_for("version", 1)])
            .unwrap();

        factory
            .add_handler_for_dynamic_attribute(
                &mut catalog,
                "version",
                InMemoryModelFactory::handler_with_initial_value(2),
            )
            .unwrap();

        assert_eq!(catalog.item_context().get_value("version").unwrap(), json!(2));
        let accessor = InMemoryModelFactory::get_context_accessor(&mut catalog).unwrap();
        assert_eq!(
            accessor.attribute("version").and_then(Attribute::plain_value),
            Some(&json!(1))
        );
    }
}

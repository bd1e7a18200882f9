//! # itemkit-testing - In-Memory Item Fixtures
//!
//! Fabricates domain items that behave like persisted ones without any
//! backing store. Each item is wired to an [`InMemoryItemModelContext`] that
//! keeps its attributes in memory, dispatches dynamic attributes to
//! pluggable handlers, and resolves localized values against a default
//! locale owned by the factory.
//!
//! ## Quick Start
//!
//! ```rust
//! use itemkit_model::{ItemModel, ItemModelContext, ItemModelExt, ItemType, ModelResult};
//! use itemkit_testing::prelude::*;
//!
//! #[derive(Debug)]
//! struct Product {
//!     context: Box<dyn ItemModelContext>,
//! }
//!
//! impl ItemModel for Product {
//!     fn item_type() -> ItemType {
//!         ItemType::from_static("Product")
//!     }
//!
//!     fn from_context(context: Box<dyn ItemModelContext>) -> ModelResult<Self> {
//!         Ok(Self { context })
//!     }
//!
//!     fn item_context(&self) -> &dyn ItemModelContext {
//!         self.context.as_ref()
//!     }
//!
//!     fn item_context_mut(&mut self) -> &mut dyn ItemModelContext {
//!         self.context.as_mut()
//!     }
//! }
//!
//! let factory = InMemoryModelFactory::new();
//! let mut widget: Product = factory.create_instance().unwrap();
//! widget.set_attribute("name", "Widget").unwrap();
//!
//! let mut gadget = factory.copy_instance(&widget).unwrap();
//! gadget.set_attribute("name", "Gadget").unwrap();
//!
//! assert_eq!(widget.get_attribute::<String>("name").unwrap().as_deref(), Some("Widget"));
//! assert_eq!(gadget.get_attribute::<String>("name").unwrap().as_deref(), Some("Gadget"));
//! ```

pub mod builder;
pub mod config;
pub mod context;
pub mod factory;
pub mod handler;
pub mod logging;

// Re-export commonly used types
pub use builder::LocalizedAttributeBuilder;
pub use config::{DefaultLocale, FactoryConfig};
pub use context::InMemoryItemModelContext;
pub use factory::{shared_factory, InMemoryModelFactory};
pub use handler::InMemoryDynamicAttributeHandler;
pub use logging::init_test_logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        builder::LocalizedAttributeBuilder,
        config::{DefaultLocale, FactoryConfig},
        context::InMemoryItemModelContext,
        factory::{shared_factory, InMemoryModelFactory},
        handler::InMemoryDynamicAttributeHandler,
        logging::init_test_logging,
    };

    pub use itemkit_model::{
        Attribute, ContextAccessor, DynamicAttributeHandler, ItemModelExt, Locale, ModelError,
        ModelResult,
    };
    pub use serde_json::{json, Value as JsonValue};
}

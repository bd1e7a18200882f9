//! # itemkit-model: Item Model Seam
//!
//! Defines the contract between domain item types and the context that backs
//! their attributes: the [`ItemModel`] and [`ItemModelContext`] traits,
//! plain and localized [`Attribute`]s, [`Locale`] parsing, and pluggable
//! [`DynamicAttributeHandler`]s for computed attributes.
//!
//! Storage-backed contexts and the in-memory test double both implement
//! [`ItemModelContext`]; domain code cannot tell them apart.

pub mod attribute;
pub mod context;
pub mod error;
pub mod extensions;
pub mod handler;
pub mod item;
pub mod locale;

// Re-export core traits and types
pub use attribute::{Attribute, AttributeKind, AttributeValue};
pub use context::{ContextAccessor, ItemModelContext};
pub use error::{ModelError, ModelResult};
pub use extensions::ItemModelExt;
pub use handler::DynamicAttributeHandler;
pub use item::{ItemModel, ItemPk, ItemRef, ItemType, TypeCode};
pub use locale::Locale;

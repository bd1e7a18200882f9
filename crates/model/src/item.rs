//! Core Item Trait - Base definition for context-backed domain items
//!
//! A domain item never stores its own fields. It owns exactly one
//! [`ItemModelContext`] and routes every read and write through it, which is
//! what lets the same type be backed by a real persistence layer or by an
//! in-memory test double.

use std::borrow::Cow;
use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::ItemModelContext;
use crate::error::ModelResult;

/// Integer discriminator some domain code branches on
pub type TypeCode = i32;

/// Opaque descriptor naming a domain item type
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemType(Cow<'static, str>);

impl ItemType {
    pub const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    pub fn new(code: impl Into<String>) -> Self {
        Self(Cow::Owned(code.into()))
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one item instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemPk(Uuid);

impl ItemPk {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ItemPk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Back-reference from a context to the item that owns it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub pk: ItemPk,
    pub item_type: ItemType,
}

impl ItemRef {
    pub fn new(item_type: ItemType) -> Self {
        Self {
            pk: ItemPk::generate(),
            item_type,
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.item_type, self.pk)
    }
}

/// Core trait for domain items backed by an item model context
pub trait ItemModel: Send + Sync + Debug + 'static {
    /// Type descriptor for this item type
    fn item_type() -> ItemType
    where
        Self: Sized;

    /// Construct an item around the given context
    ///
    /// This is the single constructor every item type exposes. An error here
    /// is reported by factories as an instantiation failure.
    fn from_context(context: Box<dyn ItemModelContext>) -> ModelResult<Self>
    where
        Self: Sized;

    /// The context this item reads and writes through
    fn item_context(&self) -> &dyn ItemModelContext;

    /// Mutable access to the context this item reads and writes through
    fn item_context_mut(&mut self) -> &mut dyn ItemModelContext;
}

//! In-memory dynamic attribute handler
//!
//! Stores written values per item instance, so a single handler can be shared
//! by an item and its copies without the copies seeing each other's writes.
//! Until an instance writes a value, reads return the handler's initial value.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use itemkit_model::{DynamicAttributeHandler, ItemPk, ItemRef, Locale, ModelResult};
use serde_json::Value;
use tracing::trace;

use crate::config::recover;

/// Handler returning an initial value until it is overwritten
#[derive(Debug)]
pub struct InMemoryDynamicAttributeHandler {
    initial_value: Value,
    values: RwLock<HashMap<ItemPk, Value>>,
    localized_values: RwLock<HashMap<(ItemPk, Locale), Value>>,
}

impl InMemoryDynamicAttributeHandler {
    pub fn new() -> Self {
        Self::with_initial_value(Value::Null)
    }

    pub fn with_initial_value(value: impl Into<Value>) -> Self {
        Self {
            initial_value: value.into(),
            values: RwLock::new(HashMap::new()),
            localized_values: RwLock::new(HashMap::new()),
        }
    }

    pub fn initial_value(&self) -> &Value {
        &self.initial_value
    }

    /// Number of item instances this handler holds written values for
    pub fn tracked_items(&self) -> usize {
        let mut pks: HashSet<ItemPk> = recover(self.values.read()).keys().copied().collect();
        pks.extend(recover(self.localized_values.read()).keys().map(|(pk, _)| *pk));
        pks.len()
    }
}

impl Default for InMemoryDynamicAttributeHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicAttributeHandler for InMemoryDynamicAttributeHandler {
    fn get(&self, item: &ItemRef) -> ModelResult<Value> {
        let value = recover(self.values.read())
            .get(&item.pk)
            .cloned()
            .unwrap_or_else(|| self.initial_value.clone());
        Ok(value)
    }

    fn set(&self, item: &ItemRef, value: Value) -> ModelResult<()> {
        trace!("Dynamic handler storing value for {}", item);
        recover(self.values.write()).insert(item.pk, value);
        Ok(())
    }

    fn get_localized(&self, item: &ItemRef, locale: &Locale) -> ModelResult<Value> {
        let localized = recover(self.localized_values.read())
            .get(&(item.pk, locale.clone()))
            .cloned();
        match localized {
            Some(value) => Ok(value),
            None => self.get(item),
        }
    }

    fn set_localized(&self, item: &ItemRef, value: Value, locale: &Locale) -> ModelResult<()> {
        trace!("Dynamic handler storing {} value for {}", locale, item);
        recover(self.localized_values.write()).insert((item.pk, locale.clone()), value);
        Ok(())
    }

    fn rebind(&self, from: &ItemPk, to: &ItemRef) {
        {
            let mut values = recover(self.values.write());
            if let Some(value) = values.get(from).cloned() {
                values.insert(to.pk, value);
            }
        }

        let mut localized = recover(self.localized_values.write());
        let carried: Vec<(Locale, Value)> = localized
            .iter()
            .filter(|((pk, _), _)| pk == from)
            .map(|((_, locale), value)| (locale.clone(), value.clone()))
            .collect();
        for (locale, value) in carried {
            localized.insert((to.pk, locale), value);
        }
    }

    fn release(&self, item: &ItemPk) {
        recover(self.values.write()).remove(item);
        recover(self.localized_values.write()).retain(|(pk, _), _| pk != item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemkit_model::ItemType;
    use serde_json::json;

    fn item() -> ItemRef {
        ItemRef::new(ItemType::from_static("Product"))
    }

    #[test]
    fn test_initial_value_until_set() {
        let handler = InMemoryDynamicAttributeHandler::with_initial_value(9.99);
        let product = item();

        assert_eq!(handler.get(&product).unwrap(), json!(9.99));
        handler.set(&product, json!(14.99)).unwrap();
        assert_eq!(handler.get(&product).unwrap(), json!(14.99));
    }

    #[test]
    fn test_values_are_kept_per_instance() {
        let handler = InMemoryDynamicAttributeHandler::with_initial_value("draft");
        let first = item();
        let second = item();

        handler.set(&first, json!("published")).unwrap();

        assert_eq!(handler.get(&first).unwrap(), json!("published"));
        assert_eq!(handler.get(&second).unwrap(), json!("draft"));
    }

    #[test]
    fn test_localized_falls_back_to_plain_value() {
        let handler = InMemoryDynamicAttributeHandler::with_initial_value("Widget");
        let product = item();

        handler
            .set_localized(&product, json!("Ding"), &Locale::german())
            .unwrap();

        assert_eq!(
            handler.get_localized(&product, &Locale::german()).unwrap(),
            json!("Ding")
        );
        assert_eq!(
            handler.get_localized(&product, &Locale::english()).unwrap(),
            json!("Widget")
        );
    }

    #[test]
    fn test_rebind_carries_state_to_copy() {
        let handler = InMemoryDynamicAttributeHandler::new();
        let original = item();
        let copy = item();

        handler.set(&original, json!(3)).unwrap();
        handler
            .set_localized(&original, json!("drei"), &Locale::german())
            .unwrap();
        handler.rebind(&original.pk, &copy);

        assert_eq!(handler.get(&copy).unwrap(), json!(3));
        assert_eq!(
            handler.get_localized(&copy, &Locale::german()).unwrap(),
            json!("drei")
        );

        handler.set(&copy, json!(4)).unwrap();
        assert_eq!(handler.get(&original).unwrap(), json!(3));
    }

    #[test]
    fn test_release_forgets_one_instance() {
        let handler = InMemoryDynamicAttributeHandler::with_initial_value(0);
        let kept = item();
        let released = item();

        handler.set(&kept, json!(1)).unwrap();
        handler.set(&released, json!(2)).unwrap();
        handler
            .set_localized(&released, json!("zwei"), &Locale::german())
            .unwrap();
        assert_eq!(handler.tracked_items(), 2);

        handler.release(&released.pk);
        handler.release(&released.pk);

        assert_eq!(handler.tracked_items(), 1);
        assert_eq!(handler.get(&kept).unwrap(), json!(1));
        assert_eq!(handler.get(&released).unwrap(), json!(0));
        assert_eq!(
            handler.get_localized(&released, &Locale::german()).unwrap(),
            json!(0)
        );
    }
}

//! Per-render action registry.

use std::borrow::Borrow;
use std::collections::hash_map::{Entry, HashMap};
use std::fmt;

use super::Callback;
use crate::view::NodeId;

/// Address of a callback: `<node id>@<attribute name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerId(String);

impl HandlerId {
    pub fn new(node: NodeId, attribute: &str) -> Self {
        Self(format!("{node}@{attribute}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for HandlerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HandlerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Callbacks registered by the most recent render.
#[derive(Default, Clone)]
pub struct ActionRegistry {
    actions: HashMap<HandlerId, Callback>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `id` unless the id is already taken in this
    /// render. Returns whether the callback was stored.
    pub fn register(&mut self, id: HandlerId, callback: Callback) -> bool {
        match self.actions.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(callback);
                true
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Callback> {
        self.actions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &HandlerId> {
        self.actions.keys()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.actions.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_id_format() {
        let node = NodeId::new();
        let id = HandlerId::new(node, "onclick");
        assert_eq!(id.as_str(), format!("{}@onclick", node.raw()));
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = ActionRegistry::new();
        let id = HandlerId::from("1@onclick");

        assert!(registry.register(id.clone(), Callback::new(|| {})));
        assert!(!registry.register(
            id.clone(),
            Callback::new(|| Err::<(), _>("second"))
        ));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("1@onclick").unwrap().invoke(vec![]).is_ok());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut registry = ActionRegistry::new();
        registry.register(HandlerId::from("1@onclick"), Callback::new(|| {}));
        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.contains("1@onclick"));
    }
}

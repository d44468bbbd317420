//! Element Nodes
//!
//! An element is a tag name, an ordered attribute map, and an ordered list of
//! child views. Every element receives a [`NodeId`] when it is constructed;
//! the renderer combines that id with an attribute name to address callbacks,
//! so the same node yields the same handler id on every render.
//!
//! Elements are built with consuming builder methods and become immutable once
//! converted into a [`View`]. `Element` is deliberately not `Clone`: two nodes
//! sharing an id would collide in the action registry. Share a built node by
//! cloning the `View` instead.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::{Style, View};
use crate::render::{Callback, Handler};

/// Unique identifier for an element node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The value of an element attribute.
#[derive(Clone)]
pub enum AttrValue {
    Text(String),
    /// Rendered as a bare attribute when true, omitted when false.
    Flag(bool),
    /// Rendered as the style's class name.
    Style(Style),
    /// Rendered as a trigger instruction for the browser.
    Callback(Callback),
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
            AttrValue::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            AttrValue::Style(style) => f.debug_tuple("Style").field(style).finish(),
            AttrValue::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        AttrValue::Text(text.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        AttrValue::Text(text)
    }
}

impl From<bool> for AttrValue {
    fn from(flag: bool) -> Self {
        AttrValue::Flag(flag)
    }
}

impl From<Style> for AttrValue {
    fn from(style: Style) -> Self {
        AttrValue::Style(style)
    }
}

impl From<&Style> for AttrValue {
    fn from(style: &Style) -> Self {
        AttrValue::Style(style.clone())
    }
}

impl From<Callback> for AttrValue {
    fn from(callback: Callback) -> Self {
        AttrValue::Callback(callback)
    }
}

/// A markup element node.
pub struct Element {
    id: NodeId,
    tag: Cow<'static, str>,
    attributes: IndexMap<String, AttrValue>,
    children: SmallVec<[View; 4]>,
}

impl Element {
    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: NodeId::new(),
            tag: tag.into(),
            attributes: IndexMap::new(),
            children: SmallVec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn child_views(&self) -> &[View] {
        &self.children
    }

    /// Append a child.
    pub fn child(mut self, child: impl Into<View>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children.
    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<View>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Set an attribute. Setting the same name twice keeps the first
    /// position and the last value.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attach a callback under `name`, e.g. `onclick`, `oninput`, `onchecked`.
    pub fn on<Args, H>(self, name: impl Into<String>, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.attr(name, Callback::new(handler))
    }

    /// Set the `class` attribute to a style's class name.
    pub fn class(self, style: &Style) -> Self {
        self.attr("class", style)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("attributes", &self.attributes)
            .field("children", &self.children)
            .finish()
    }
}

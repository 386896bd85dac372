use std::fmt;

use crate::error::Result;

/// Identifies the container a root view attaches to.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum HostRef {
    /// Matches the element whose `id` attribute equals the value.
    Id(String),
    /// Matches the first element selected by a CSS selector.
    Selector(String),
}

impl HostRef {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn selector(selector: impl Into<String>) -> Self {
        Self::Selector(selector.into())
    }
}

impl From<&str> for HostRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for HostRef {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<&HostRef> for HostRef {
    fn from(host: &HostRef) -> Self {
        host.clone()
    }
}

impl fmt::Display for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Selector(selector) => f.write_str(selector),
        }
    }
}

/// Element lookup within a hosting document.
pub trait Document {
    type Element: Element;

    /// Returns `Ok(None)` when nothing matches `host`.
    fn lookup(&self, host: &HostRef) -> Result<Option<Self::Element>>;
}

/// A container element that a root view can occupy.
///
/// Clones refer to the same underlying element.
pub trait Element: Clone + 'static {
    /// Detached copy of the element's attributes and children, used to roll
    /// back or restore the host.
    type Snapshot;

    /// Short human readable form, e.g. `div#app`.
    fn describe(&self) -> String;

    fn is_connected(&self) -> bool;

    fn attr(&self, name: &str) -> Option<String>;
    fn set_attr(&self, name: &str, value: &str);
    fn remove_attr(&self, name: &str);

    fn snapshot(&self) -> Self::Snapshot;

    /// Replaces the current attributes and children with a snapshot's.
    fn restore(&self, snapshot: Self::Snapshot);

    /// Removes every child, leaving attributes alone.
    fn clear(&self);
    fn is_empty(&self) -> bool;
}

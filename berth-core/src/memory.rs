//! In-memory document for hosts without a browser, and for tests.

use std::{
    cell::RefCell,
    fmt::{self, Write},
    rc::{Rc, Weak},
};

use indexmap::IndexMap;

use crate::{
    error::{Error, Result},
    host::{Document, Element, HostRef},
};

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Clone)]
pub struct MemoryDocument {
    root: MemoryElement,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        let root = MemoryElement::create("body", true);
        Self { root }
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self) -> MemoryElement {
        self.root.clone()
    }

    /// Creates an element that is not yet part of the document.
    pub fn create_element(&self, tag: &str) -> MemoryElement {
        MemoryElement::new(tag)
    }

    pub fn to_html(&self) -> String {
        self.root.to_html()
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;

    fn lookup(&self, host: &HostRef) -> Result<Option<MemoryElement>> {
        let found = match host {
            HostRef::Id(id) if id.is_empty() => None,
            HostRef::Id(id) => self
                .root
                .find(&|el: &MemoryElement| el.attr("id").as_deref() == Some(id.as_str())),
            HostRef::Selector(selector) => {
                let selector = Selector::parse(selector)?;
                self.root.find(&|el: &MemoryElement| selector.matches(el))
            }
        };
        Ok(found)
    }
}

enum Selector<'a> {
    Id(&'a str),
    Class(&'a str),
    Tag(&'a str),
}

impl<'a> Selector<'a> {
    fn parse(selector: &'a str) -> Result<Self> {
        let trimmed = selector.trim();
        let (parsed, name) = if let Some(id) = trimmed.strip_prefix('#') {
            (Self::Id(id), id)
        } else if let Some(class) = trimmed.strip_prefix('.') {
            (Self::Class(class), class)
        } else {
            (Self::Tag(trimmed), trimmed)
        };

        if name.is_empty() {
            return Err(Error::invalid_selector(selector, "empty selector"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::invalid_selector(
                selector,
                "only `#id`, `.class` and tag selectors are supported",
            ));
        }
        Ok(parsed)
    }

    fn matches(&self, el: &MemoryElement) -> bool {
        match self {
            Self::Id(id) => el.attr("id").as_deref() == Some(*id),
            Self::Class(class) => el
                .attr("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == *class)),
            Self::Tag(tag) => el.tag().eq_ignore_ascii_case(tag),
        }
    }
}

#[derive(Clone, Debug)]
pub enum MemoryNode {
    Element(MemoryElement),
    Text(String),
}

impl From<MemoryElement> for MemoryNode {
    fn from(el: MemoryElement) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for MemoryNode {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MemoryNode {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[derive(Clone)]
pub struct MemoryElement(Rc<Inner>);

#[derive(Clone, Debug)]
pub struct MemorySnapshot {
    attrs: IndexMap<String, String>,
    children: Vec<MemoryNode>,
}

struct Inner {
    tag: String,
    document_root: bool,
    attrs: RefCell<IndexMap<String, String>>,
    children: RefCell<Vec<MemoryNode>>,
    parent: RefCell<Option<Weak<Inner>>>,
}

impl MemoryElement {
    fn create(tag: &str, document_root: bool) -> Self {
        Self(Rc::new(Inner {
            tag: tag.to_ascii_lowercase(),
            document_root,
            attrs: RefCell::default(),
            children: RefCell::default(),
            parent: RefCell::default(),
        }))
    }

    pub fn new(tag: &str) -> Self {
        Self::create(tag, false)
    }

    pub fn with_attr(self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    pub fn parent(&self) -> Option<Self> {
        self.0.parent.borrow().as_ref().and_then(Weak::upgrade).map(Self)
    }

    pub fn children(&self) -> Vec<MemoryNode> {
        self.0.children.borrow().clone()
    }

    pub fn child_elements(&self) -> Vec<Self> {
        self.0
            .children
            .borrow()
            .iter()
            .filter_map(|node| match node {
                MemoryNode::Element(el) => Some(el.clone()),
                MemoryNode::Text(_) => None,
            })
            .collect()
    }

    /// Appends `child`, moving it out of its current parent first.
    pub fn append(&self, child: impl Into<MemoryNode>) {
        let child = child.into();
        if let MemoryNode::Element(el) = &child {
            assert!(
                !el.contains(self),
                "cannot append an element to its own subtree"
            );
            el.detach();
            el.0.parent.replace(Some(Rc::downgrade(&self.0)));
        }
        self.0.children.borrow_mut().push(child);
    }

    /// Removes `self` from its parent, if it has one.
    pub fn detach(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent
            .0
            .children
            .borrow_mut()
            .retain(|node| !matches!(node, MemoryNode::Element(el) if el == self));
        self.0.parent.replace(None);
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &*self.0.children.borrow() {
            match node {
                MemoryNode::Element(el) => out.push_str(&el.text_content()),
                MemoryNode::Text(text) => out.push_str(text),
            }
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out)
            .expect("writing to a String cannot fail");
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        self.write_children(&mut out)
            .expect("writing to a String cannot fail");
        out
    }

    fn write_html<W: Write>(&self, w: &mut W) -> fmt::Result {
        let tag = self.tag();
        write!(w, "<{tag}")?;
        for (key, value) in &*self.0.attrs.borrow() {
            write!(w, " {}=\"{}\"", key, escape(value))?;
        }
        w.write_char('>')?;

        if self.is_empty() && VOID.contains(&tag) {
            return Ok(());
        }
        self.write_children(w)?;
        write!(w, "</{tag}>")
    }

    fn write_children<W: Write>(&self, w: &mut W) -> fmt::Result {
        for node in &*self.0.children.borrow() {
            match node {
                MemoryNode::Element(el) => el.write_html(w)?,
                MemoryNode::Text(text) => w.write_str(&escape(text))?,
            }
        }
        Ok(())
    }

    fn contains(&self, other: &Self) -> bool {
        self == other
            || self
                .child_elements()
                .iter()
                .any(|child| child.contains(other))
    }

    fn find(&self, pred: &dyn Fn(&Self) -> bool) -> Option<Self> {
        if pred(self) {
            return Some(self.clone());
        }
        self.child_elements()
            .iter()
            .find_map(|child| child.find(pred))
    }

    fn root(&self) -> Self {
        self.parent().map_or_else(|| self.clone(), |parent| parent.root())
    }

    fn take_children(&self) -> Vec<MemoryNode> {
        let children = std::mem::take(&mut *self.0.children.borrow_mut());
        for node in &children {
            if let MemoryNode::Element(el) = node {
                el.0.parent.replace(None);
            }
        }
        children
    }
}

impl Element for MemoryElement {
    type Snapshot = MemorySnapshot;

    fn describe(&self) -> String {
        match self.attr("id") {
            Some(id) => format!("{}#{}", self.tag(), id),
            None => self.tag().to_string(),
        }
    }

    fn is_connected(&self) -> bool {
        self.root().0.document_root
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.attrs.borrow().get(name).cloned()
    }

    fn set_attr(&self, name: &str, value: &str) {
        self.0
            .attrs
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attr(&self, name: &str) {
        self.0.attrs.borrow_mut().shift_remove(name);
    }

    fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            attrs: self.0.attrs.borrow().clone(),
            children: self.children(),
        }
    }

    fn restore(&self, snapshot: MemorySnapshot) {
        self.0.attrs.replace(snapshot.attrs);
        self.take_children();
        for node in snapshot.children {
            self.append(node);
        }
    }

    fn clear(&self) {
        self.take_children();
    }

    fn is_empty(&self) -> bool {
        self.0.children.borrow().is_empty()
    }
}

impl Eq for MemoryElement {}
impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryElement({})", self.describe())
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

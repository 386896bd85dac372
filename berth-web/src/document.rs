use std::thread_local;

use berth_core::{Document, Element, Error, HostRef, Result};
use wasm_bindgen::{intern, prelude::*};

use crate::js_message;

thread_local! {
    static DOCUMENT: Option<web_sys::Document> = if cfg!(target_family = "wasm") {
        web_sys::window()
            .and_then(|window| window.document())
    } else {
        None
    };
}

/// The page's document, when running inside a browser.
pub fn document() -> Option<web_sys::Document> {
    DOCUMENT.with(Clone::clone)
}

pub fn is_web() -> bool {
    document().is_some()
}

#[derive(Clone, Debug)]
pub struct WebDocument(web_sys::Document);

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self(document)
    }

    /// The page's document, or `None` outside a browser.
    pub fn current() -> Option<Self> {
        document().map(Self)
    }

    pub fn native(&self) -> &web_sys::Document {
        &self.0
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn lookup(&self, host: &HostRef) -> Result<Option<WebElement>> {
        let found = match host {
            HostRef::Id(id) if id.is_empty() => None,
            HostRef::Id(id) => self.0.get_element_by_id(id),
            HostRef::Selector(selector) => self
                .0
                .query_selector(selector)
                .map_err(|err| Error::invalid_selector(selector, js_message(&err)))?,
        };
        Ok(found.map(WebElement))
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct WebElement(web_sys::Element);

impl WebElement {
    pub fn native(&self) -> &web_sys::Element {
        &self.0
    }

    fn attr_names(&self) -> Vec<String> {
        self.0
            .get_attribute_names()
            .iter()
            .filter_map(|name| name.as_string())
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct WebSnapshot {
    attrs: Vec<(String, String)>,
    children: Vec<web_sys::Node>,
}

impl From<web_sys::Element> for WebElement {
    fn from(element: web_sys::Element) -> Self {
        Self(element)
    }
}

impl Element for WebElement {
    type Snapshot = WebSnapshot;

    fn describe(&self) -> String {
        let tag = self.0.tag_name().to_ascii_lowercase();
        let id = self.0.id();
        if id.is_empty() {
            tag
        } else {
            format!("{tag}#{id}")
        }
    }

    fn is_connected(&self) -> bool {
        self.0.is_connected()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attr(&self, name: &str, value: &str) {
        self.0.set_attribute(intern(name), value).unwrap_throw();
    }

    fn remove_attr(&self, name: &str) {
        self.0.remove_attribute(name).unwrap_throw();
    }

    fn snapshot(&self) -> WebSnapshot {
        let attrs = self
            .attr_names()
            .into_iter()
            .filter_map(|name| {
                let value = self.0.get_attribute(&name)?;
                Some((name, value))
            })
            .collect();
        let list = self.0.child_nodes();
        let children = (0..list.length()).filter_map(|i| list.item(i)).collect();
        WebSnapshot { attrs, children }
    }

    fn restore(&self, snapshot: WebSnapshot) {
        for name in self.attr_names() {
            if !snapshot.attrs.iter().any(|(kept, _)| *kept == name) {
                self.remove_attr(&name);
            }
        }
        for (name, value) in &snapshot.attrs {
            self.set_attr(name, value);
        }

        self.clear();
        for node in &snapshot.children {
            self.0.append_child(node).unwrap_throw();
        }
    }

    fn clear(&self) {
        self.0.set_text_content(None);
    }

    fn is_empty(&self) -> bool {
        !self.0.has_child_nodes()
    }
}

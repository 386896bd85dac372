//! Browser host for berth: element lookup and occupancy over `web-sys`.

#![warn(clippy::use_self)]

mod document;
mod raw;

pub use self::{
    document::{document, is_web, WebDocument, WebElement, WebSnapshot},
    raw::RawHtml,
};

use wasm_bindgen::{JsCast, JsValue};

/// Best effort message for a thrown JavaScript value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        String::from(err.message())
    } else if let Some(s) = value.as_string() {
        s
    } else {
        format!("{value:?}")
    }
}

#[cfg(all(test, target_family = "wasm"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

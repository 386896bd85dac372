use berth_core::{Component, ViewError};
use wasm_bindgen::JsValue;

use crate::{document::WebElement, js_message};

/// Root view that parses its props as markup into the host.
///
/// The markup is not sanitized.
#[derive(Clone, Copy, Default, Debug)]
pub struct RawHtml;

impl Component<WebElement> for RawHtml {
    type Props = String;
    type Instance = ();

    fn instantiate(&self, markup: String, host: &WebElement) -> Result<(), ViewError> {
        let fail = |what: &str| {
            let what = what.to_string();
            move |err: JsValue| ViewError::new(format!("{what}: {}", js_message(&err)))
        };

        let range = web_sys::Range::new().map_err(fail("cannot create range"))?;
        range
            .select_node_contents(host.native())
            .map_err(fail("cannot select host"))?;
        let fragment = range
            .create_contextual_fragment(&markup)
            .map_err(fail("invalid markup"))?;
        host.native()
            .append_child(&fragment)
            .map_err(fail("cannot insert markup"))?;

        tracing::trace!(bytes = markup.len(), "inserted raw markup");
        Ok(())
    }
}

#[cfg(all(test, target_family = "wasm"))]
mod tests {
    use super::*;

    use berth_core::{AppState, Bootstrapper, Element, Error, RootView, MARKER_ATTR};
    use wasm_bindgen_test::*;

    use crate::{document, WebDocument};

    fn host(id: &str) -> web_sys::Element {
        let document = document().unwrap();
        let element = document.create_element("div").unwrap();
        element.set_id(id);
        element.set_inner_html("Loading");
        document
            .document_element()
            .unwrap()
            .append_child(&element)
            .unwrap();
        element
    }

    #[wasm_bindgen_test]
    fn bootstrap_and_dispose() {
        let native = host("raw-host");
        let boot = Bootstrapper::new(WebDocument::current().unwrap());

        let markup = "<h1>Hello</h1>".to_string();
        let mut handle = boot
            .bootstrap(RootView::new(RawHtml, markup.clone()), "raw-host")
            .unwrap();
        assert_eq!(handle.state(), AppState::Mounted);
        assert_eq!(native.inner_html(), markup);
        assert!(handle.host().attr(MARKER_ATTR).is_some());

        let err = boot
            .bootstrap(RootView::new(RawHtml, markup), "raw-host")
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyMounted { .. }));

        handle.dispose().unwrap();
        assert_eq!(native.inner_html(), "");
        assert!(native.get_attribute(MARKER_ATTR).is_none());
        native.remove();
    }
}

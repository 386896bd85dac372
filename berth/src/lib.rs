#![warn(clippy::use_self)]

pub use berth_core::*;
pub use berth_web::{document, is_web, RawHtml, WebDocument, WebElement};

pub mod prelude {
    pub use crate::{
        component_fn, mount, on_teardown, AppHandle, Component, Element as _, HostRef, RootView,
        Teardown, ViewError,
    };
}

/// Bootstrapper over the page's document, or `None` outside a browser.
pub fn bootstrapper(config: Config) -> Option<Bootstrapper<WebDocument>> {
    WebDocument::current().map(|document| Bootstrapper::with_config(document, config))
}

/// Mounts `view` onto `host` in the page's document.
///
/// Outside a browser nothing can resolve, so this fails with
/// [`Error::HostNotFound`].
pub fn mount<C>(
    view: RootView<C, C::Props>,
    host: impl Into<HostRef>,
) -> Result<AppHandle<WebElement, C::Instance>>
where
    C: Component<WebElement>,
{
    let host = host.into();
    let Some(boot) = bootstrapper(Config::default()) else {
        tracing::warn!(%host, "no browser document to mount into");
        return Err(Error::HostNotFound(host));
    };
    boot.bootstrap(view, host)
}

use std::{error::Error as StdError, marker::PhantomData};

use thiserror::Error;

use crate::host::Element;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Failure raised by a root view while constructing or first rendering.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ViewError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl ViewError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Releases whatever a live view holds: effects, subscriptions, listeners.
///
/// The bootstrapper clears the host element itself after `teardown` returns.
pub trait Teardown {
    fn teardown(self);
}

impl Teardown for () {
    fn teardown(self) {}
}

impl<T: Teardown> Teardown for Option<T> {
    fn teardown(self) {
        if let Some(inner) = self {
            inner.teardown();
        }
    }
}

impl<T: Teardown> Teardown for Vec<T> {
    fn teardown(self) {
        for inner in self {
            inner.teardown();
        }
    }
}

/// Runs a closure on teardown.
pub struct OnTeardown<F: FnOnce()>(F);

pub fn on_teardown<F: FnOnce()>(f: F) -> OnTeardown<F> {
    OnTeardown(f)
}

impl<F: FnOnce()> Teardown for OnTeardown<F> {
    fn teardown(self) {
        (self.0)()
    }
}

/// The rendering engine's entry point for a root view.
///
/// `instantiate` performs the initial render into `host` and returns the live
/// instance. Any later re-rendering is the instance's own business.
pub trait Component<E: Element> {
    type Props;
    type Instance: Teardown;

    fn instantiate(&self, props: Self::Props, host: &E) -> Result<Self::Instance, ViewError>;
}

pub struct FnComponent<F, P> {
    f: F,
    _props: PhantomData<fn(P)>,
}

/// Adapts `f(props, host)` into a [`Component`].
pub fn component_fn<F, P>(f: F) -> FnComponent<F, P> {
    FnComponent {
        f,
        _props: PhantomData,
    }
}

impl<E, F, P, I> Component<E> for FnComponent<F, P>
where
    E: Element,
    F: Fn(P, &E) -> Result<I, ViewError>,
    I: Teardown,
{
    type Props = P;
    type Instance = I;

    fn instantiate(&self, props: P, host: &E) -> Result<I, ViewError> {
        (self.f)(props, host)
    }
}

/// A component paired with the props of its first render.
pub struct RootView<C, P> {
    pub(crate) component: C,
    pub(crate) props: P,
}

impl<C, P> RootView<C, P> {
    pub fn new(component: C, props: P) -> Self {
        Self { component, props }
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn props(&self) -> &P {
        &self.props
    }
}

impl<C> RootView<C, ()> {
    pub fn without_props(component: C) -> Self {
        Self::new(component, ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{cell::Cell, error::Error as _, fmt, rc::Rc};

    #[test]
    fn teardown_runs_nested_closures() {
        let calls = Rc::new(Cell::new(0));
        let bump = || {
            let calls = calls.clone();
            on_teardown(move || calls.set(calls.get() + 1))
        };

        vec![Some(bump()), None, Some(bump())].teardown();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn view_error_keeps_source() {
        #[derive(Debug)]
        struct Bad;
        impl fmt::Display for Bad {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("bad props")
            }
        }
        impl StdError for Bad {}

        let err = ViewError::with_source("render failed", Bad);
        assert_eq!(err.to_string(), "render failed");
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("bad props"));
        assert!(ViewError::new("plain").source().is_none());
    }
}

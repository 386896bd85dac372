use std::{cell::Cell, fmt, mem, thread_local};

use tracing::{debug, info, warn};

use crate::{
    config::{Config, DisposePolicy},
    error::{Error, Result},
    host::{Document, Element, HostRef},
    view::{Component, RootView, Teardown},
};

/// Attribute naming the application that occupies a host element.
///
/// Shared by every bootstrapper so that any of them sees any other's mounts.
pub const MARKER_ATTR: &str = "data-berth-app";

thread_local! {
    static NEXT_ID: Cell<u64> = const { Cell::new(1) };
}

/// Identifies one successful mount. Never reused within a thread.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AppId(u64);

impl AppId {
    fn next() -> Self {
        Self(NEXT_ID.replace(NEXT_ID.get() + 1))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app-{}", self.0)
    }
}

/// Lifecycle of an [`AppHandle`]. A handle only exists once its view has
/// mounted, and a disposed handle never mounts again.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Mounted,
    Disposed,
}

/// Resolves host elements in a document and mounts root views onto them.
pub struct Bootstrapper<D: Document> {
    document: D,
    config: Config,
}

impl<D: Document> Bootstrapper<D> {
    pub fn new(document: D) -> Self {
        Self::with_config(document, Config::default())
    }

    pub fn with_config(document: D, config: Config) -> Self {
        Self { document, config }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolve(&self, host: &HostRef) -> Result<D::Element> {
        match self.document.lookup(host)? {
            Some(element) => {
                debug!(%host, element = %element.describe(), "resolved host");
                Ok(element)
            }
            None => Err(Error::HostNotFound(host.clone())),
        }
    }

    /// Performs the first render of `view` into `host`.
    ///
    /// The host's children and attributes are left exactly as they were found
    /// if the view fails to instantiate, including when it panics.
    pub fn mount<C>(
        &self,
        view: RootView<C, C::Props>,
        host: D::Element,
    ) -> Result<AppHandle<D::Element, C::Instance>>
    where
        C: Component<D::Element>,
    {
        if !host.is_connected() {
            return Err(Error::HostDetached {
                host: host.describe(),
            });
        }
        if let Some(app) = host.attr(MARKER_ATTR) {
            return Err(Error::AlreadyMounted {
                host: host.describe(),
                app,
            });
        }

        let id = AppId::next();
        let guard = HostGuard::acquire(&host, &self.config, id);

        let RootView { component, props } = view;
        let instance = match component.instantiate(props, &host) {
            Ok(instance) => instance,
            Err(err) => {
                drop(guard);
                warn!(
                    app = %id,
                    host = %host.describe(),
                    error = %err,
                    "root view failed, host rolled back"
                );
                return Err(Error::ViewInstantiation(err));
            }
        };

        let snapshot = guard.commit();
        info!(app = %id, host = %host.describe(), "mounted application");

        Ok(AppHandle {
            id,
            live: Some(Live {
                instance,
                snapshot: snapshot.filter(|_| self.config.restore_on_dispose),
            }),
            policy: self.config.dispose,
            host,
        })
    }

    /// Resolves `host` and mounts `view` onto it.
    pub fn bootstrap<C>(
        &self,
        view: RootView<C, C::Props>,
        host: impl Into<HostRef>,
    ) -> Result<AppHandle<D::Element, C::Instance>>
    where
        C: Component<D::Element>,
    {
        let element = self.resolve(&host.into())?;
        self.mount(view, element)
    }

    /// Bootstraps onto the host named by [`Config::host`].
    pub fn default_host<C>(
        &self,
        view: RootView<C, C::Props>,
    ) -> Result<AppHandle<D::Element, C::Instance>>
    where
        C: Component<D::Element>,
    {
        self.bootstrap(view, self.config.host_ref())
    }
}

/// Occupies a host for the duration of a first render, undoing everything on
/// drop unless committed.
struct HostGuard<'a, E: Element> {
    host: &'a E,
    snapshot: Option<E::Snapshot>,
}

impl<'a, E: Element> HostGuard<'a, E> {
    fn acquire(host: &'a E, config: &Config, id: AppId) -> Self {
        let snapshot = host.snapshot();
        if config.replace_contents {
            host.clear();
        }
        host.set_attr(MARKER_ATTR, &id.to_string());

        Self {
            host,
            snapshot: Some(snapshot),
        }
    }

    fn commit(mut self) -> Option<E::Snapshot> {
        self.snapshot.take()
    }
}

impl<E: Element> Drop for HostGuard<'_, E> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.host.restore(snapshot);
        }
    }
}

/// Empties a host after teardown, also while unwinding out of a panicking
/// teardown.
struct HostRelease<'a, E: Element> {
    id: AppId,
    host: &'a E,
    snapshot: Option<E::Snapshot>,
}

impl<E: Element> Drop for HostRelease<'_, E> {
    fn drop(&mut self) {
        match self.snapshot.take() {
            Some(snapshot) => self.host.restore(snapshot),
            None => self.host.clear(),
        }

        let marker = self.host.attr(MARKER_ATTR);
        if marker.as_deref() == Some(self.id.to_string().as_str()) {
            self.host.remove_attr(MARKER_ATTR);
        }

        info!(app = %self.id, host = %self.host.describe(), "disposed application");
    }
}

struct Live<E: Element, I> {
    instance: I,
    snapshot: Option<E::Snapshot>,
}

/// Caller-owned token for a mounted root view.
///
/// Dropping a mounted handle disposes it; use [`AppHandle::leak`] to keep the
/// view for the rest of the page's life.
pub struct AppHandle<E: Element, I: Teardown> {
    id: AppId,
    host: E,
    live: Option<Live<E, I>>,
    policy: DisposePolicy,
}

impl<E: Element, I: Teardown> AppHandle<E, I> {
    pub fn id(&self) -> AppId {
        self.id
    }

    pub fn state(&self) -> AppState {
        if self.live.is_some() {
            AppState::Mounted
        } else {
            AppState::Disposed
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.state() == AppState::Mounted
    }

    pub fn host(&self) -> &E {
        &self.host
    }

    /// The live view, until disposal.
    pub fn instance(&self) -> Option<&I> {
        self.live.as_ref().map(|live| &live.instance)
    }

    pub fn instance_mut(&mut self) -> Option<&mut I> {
        self.live.as_mut().map(|live| &mut live.instance)
    }

    /// Tears the view down and releases the host for another mount.
    pub fn dispose(&mut self) -> Result<()> {
        let Some(live) = self.live.take() else {
            return match self.policy {
                DisposePolicy::Strict => Err(Error::AlreadyDisposed(self.id)),
                DisposePolicy::Idempotent => {
                    debug!(app = %self.id, "application already disposed");
                    Ok(())
                }
            };
        };

        self.release(live);
        Ok(())
    }

    /// Keeps the view mounted until the process ends.
    pub fn leak(self) {
        debug!(app = %self.id, "leaking application handle");
        mem::forget(self);
    }

    fn release(&self, live: Live<E, I>) {
        let Live { instance, snapshot } = live;
        let _release = HostRelease {
            id: self.id,
            host: &self.host,
            snapshot,
        };
        instance.teardown();
    }
}

impl<E: Element, I: Teardown> Drop for AppHandle<E, I> {
    fn drop(&mut self) {
        if let Some(live) = self.live.take() {
            debug!(app = %self.id, "mounted handle dropped");
            self.release(live);
        }
    }
}

impl<E: Element, I: Teardown> PartialEq for AppHandle<E, I> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E: Element, I: Teardown> fmt::Debug for AppHandle<E, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppHandle")
            .field("id", &self.id)
            .field("host", &self.host.describe())
            .field("state", &self.state())
            .finish()
    }
}

/// Disposes `handle`; see [`AppHandle::dispose`].
pub fn dispose<E: Element, I: Teardown>(handle: &mut AppHandle<E, I>) -> Result<()> {
    handle.dispose()
}

use thiserror::Error;

use crate::{app::AppId, host::HostRef, view::ViewError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("host reference `{0}` matched no element")]
    HostNotFound(HostRef),

    #[error("invalid host selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("host element `{host}` is not attached to its document")]
    HostDetached { host: String },

    #[error("host element `{host}` is already occupied by application {app}")]
    AlreadyMounted { host: String, app: String },

    #[error("root view failed to instantiate")]
    ViewInstantiation(#[source] ViewError),

    #[error("application {0} was already disposed")]
    AlreadyDisposed(AppId),
}

impl Error {
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("malformed config")]
    Toml(#[from] toml::de::Error),
}

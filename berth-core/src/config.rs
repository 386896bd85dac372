use std::collections::BTreeSet;

use serde::Deserialize;

use crate::{error::ConfigError, host::HostRef};

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Id of the element [`Bootstrapper::default_host`](crate::Bootstrapper::default_host) mounts onto.
    pub host: String,
    pub replace_contents: bool,
    pub restore_on_dispose: bool,
    pub dispose: DisposePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "app".into(),
            replace_contents: true,
            restore_on_dispose: false,
            dispose: DisposePolicy::default(),
        }
    }
}

/// What disposing an already disposed handle does.
#[derive(Clone, Copy, Default, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DisposePolicy {
    /// Fails with [`Error::AlreadyDisposed`](crate::Error::AlreadyDisposed).
    #[default]
    Strict,
    /// Succeeds without touching anything.
    Idempotent,
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let mut unused = BTreeSet::new();
        let config: Self =
            serde_ignored::deserialize(toml::Deserializer::new(contents), |path| {
                unused.insert(path.to_string());
            })?;

        for key in unused {
            tracing::warn!(%key, "unused config key");
        }
        Ok(config)
    }

    pub fn host_ref(&self) -> HostRef {
        HostRef::id(&self.host)
    }
}

//! Attaches a root view to a container element of a hosting document and
//! hands back the handle that later tears it down.

#![warn(clippy::use_self)]

mod app;
mod config;
mod error;
mod host;
mod view;

pub mod memory;

pub use self::{app::*, config::*, error::*, host::*, view::*};

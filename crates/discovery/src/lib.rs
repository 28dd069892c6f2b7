//! Address and FQDN discovery for provisioned test instances.
//!
//! This crate provides:
//! - `InstanceState` and the `StateStore` capability for persisted
//!   connection state
//! - `Finder`/`FinderFactory` traits and the transport registry
//! - `Pinger` reachability probing
//! - `AddressResolver`, which turns persisted state into the single
//!   effective address (and best-effort FQDN) of an instance

pub mod finder;
pub mod pinger;
pub mod resolver;
pub mod state;

// Re-export main types
pub use finder::{Finder, FinderFactory, FinderRegistry};
pub use pinger::{ExternalPinger, Pinger};
pub use resolver::AddressResolver;
pub use state::{InstanceState, JsonStateStore, StateStore};

//! Node descriptor preparation for the Galley provisioner.
//!
//! This crate assembles the structured node descriptor describing a
//! test instance's identity, environment, and configuration, and
//! writes it where the convergence tool expects it:
//! `{test_base_path}/nodes/{instance_name}.json`.

pub mod builder;
pub mod descriptor;

// Re-export main types
pub use builder::NodePreparer;
pub use descriptor::{AutomaticAttributes, NodeDescriptor};

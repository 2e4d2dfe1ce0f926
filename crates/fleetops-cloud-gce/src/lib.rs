//! Google Compute Engine provider for FleetOps
//!
//! Implements the ComputeProvider trait on top of the `gcloud` CLI, giving
//! the console access to every project the configured credentials can reach.
//!
//! # Requirements
//!
//! - `gcloud` CLI must be installed and authenticated
//! - Project access follows whatever the active gcloud credentials allow

pub mod error;
pub mod gcloud;
pub mod provider;

pub use error::{GceError, Result};
pub use gcloud::{Gcloud, GceDisk, GceInstance, GceProjectInfo, GceSnapshot};
pub use provider::GceProvider;

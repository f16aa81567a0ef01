//! Shared building blocks of the like service.
//!
//! - [`codec`] - Builds and encrypts request records, decodes profile records.
//! - [`error`] - Service error type and its HTTP mapping.
//! - [`proto`] - Protobuf records exchanged with the upstream game API.
//! - [`region`] - Region codes and the clusters they resolve to.
//! - [`types`] - Credentials and protocol constants.

pub mod codec;
pub mod error;
pub mod proto;
pub mod region;
pub mod types;

pub use error::{Error, Result};

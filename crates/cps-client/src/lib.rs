//! Async REST client for the CPS IoT platform
//!
//! Failed responses surface as [`ClientError::Cps`] carrying the typed
//! [`cps_errors::CpsError`] produced by the response classifier.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod account;
mod client;
mod commands;
mod devices;
mod error;
mod sequences;
mod storage;
mod triggers;
mod types;

pub use client::CpsClient;
pub use error::{ClientError, Result};
pub use storage::KvStorage;
pub use triggers::TriggerParent;
pub use types::*;

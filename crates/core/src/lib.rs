//! # HR Core
//!
//! Runtime layer over the `things` data model.
//!
//! This crate holds the pieces a program needs around the pure data types:
//! - [`CoreConfig`], resolved once at startup (document size limit, XML indentation, strict
//!   type-name checking),
//! - [`ThingService`], which parses, validates, renders, reads, writes and exports `<thing>`
//!   documents using that configuration and logs what it does through `tracing`.
//!
//! **No transport concerns**: talking to the remote health record service and authentication
//! are out of scope.

mod config;
pub mod constants;
mod error;
mod service;

pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use service::{ExportFormat, ThingService, ThingSummary};

//! srcpbridge-core: The stateful translation engine between the FM-DX
//! webserver JSON feed and the SRCP datagram protocol.
//!
//! This crate is pure translation logic -- it owns no sockets and does no
//! I/O. The transport adapters in `srcpbridge-transport` deliver inbound
//! events to a [`TranslationEngine`] and carry its outbound messages.
//!
//! # Key types
//!
//! - [`TranslationEngine`] -- the two public entry points, one per direction
//! - [`ReceiverProfile`] -- hardware bandwidth tables and command encoding
//! - [`TunerSnapshot`] -- the inbound feed document schema
//! - [`Error`] / [`Result`] -- error handling

pub mod charset;
pub mod command;
pub mod engine;
pub mod error;
pub mod profile;
pub mod snapshot;
pub mod state;

// Re-export key types at crate root for ergonomic `use srcpbridge_core::*`.
pub use command::CommandOutcome;
pub use engine::TranslationEngine;
pub use error::{Error, Result};
pub use profile::{closest_bandwidth, ParseProfileError, ReceiverProfile};
pub use snapshot::{TunerSnapshot, SOURCE_ID};
pub use state::TranslationState;

//! Prelude module for convenient imports.
//!
//! This module provides a convenient set of commonly-used types for working
//! with this crate.
//!
//! # Usage
//!
//! ```rust
//! use snmp_ber_core::prelude::*;
//!
//! let _ = oid!(1, 3, 6, 1, 2, 1, 1, 5, 0);
//! ```
//!
//! This imports:
//! - Core types: [`Message`], [`Pdu`], [`PduType`], [`Oid`], [`Value`],
//!   [`VarBind`], [`VarBindList`], [`Version`]
//! - Error handling: [`Error`], [`ErrorStatus`], [`Result`]
//! - Configuration: [`EngineConfig`], [`StreamingMode`], [`ContainerBackend`]
//! - The [`oid!`] macro for compile-time OID construction

pub use crate::config::{ContainerBackend, EngineConfig, StreamingMode};
pub use crate::error::{Error, ErrorStatus, Result};
pub use crate::message::Message;
pub use crate::oid::Oid;
pub use crate::pdu::{GenericTrap, Pdu, PduFields, PduType};
pub use crate::value::Value;
pub use crate::varbind::{VarBind, VarBindList};
pub use crate::version::Version;

#[doc(no_inline)]
pub use crate::oid;

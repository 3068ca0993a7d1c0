//! # causerie-shared
//!
//! Domain types shared between the networking layer and the client core:
//! identifiers, models, the realtime wire protocol, and tuning constants.

pub mod constants;
pub mod models;
pub mod protocol;
pub mod types;

mod error;

pub use error::ProtocolError;
pub use models::*;

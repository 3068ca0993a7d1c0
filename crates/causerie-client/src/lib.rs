//! # causerie-client
//!
//! The synchronization and composition core of the Causerie chat client:
//! room session state, the ordered message store, mention resolution,
//! reply threading, attachment staging, and the transport bridge that
//! keeps the store consistent with live deliveries.
//!
//! The presentation layer drives the command functions in
//! [`commands`] against a [`SharedSession`] and consumes
//! [`SessionEvent`]s from the bridge started by
//! [`start_transport_bridge`].

pub mod attachments;
pub mod bridge;
pub mod commands;
pub mod composer;
pub mod events;
pub mod mentions;
pub mod reply;
pub mod state;
pub mod store;

mod error;

#[cfg(test)]
pub(crate) mod testutil;

pub use bridge::start_transport_bridge;
pub use error::ClientError;
pub use events::SessionEvent;
pub use state::{SessionConfig, SessionState, SharedSession};
pub use store::{LiveIngest, MessageStore};

use tracing_subscriber::{fmt, EnvFilter};

/// Install the default tracing subscriber for an embedding shell.
///
/// Honors `RUST_LOG` when set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("causerie_client=debug,causerie_net=debug,causerie_shared=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

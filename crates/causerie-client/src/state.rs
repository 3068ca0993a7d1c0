//! Shared session state for the active room.
//!
//! [`SessionState`] is wrapped in `Arc<Mutex<>>` and shared between the
//! command functions and the transport bridge loop. The mutex is never
//! held across an await; every async completion re-checks the session
//! epoch before touching state, so completions that lost a race with a
//! room switch discard themselves.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use causerie_net::{AuthProvider, DirectoryApi, MessageApi, TransportCommand};
use causerie_shared::constants::MAX_STAGED_FILES;
use causerie_shared::models::{Room, User};

use crate::composer::Composition;
use crate::store::MessageStore;

/// Tuning knobs for a client session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum number of files staged on one composition.
    pub max_staged_files: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_staged_files: MAX_STAGED_FILES,
        }
    }
}

/// Central session state.
///
/// Owns the message store and composition for the single active room;
/// both are reset on every room switch.
pub struct SessionState {
    /// The signed-in user. `None` until the directory bootstrap completes.
    pub current_user: Option<User>,

    /// Rooms the user participates in, from the directory load.
    pub rooms: Vec<Room>,

    /// Full user directory, from the directory load.
    pub users: Vec<User>,

    /// The room whose log and composition this session currently owns.
    pub active_room: Option<Room>,

    /// Activation counter; bumped on every room switch. The cancellation
    /// token for every in-flight completion.
    pub epoch: u64,

    /// Ordered, deduplicated log for the active room.
    pub store: MessageStore,

    /// Draft state for the active room.
    pub composition: Composition,

    /// Credential source for REST calls.
    pub auth: Arc<dyn AuthProvider>,

    /// Message persistence and history backend.
    pub api: Arc<dyn MessageApi>,

    /// Directory backend.
    pub directory: Arc<dyn DirectoryApi>,

    /// Sender half of the transport command channel.
    pub hub_tx: mpsc::Sender<TransportCommand>,

    /// Session tuning.
    pub config: SessionConfig,
}

/// Handle shared by commands and the bridge loop.
pub type SharedSession = Arc<Mutex<SessionState>>;

impl SessionState {
    /// Create a fresh session bound to its collaborators. No room is
    /// active and no user is loaded until `bootstrap` and `select_room`
    /// run.
    pub fn new(
        config: SessionConfig,
        auth: Arc<dyn AuthProvider>,
        api: Arc<dyn MessageApi>,
        directory: Arc<dyn DirectoryApi>,
        hub_tx: mpsc::Sender<TransportCommand>,
    ) -> Self {
        Self {
            current_user: None,
            rooms: Vec::new(),
            users: Vec::new(),
            active_room: None,
            epoch: 0,
            store: MessageStore::new(),
            composition: Composition::new(config.max_staged_files),
            auth,
            api,
            directory,
            hub_tx,
            config,
        }
    }

    /// Wrap into the handle shared by commands and the bridge.
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }
}

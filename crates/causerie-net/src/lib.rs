// Collaborator contracts consumed by the client core: auth credential
// plumbing, the REST backend traits, and the realtime room hub.

pub mod api;
pub mod auth;
pub mod http;
pub mod hub;
pub mod memory;
pub mod messages;

pub use api::{ApiError, DirectoryApi, FilePayload, MessageApi, OutgoingMessage};
pub use auth::{AuthProvider, BearerToken, CredentialStore};
pub use http::HttpApi;
pub use hub::{LocalHub, TransportCommand, TransportEvent, TransportLink};
pub use memory::InMemoryServer;
pub use messages::{join_room, leave_room, publish_event, try_decode_delivery};

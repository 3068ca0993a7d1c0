/// Application name
pub const APP_NAME: &str = "Causerie";

/// Maximum number of files that may be staged on one composition.
pub const MAX_STAGED_FILES: usize = 5;

/// Capacity of the transport command / event channels.
pub const CHANNEL_BUFFER: usize = 256;

/// Maximum number of characters kept in a reply preview snippet.
pub const REPLY_SNIPPET_MAX_CHARS: usize = 80;

//! Bearer credential plumbing.
//!
//! Every REST call is authorized with an opaque bearer token issued by the
//! auth service. The core never interprets the token; it only needs
//! "current credential or none", supplied through [`AuthProvider`] so no
//! operation depends on ambient global state.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// An opaque bearer credential issued by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Source of the current credential.
pub trait AuthProvider: Send + Sync {
    /// The credential to attach to the next request, if any.
    fn credential(&self) -> Option<BearerToken>;
}

/// A settable in-memory credential holder.
///
/// Login stores the token here; logout clears it.
#[derive(Debug, Default)]
pub struct CredentialStore {
    token: Mutex<Option<BearerToken>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: BearerToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    pub fn set(&self, token: BearerToken) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }
}

impl AuthProvider for CredentialStore {
    fn credential(&self) -> Option<BearerToken> {
        match self.token.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        }
    }
}

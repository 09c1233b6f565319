use std::sync::Arc;

use parking_lot::RwLock;

/// Shared holder for the session token returned by login.
///
/// Clones share the same slot, so the transport sees a token as soon as the
/// auth flow saves it.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

//! Session token store
//!
//! Opaque uuid tokens mapped to user ids with expiry. Invalidation is an
//! explicit call made by the API boundary (logout), never a hidden side
//! effect of some other operation.

use dashmap::DashMap;
use shared::util::now_millis;

use super::AuthError;

#[derive(Debug, Clone)]
struct SessionEntry {
    user_id: String,
    expires_at: i64,
}

/// Token -> session store
#[derive(Debug)]
pub struct SessionStore {
    entries: DashMap<String, SessionEntry>,
    ttl_ms: i64,
}

impl SessionStore {
    pub fn new(ttl_ms: i64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_ms,
        }
    }

    /// Issue an opaque session token for a user
    pub fn issue(&self, user_id: &str) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.entries.insert(
            token.clone(),
            SessionEntry {
                user_id: user_id.to_string(),
                expires_at: now_millis() + self.ttl_ms,
            },
        );
        token
    }

    /// Resolve a token to its user id
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let entry = match self.entries.get(token) {
            Some(guard) => guard.value().clone(),
            None => return Err(AuthError::SessionInvalid),
        };

        if now_millis() > entry.expires_at {
            self.entries.remove(token);
            return Err(AuthError::SessionExpired);
        }
        Ok(entry.user_id)
    }

    /// Invalidate a token (logout)
    pub fn invalidate(&self, token: &str) {
        self.entries.remove(token);
    }
}

//! OTP issuing and verification
//!
//! Codes are single-use and expire. Delivery is mocked: the caller logs
//! the code instead of handing it to an SMS gateway.

use dashmap::DashMap;
use shared::util::now_millis;

use super::AuthError;

#[derive(Debug, Clone)]
struct OtpEntry {
    code: String,
    expires_at: i64,
}

/// Phone -> pending OTP store
#[derive(Debug)]
pub struct OtpStore {
    entries: DashMap<String, OtpEntry>,
    ttl_ms: i64,
}

impl OtpStore {
    pub fn new(ttl_ms: i64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_ms,
        }
    }

    /// Issue a fresh 4-digit code for a phone, replacing any previous one
    pub fn issue(&self, phone: &str) -> String {
        use rand::Rng;
        let code = rand::thread_rng().gen_range(1000..10_000).to_string();
        self.entries.insert(
            phone.to_string(),
            OtpEntry {
                code: code.clone(),
                expires_at: now_millis() + self.ttl_ms,
            },
        );
        code
    }

    /// Verify and consume the code for a phone
    ///
    /// Expired and consumed entries are removed; a wrong guess leaves the
    /// code in place for another attempt.
    pub fn verify(&self, phone: &str, code: &str) -> Result<(), AuthError> {
        let entry = match self.entries.get(phone) {
            Some(guard) => guard.value().clone(),
            None => return Err(AuthError::OtpNotRequested),
        };

        if now_millis() > entry.expires_at {
            self.entries.remove(phone);
            return Err(AuthError::OtpExpired);
        }
        if entry.code != code {
            return Err(AuthError::OtpInvalid);
        }

        self.entries.remove(phone);
        Ok(())
    }
}

//! Identity mock (external collaborator)
//!
//! The production deployment delegates identity to an external provider;
//! this module is a local stand-in: user create-or-fetch, phone OTP with
//! logged delivery, opaque session tokens, and a card-form flag for
//! payment verification.

mod otp;
mod session;

pub use otp::OtpStore;
pub use session::SessionStore;

use thiserror::Error;

use crate::store::{LedgerStorage, StorageError};
use shared::models::{User, UserRole};
use shared::util::now_millis;

/// Seed account for the barman dashboard (demo data)
const BARMAN_EMAIL: &str = "barman@spontan.app";

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("No code was requested for this phone")]
    OtpNotRequested,

    #[error("Code has expired, request a new one")]
    OtpExpired,

    #[error("Incorrect code")]
    OtpInvalid,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session token")]
    SessionInvalid,
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Minimum number of characters for a phone number
const MIN_PHONE_LEN: usize = 9;

/// Identity service: user records + OTP + sessions
#[derive(Debug)]
pub struct AuthService {
    storage: LedgerStorage,
    otp: OtpStore,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(storage: LedgerStorage, otp_ttl_ms: i64, session_ttl_ms: i64) -> Self {
        Self {
            storage,
            otp: OtpStore::new(otp_ttl_ms),
            sessions: SessionStore::new(session_ttl_ms),
        }
    }

    /// Seed the demo barman account if it does not exist yet
    pub fn seed_barman(&self) -> AuthResult<()> {
        if self.storage.find_user_by_email(BARMAN_EMAIL)?.is_some() {
            return Ok(());
        }

        let now = now_millis();
        let barman = User {
            id: "barman-1".to_string(),
            name: Some("Alex Barman".to_string()),
            email: Some(BARMAN_EMAIL.to_string()),
            phone: Some("0700000000".to_string()),
            verified: true,
            role: UserRole::Barman,
            payment_verified: false,
            tokens: 0,
            created_at: now,
            updated_at: now,
        };

        let txn = self.storage.begin_write()?;
        self.storage.put_user(&txn, &barman)?;
        self.storage.index_user_email(&txn, BARMAN_EMAIL, &barman.id)?;
        self.storage.index_user_phone(&txn, "0700000000", &barman.id)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(user_id = %barman.id, "Seeded barman account");
        Ok(())
    }

    /// Create-or-fetch a user record
    ///
    /// Name and email are required; an existing email returns the stored
    /// record, otherwise a fresh unverified client with zero tokens is
    /// created.
    pub fn start(
        &self,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> AuthResult<User> {
        let (Some(name), Some(email)) = (
            name.filter(|n| !n.trim().is_empty()),
            email.filter(|e| !e.trim().is_empty()),
        ) else {
            return Err(AuthError::Validation(
                "Name and email are required".to_string(),
            ));
        };

        if let Some(existing) = self.storage.find_user_by_email(&email)? {
            return Ok(existing);
        }

        let now = now_millis();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: Some(name),
            email: Some(email.clone()),
            phone: phone.clone(),
            verified: false,
            role: UserRole::Client,
            payment_verified: false,
            tokens: 0,
            created_at: now,
            updated_at: now,
        };

        let txn = self.storage.begin_write()?;
        self.storage.put_user(&txn, &user)?;
        self.storage.index_user_email(&txn, &email, &user.id)?;
        if let Some(phone) = &phone {
            self.storage.index_user_phone(&txn, phone, &user.id)?;
        }
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Issue an OTP for a phone number
    ///
    /// Delivery is mocked: the code lands in the log instead of an SMS.
    pub fn send_otp(&self, phone: &str) -> AuthResult<()> {
        if phone.len() < MIN_PHONE_LEN {
            return Err(AuthError::Validation(
                "Phone number is too short".to_string(),
            ));
        }

        let code = self.otp.issue(phone);
        tracing::info!(phone, code, "OTP issued (mock SMS delivery)");
        Ok(())
    }

    /// Verify an OTP and open a session
    ///
    /// On success the code is consumed, the user is marked verified and an
    /// opaque session token is issued.
    pub fn verify_otp(&self, phone: &str, code: &str) -> AuthResult<(User, String)> {
        self.otp.verify(phone, code)?;

        let mut user = self
            .storage
            .find_user_by_phone(phone)?
            .ok_or_else(|| AuthError::UserNotFound(phone.to_string()))?;

        if !user.verified {
            user.verified = true;
            user.updated_at = now_millis();
            let txn = self.storage.begin_write()?;
            self.storage.put_user(&txn, &user)?;
            txn.commit().map_err(StorageError::from)?;
        }

        let token = self.sessions.issue(&user.id);
        tracing::info!(user_id = %user.id, "OTP verified, session opened");
        Ok((user, token))
    }

    /// Resolve a session token to its user
    pub fn verify_session(&self, token: &str) -> AuthResult<User> {
        let user_id = self.sessions.verify(token)?;
        self.storage
            .get_user(&user_id)?
            .ok_or(AuthError::UserNotFound(user_id))
    }

    /// Invalidate a session (logout)
    ///
    /// Explicit call from the API boundary; nothing else removes sessions
    /// as a side effect.
    pub fn logout(&self, token: &str) {
        self.sessions.invalidate(token);
    }

    /// Flag a user as payment-verified (mock card registration)
    pub fn mark_payment_verified(&self, user_id: &str) -> AuthResult<User> {
        let txn = self.storage.begin_write()?;
        let mut user = self
            .storage
            .get_user_txn(&txn, user_id)?
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))?;

        user.payment_verified = true;
        user.updated_at = now_millis();
        self.storage.put_user(&txn, &user)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(user)
    }

    /// Direct access to the OTP store (tests)
    #[cfg(test)]
    pub fn otp_store(&self) -> &OtpStore {
        &self.otp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        let storage = LedgerStorage::open_in_memory().unwrap();
        AuthService::new(storage, 5 * 60 * 1000, 60 * 60 * 1000)
    }

    #[test]
    fn test_start_requires_name_and_email() {
        let auth = service();

        assert!(matches!(
            auth.start(None, Some("a@b.ro".into()), None),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            auth.start(Some("Ana".into()), None, None),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            auth.start(Some("  ".into()), Some("a@b.ro".into()), None),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_start_creates_unverified_client() {
        let auth = service();

        let user = auth
            .start(Some("Ana".into()), Some("ana@example.com".into()), None)
            .unwrap();
        assert!(!user.verified);
        assert_eq!(user.role, UserRole::Client);
        assert_eq!(user.tokens, 0);
    }

    #[test]
    fn test_start_returns_existing_user_by_email() {
        let auth = service();

        let first = auth
            .start(Some("Ana".into()), Some("ana@example.com".into()), None)
            .unwrap();
        let second = auth
            .start(Some("Ana M".into()), Some("ana@example.com".into()), None)
            .unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_send_otp_rejects_short_phone() {
        let auth = service();
        assert!(matches!(
            auth.send_otp("07123"),
            Err(AuthError::Validation(_))
        ));
        auth.send_otp("0712345678").unwrap();
    }

    #[test]
    fn test_otp_flow_verifies_user_and_opens_session() {
        let auth = service();
        auth.start(
            Some("Ana".into()),
            Some("ana@example.com".into()),
            Some("0712345678".into()),
        )
        .unwrap();

        auth.send_otp("0712345678").unwrap();
        let code = auth.otp_store().issue("0712345678");

        let (user, token) = auth.verify_otp("0712345678", &code).unwrap();
        assert!(user.verified);

        let resolved = auth.verify_session(&token).unwrap();
        assert_eq!(resolved.id, user.id);

        auth.logout(&token);
        assert!(matches!(
            auth.verify_session(&token),
            Err(AuthError::SessionInvalid)
        ));
    }

    #[test]
    fn test_verify_otp_unknown_phone() {
        let auth = service();
        auth.send_otp("0799999999").unwrap();
        let code = auth.otp_store().issue("0799999999");

        // Code is right but no user carries this phone
        assert!(matches!(
            auth.verify_otp("0799999999", &code),
            Err(AuthError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_seed_barman_is_idempotent() {
        let auth = service();
        auth.seed_barman().unwrap();
        auth.seed_barman().unwrap();

        let barman = auth
            .storage
            .find_user_by_email(BARMAN_EMAIL)
            .unwrap()
            .unwrap();
        assert_eq!(barman.role, UserRole::Barman);
        assert!(barman.verified);
    }

    #[test]
    fn test_mark_payment_verified() {
        let auth = service();
        let user = auth
            .start(Some("Ana".into()), Some("ana@example.com".into()), None)
            .unwrap();

        let updated = auth.mark_payment_verified(&user.id).unwrap();
        assert!(updated.payment_verified);
        assert!(matches!(
            auth.mark_payment_verified("ghost"),
            Err(AuthError::UserNotFound(_))
        ));
    }
}

//! TokenLedger - balance authority
//!
//! Every mutation runs inside a single redb write transaction. redb
//! serializes write transactions, so read-check-write is atomic with
//! respect to concurrent debits and credits for the same user: two
//! concurrent debits of a balance-1 user commit in some order and the
//! second one is rejected.

use shared::models::{TokenPurchase, User, find_package};
use shared::util::now_millis;

use super::error::{TokenError, TokenResult};
use crate::store::{LedgerStorage, StorageError};

/// Token ledger over the shared storage
#[derive(Debug, Clone)]
pub struct TokenLedger {
    storage: LedgerStorage,
}

impl TokenLedger {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    /// Current balance for a user
    pub fn balance(&self, user_id: &str) -> TokenResult<u32> {
        let user = self.require_user(user_id)?;
        Ok(user.tokens)
    }

    /// Attempt to debit `amount` tokens from a user
    ///
    /// Rejects without applying anything when the balance is short; the
    /// balance is never clamped. Returns the updated balance on success.
    pub fn try_debit(&self, user_id: &str, amount: u32) -> TokenResult<u32> {
        let txn = self.storage.begin_write()?;
        let mut user = self
            .storage
            .get_user_txn(&txn, user_id)?
            .ok_or_else(|| TokenError::UserNotFound(user_id.to_string()))?;

        if user.tokens < amount {
            return Err(TokenError::InsufficientTokens {
                balance: user.tokens,
                requested: amount,
            });
        }

        user.tokens -= amount;
        user.updated_at = now_millis();
        self.storage.put_user(&txn, &user)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::debug!(user_id, amount, balance = user.tokens, "Tokens debited");
        Ok(user.tokens)
    }

    /// Apply a purchase credit for a fixed package
    ///
    /// Increases the balance by `tokens + bonus_tokens`, appends an
    /// immutable [`TokenPurchase`] entry and returns it. Unknown package
    /// ids are rejected before anything is written.
    pub fn credit(&self, user_id: &str, package_id: &str) -> TokenResult<TokenPurchase> {
        let package = find_package(package_id)
            .ok_or_else(|| TokenError::InvalidPackage(package_id.to_string()))?;

        let txn = self.storage.begin_write()?;
        let mut user = self
            .storage
            .get_user_txn(&txn, user_id)?
            .ok_or_else(|| TokenError::UserNotFound(user_id.to_string()))?;

        let now = now_millis();
        user.tokens += package.tokens + package.bonus_tokens;
        user.updated_at = now;

        let purchase = TokenPurchase {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            package_id: package.id.to_string(),
            amount: package.tokens,
            price: package.price,
            bonus_tokens: package.bonus_tokens,
            created_at: now,
        };

        let seq = self.storage.next_purchase_seq(&txn)?;
        self.storage.append_purchase(&txn, seq, &purchase)?;
        self.storage.put_user(&txn, &user)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            user_id,
            package_id,
            tokens = package.tokens,
            bonus = package.bonus_tokens,
            balance = user.tokens,
            "Tokens purchased"
        );
        Ok(purchase)
    }

    /// Purchase history for a user, in creation order
    ///
    /// Display ordering (newest first) is the API layer's concern.
    pub fn purchases(&self, user_id: &str) -> TokenResult<Vec<TokenPurchase>> {
        self.require_user(user_id)?;
        Ok(self.storage.purchases_for_user(user_id)?)
    }

    fn require_user(&self, user_id: &str) -> TokenResult<User> {
        self.storage
            .get_user(user_id)?
            .ok_or_else(|| TokenError::UserNotFound(user_id.to_string()))
    }
}

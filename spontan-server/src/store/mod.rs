//! redb-based storage layer for the ledgers
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `users` | `user_id` | `User` | User records (token balance lives here) |
//! | `user_email_idx` | `email` | `user_id` | Lookup for auth start |
//! | `user_phone_idx` | `phone` | `user_id` | Lookup for OTP verification |
//! | `orders` | `order_id` | `Order` | Full order history (never deleted) |
//! | `pickup_codes` | `code` | `order_id` | Claim index over non-terminal orders |
//! | `token_purchases` | `(user_id, seq)` | `TokenPurchase` | Purchase ledger (append-only) |
//! | `meta` | `&str` | `u64` | Purchase sequence counter |
//!
//! # Serialization point
//!
//! redb serializes write transactions, so every read-check-write that runs
//! inside a single transaction is atomic with respect to all other writers.
//! The ledgers rely on this for balance debits and status transitions.

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use shared::models::{Order, TokenPurchase, User};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for user records: key = user_id, value = JSON-serialized User
const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Table mapping email -> user_id
const USER_EMAIL_INDEX: TableDefinition<&str, &str> = TableDefinition::new("user_email_idx");

/// Table mapping phone -> user_id
const USER_PHONE_INDEX: TableDefinition<&str, &str> = TableDefinition::new("user_phone_idx");

/// Table for orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for pickup-code claims: key = code, value = order_id
/// 只索引未终结订单，终结时释放
const PICKUP_CODES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("pickup_codes");

/// Table for the purchase ledger: key = (user_id, seq), value = JSON-serialized TokenPurchase
const PURCHASES_TABLE: TableDefinition<(&str, u64), &[u8]> =
    TableDefinition::new("token_purchases");

/// Table for counters: key = "purchase_seq", value = u64
const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("meta");

const PURCHASE_SEQ_KEY: &str = "purchase_seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Ledger storage backed by redb
#[derive(Clone)]
pub struct LedgerStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for LedgerStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStorage").finish()
    }
}

impl LedgerStorage {
    /// Open or create the database at the given path
    ///
    /// redb commits are durable as soon as `commit()` returns and the file
    /// is always in a consistent state, so an unexpected shutdown can lose
    /// at most the in-flight transaction.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init_tables(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(db)
    }

    fn init_tables(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            // Create all tables if they don't exist
            let _ = write_txn.open_table(USERS_TABLE)?;
            let _ = write_txn.open_table(USER_EMAIL_INDEX)?;
            let _ = write_txn.open_table(USER_PHONE_INDEX)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(PICKUP_CODES_TABLE)?;
            let _ = write_txn.open_table(PURCHASES_TABLE)?;

            // Initialize the purchase sequence if not present
            let mut meta_table = write_txn.open_table(META_TABLE)?;
            if meta_table.get(PURCHASE_SEQ_KEY)?.is_none() {
                meta_table.insert(PURCHASE_SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== User Operations ==========

    /// Store a user (within transaction)
    pub fn put_user(&self, txn: &WriteTransaction, user: &User) -> StorageResult<()> {
        let mut table = txn.open_table(USERS_TABLE)?;
        let value = serde_json::to_vec(user)?;
        table.insert(user.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get a user by id (read-only)
    pub fn get_user(&self, user_id: &str) -> StorageResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS_TABLE)?;

        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a user by id (within transaction)
    pub fn get_user_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
    ) -> StorageResult<Option<User>> {
        let table = txn.open_table(USERS_TABLE)?;

        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Register the email -> user_id index entry (within transaction)
    pub fn index_user_email(
        &self,
        txn: &WriteTransaction,
        email: &str,
        user_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(USER_EMAIL_INDEX)?;
        table.insert(email, user_id)?;
        Ok(())
    }

    /// Register the phone -> user_id index entry (within transaction)
    pub fn index_user_phone(
        &self,
        txn: &WriteTransaction,
        phone: &str,
        user_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(USER_PHONE_INDEX)?;
        table.insert(phone, user_id)?;
        Ok(())
    }

    /// Find a user by email
    pub fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(USER_EMAIL_INDEX)?;

        let user_id = match index.get(email)? {
            Some(guard) => guard.value().to_string(),
            None => return Ok(None),
        };
        let table = read_txn.open_table(USERS_TABLE)?;
        match table.get(user_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Find a user by phone
    pub fn find_user_by_phone(&self, phone: &str) -> StorageResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(USER_PHONE_INDEX)?;

        let user_id = match index.get(phone)? {
            Some(guard) => guard.value().to_string(),
            None => return Ok(None),
        };
        let table = read_txn.open_table(USERS_TABLE)?;
        match table.get(user_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    // ========== Order Operations ==========

    /// Store an order (within transaction)
    pub fn put_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get an order by id (read-only)
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by id (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get all orders
    pub fn list_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            orders.push(order);
        }

        Ok(orders)
    }

    // ========== Pickup Code Claims ==========

    /// Claim a pickup code for an order (within transaction)
    ///
    /// Returns `false` if the code is already claimed by a non-terminal
    /// order; the caller generates a new code and retries.
    pub fn claim_pickup_code(
        &self,
        txn: &WriteTransaction,
        code: &str,
        order_id: &str,
    ) -> StorageResult<bool> {
        let mut table = txn.open_table(PICKUP_CODES_TABLE)?;
        if table.get(code)?.is_some() {
            return Ok(false);
        }
        table.insert(code, order_id)?;
        Ok(true)
    }

    /// Release a pickup-code claim (within transaction)
    ///
    /// Called when the order reaches a terminal status.
    pub fn release_pickup_code(&self, txn: &WriteTransaction, code: &str) -> StorageResult<()> {
        let mut table = txn.open_table(PICKUP_CODES_TABLE)?;
        table.remove(code)?;
        Ok(())
    }

    /// Resolve a pickup code to the claiming order id
    ///
    /// Only non-terminal orders hold claims, so a hit is always an order
    /// that is still in flight.
    pub fn order_id_for_pickup_code(&self, code: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PICKUP_CODES_TABLE)?;
        Ok(table.get(code)?.map(|guard| guard.value().to_string()))
    }

    // ========== Purchase Ledger ==========

    /// Increment and return the purchase sequence number (within transaction)
    pub fn next_purchase_seq(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut table = txn.open_table(META_TABLE)?;
        let current = table
            .get(PURCHASE_SEQ_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(PURCHASE_SEQ_KEY, next)?;
        Ok(next)
    }

    /// Append a purchase record (within transaction)
    pub fn append_purchase(
        &self,
        txn: &WriteTransaction,
        seq: u64,
        purchase: &TokenPurchase,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PURCHASES_TABLE)?;
        let key = (purchase.user_id.as_str(), seq);
        let value = serde_json::to_vec(purchase)?;
        table.insert(key, value.as_slice())?;
        Ok(())
    }

    /// Get all purchases for a user, in creation order
    pub fn purchases_for_user(&self, user_id: &str) -> StorageResult<Vec<TokenPurchase>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PURCHASES_TABLE)?;

        let mut purchases = Vec::new();
        let range_start = (user_id, 0u64);
        let range_end = (user_id, u64::MAX);

        for result in table.range(range_start..=range_end)? {
            let (_key, value) = result?;
            let purchase: TokenPurchase = serde_json::from_slice(value.value())?;
            purchases.push(purchase);
        }

        Ok(purchases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderOptions, OrderStatus, UserRole};
    use shared::util::now_millis;

    fn make_user(id: &str, tokens: u32) -> User {
        User {
            id: id.to_string(),
            name: Some("Test User".to_string()),
            email: Some(format!("{id}@example.com")),
            phone: None,
            verified: false,
            role: UserRole::Client,
            payment_verified: false,
            tokens,
            created_at: now_millis(),
            updated_at: now_millis(),
        }
    }

    fn make_order(id: &str, user_id: &str, code: &str) -> Order {
        Order {
            id: id.to_string(),
            user_id: user_id.to_string(),
            drink: "Mojito".to_string(),
            options: OrderOptions::default(),
            status: OrderStatus::Pending,
            pickup_code: code.to_string(),
            created_at: now_millis(),
            updated_at: now_millis(),
        }
    }

    fn make_purchase(user_id: &str, package_id: &str, amount: u32) -> TokenPurchase {
        TokenPurchase {
            id: format!("purchase-{package_id}"),
            user_id: user_id.to_string(),
            package_id: package_id.to_string(),
            amount,
            price: amount,
            bonus_tokens: 0,
            created_at: now_millis(),
        }
    }

    #[test]
    fn test_user_roundtrip_and_indexes() {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let user = make_user("user-1", 10);

        let txn = storage.begin_write().unwrap();
        storage.put_user(&txn, &user).unwrap();
        storage
            .index_user_email(&txn, "user-1@example.com", &user.id)
            .unwrap();
        storage.index_user_phone(&txn, "0712345678", &user.id).unwrap();
        txn.commit().unwrap();

        let by_id = storage.get_user("user-1").unwrap().unwrap();
        assert_eq!(by_id.tokens, 10);

        let by_email = storage.find_user_by_email("user-1@example.com").unwrap();
        assert_eq!(by_email.unwrap().id, "user-1");

        let by_phone = storage.find_user_by_phone("0712345678").unwrap();
        assert_eq!(by_phone.unwrap().id, "user-1");

        assert!(storage.get_user("missing").unwrap().is_none());
        assert!(storage.find_user_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_order_roundtrip_and_list() {
        let storage = LedgerStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.put_order(&txn, &make_order("order-1", "user-1", "AAAAAA")).unwrap();
        storage.put_order(&txn, &make_order("order-2", "user-2", "BBBBBB")).unwrap();
        txn.commit().unwrap();

        let order = storage.get_order("order-1").unwrap().unwrap();
        assert_eq!(order.drink, "Mojito");
        assert_eq!(order.status, OrderStatus::Pending);

        let all = storage.list_orders().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_pickup_code_claims() {
        let storage = LedgerStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        assert!(storage.claim_pickup_code(&txn, "ABC123", "order-1").unwrap());
        // Second claim of the same code must be refused
        assert!(!storage.claim_pickup_code(&txn, "ABC123", "order-2").unwrap());
        txn.commit().unwrap();

        assert_eq!(
            storage.order_id_for_pickup_code("ABC123").unwrap().as_deref(),
            Some("order-1")
        );

        let txn = storage.begin_write().unwrap();
        storage.release_pickup_code(&txn, "ABC123").unwrap();
        txn.commit().unwrap();

        assert!(storage.order_id_for_pickup_code("ABC123").unwrap().is_none());

        // Released codes can be claimed again
        let txn = storage.begin_write().unwrap();
        assert!(storage.claim_pickup_code(&txn, "ABC123", "order-3").unwrap());
        txn.commit().unwrap();
    }

    #[test]
    fn test_purchase_ledger_is_ordered_per_user() {
        let storage = LedgerStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        for (pkg, amount) in [("50", 50), ("100", 100), ("500", 500)] {
            let seq = storage.next_purchase_seq(&txn).unwrap();
            storage
                .append_purchase(&txn, seq, &make_purchase("user-1", pkg, amount))
                .unwrap();
        }
        let seq = storage.next_purchase_seq(&txn).unwrap();
        storage
            .append_purchase(&txn, seq, &make_purchase("user-2", "300", 300))
            .unwrap();
        txn.commit().unwrap();

        let purchases = storage.purchases_for_user("user-1").unwrap();
        assert_eq!(purchases.len(), 3);
        let packages: Vec<&str> = purchases.iter().map(|p| p.package_id.as_str()).collect();
        assert_eq!(packages, vec!["50", "100", "500"]);

        assert_eq!(storage.purchases_for_user("user-2").unwrap().len(), 1);
        assert!(storage.purchases_for_user("user-3").unwrap().is_empty());
    }

    #[test]
    fn test_purchase_seq_increments() {
        let storage = LedgerStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.next_purchase_seq(&txn).unwrap(), 1);
        assert_eq!(storage.next_purchase_seq(&txn).unwrap(), 2);
        txn.commit().unwrap();
    }
}

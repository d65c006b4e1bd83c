//! OrderLedger - order lifecycle authority
//!
//! # Create Flow
//!
//! ```text
//! create(user_id, drink, options)
//!     ├─ 1. TokenLedger::try_debit(user_id, 1)   (own transaction)
//!     ├─ 2. Begin write transaction
//!     ├─ 3. Claim a unique pickup code
//!     ├─ 4. Persist the pending order
//!     └─ 5. Commit
//! ```
//!
//! The debit commits strictly before the order is minted. A crash between
//! the two loses the debited token. There is no compensating credit, so
//! the failure mode is a lost token, never a double spend.
//!
//! Status transitions validate against the table inside the transaction
//! that commits the new status, so two racing transitions serialize and
//! the loser is rejected with `InvalidTransition`.

use std::sync::Arc;

use shared::models::{Order, OrderOptions, OrderStatus};
use shared::util::{now_millis, pickup_code};

use super::error::{OrderError, OrderResult};
use crate::store::{LedgerStorage, StorageError};
use crate::tokens::TokenLedger;

/// Tokens debited per order
const ORDER_COST_TOKENS: u32 = 1;

/// Order ledger over the shared storage
#[derive(Debug, Clone)]
pub struct OrderLedger {
    storage: LedgerStorage,
    tokens: Arc<TokenLedger>,
}

impl OrderLedger {
    pub fn new(storage: LedgerStorage, tokens: Arc<TokenLedger>) -> Self {
        Self { storage, tokens }
    }

    /// Create a new order for a user
    ///
    /// Debits one token first; only a committed debit mints an order. The
    /// order starts `pending` with a freshly claimed pickup code, unique
    /// among non-terminal orders.
    pub fn create(
        &self,
        user_id: &str,
        drink: &str,
        options: OrderOptions,
    ) -> OrderResult<Order> {
        self.tokens.try_debit(user_id, ORDER_COST_TOKENS)?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = now_millis();

        let txn = self.storage.begin_write()?;
        let code = loop {
            let candidate = pickup_code();
            if self.storage.claim_pickup_code(&txn, &candidate, &id)? {
                break candidate;
            }
            // Claimed by another open order, roll the dice again
        };

        let order = Order {
            id,
            user_id: user_id.to_string(),
            drink: drink.to_string(),
            options,
            status: OrderStatus::Pending,
            pickup_code: code,
            created_at: now,
            updated_at: now,
        };
        self.storage.put_order(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(order_id = %order.id, user_id, drink, "Order created");
        Ok(order)
    }

    /// Get an order by id
    pub fn get(&self, order_id: &str) -> OrderResult<Order> {
        self.storage
            .get_order(order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// Apply a status transition
    ///
    /// Rejects anything the transition table does not allow, including any
    /// move out of a terminal status. Terminal transitions release the
    /// pickup-code claim.
    pub fn transition(&self, order_id: &str, to: OrderStatus) -> OrderResult<Order> {
        let txn = self.storage.begin_write()?;
        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        let from = order.status;
        if !from.can_transition_to(to) {
            return Err(OrderError::InvalidTransition { from, to });
        }

        order.status = to;
        order.updated_at = now_millis();
        self.storage.put_order(&txn, &order)?;
        if to.is_terminal() {
            self.storage.release_pickup_code(&txn, &order.pickup_code)?;
        }
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(order_id, %from, %to, "Order status updated");
        Ok(order)
    }

    /// Verify a presented pickup code
    ///
    /// Exact, case-sensitive match against orders in `ready` status.
    /// Anything else (unknown code, order not yet ready) is a mismatch.
    /// Verification does not change state; staff confirm the handover with
    /// a separate `transition(id, picked)`, so the UI can show feedback
    /// before committing.
    pub fn verify_pickup(&self, presented_code: &str) -> OrderResult<Order> {
        let order_id = self
            .storage
            .order_id_for_pickup_code(presented_code)?
            .ok_or(OrderError::CodeMismatch)?;
        let order = self
            .storage
            .get_order(&order_id)?
            .ok_or(OrderError::CodeMismatch)?;

        if order.status != OrderStatus::Ready || order.pickup_code != presented_code {
            return Err(OrderError::CodeMismatch);
        }
        Ok(order)
    }

    /// List orders, optionally filtered by status set and user
    ///
    /// The ledger returns them unordered; display ordering is the
    /// caller's concern.
    pub fn list(
        &self,
        statuses: Option<&[OrderStatus]>,
        user_id: Option<&str>,
    ) -> OrderResult<Vec<Order>> {
        let orders = self.storage.list_orders()?;
        Ok(orders
            .into_iter()
            .filter(|o| statuses.is_none_or(|s| s.contains(&o.status)))
            .filter(|o| user_id.is_none_or(|u| o.user_id == u))
            .collect())
    }
}

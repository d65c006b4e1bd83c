//! Order ledger
//!
//! Owns the order state machine: enforces legal status transitions,
//! issues and verifies pickup codes. Order creation consults the token
//! ledger first; no order is minted without a committed debit.

mod error;
mod ledger;

pub use error::{OrderError, OrderResult};
pub use ledger::OrderLedger;

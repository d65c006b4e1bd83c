//! User Model

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Ordering customer
    #[default]
    Client,
    /// Staff account driving order fulfilment
    Barman,
}

/// User entity
///
/// `tokens` is the sole balance field and is mutated only by the token
/// ledger. `email` and `phone` stay `None` until the corresponding auth
/// step has provided them; `verified` flips on successful OTP
/// verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub verified: bool,
    pub role: UserRole,
    #[serde(default)]
    pub payment_verified: bool,
    /// Token balance, non-negative by construction
    pub tokens: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    /// Whether this account may drive order status transitions
    pub fn is_barman(&self) -> bool {
        self.role == UserRole::Barman
    }
}

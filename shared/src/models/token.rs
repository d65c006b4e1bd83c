//! Token purchase model and the fixed package price list

use serde::{Deserialize, Serialize};

/// Record of a completed token purchase
///
/// Append-only ledger entry, immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPurchase {
    pub id: String,
    pub user_id: String,
    pub package_id: String,
    /// Tokens bought (bonus excluded)
    pub amount: u32,
    /// Price paid, in whole currency units
    pub price: u32,
    /// Extra tokens granted on top of `amount`
    pub bonus_tokens: u32,
    pub created_at: i64,
}

/// A purchasable token package
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TokenPackage {
    pub id: &'static str,
    pub tokens: u32,
    pub price: u32,
    pub bonus_tokens: u32,
}

/// Fixed package price list
///
/// The 500 package carries a 25-token bonus.
pub const TOKEN_PACKAGES: &[TokenPackage] = &[
    TokenPackage { id: "50", tokens: 50, price: 50, bonus_tokens: 0 },
    TokenPackage { id: "100", tokens: 100, price: 100, bonus_tokens: 0 },
    TokenPackage { id: "300", tokens: 300, price: 300, bonus_tokens: 0 },
    TokenPackage { id: "500", tokens: 500, price: 500, bonus_tokens: 25 },
];

/// Look up a package by id
pub fn find_package(id: &str) -> Option<&'static TokenPackage> {
    TOKEN_PACKAGES.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_package() {
        let pkg = find_package("500").unwrap();
        assert_eq!(pkg.tokens, 500);
        assert_eq!(pkg.bonus_tokens, 25);

        assert!(find_package("50").is_some());
        assert!(find_package("999").is_none());
        assert!(find_package("").is_none());
    }

    #[test]
    fn test_only_the_large_package_has_a_bonus() {
        for pkg in TOKEN_PACKAGES {
            if pkg.id == "500" {
                assert_eq!(pkg.bonus_tokens, 25);
            } else {
                assert_eq!(pkg.bonus_tokens, 0);
            }
        }
    }
}

//! Domain models shared between server and clients

pub mod order;
pub mod token;
pub mod user;

pub use order::{DrinkSize, DrinkStrength, Order, OrderOptions, OrderStatus};
pub use token::{TOKEN_PACKAGES, TokenPackage, TokenPurchase, find_package};
pub use user::{User, UserRole};

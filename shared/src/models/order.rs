//! Order model and the status state machine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Options
// ============================================================================

/// Drink size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DrinkSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Drink strength
///
/// Unset on an order means the customer did not ask; there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkStrength {
    Light,
    Normal,
    Strong,
}

/// Options attached to an order
///
/// Closed record with explicit defaults: medium size, ice on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderOptions {
    #[serde(default)]
    pub size: DrinkSize,
    #[serde(default = "default_ice")]
    pub ice: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<DrinkStrength>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
}

fn default_ice() -> bool {
    true
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self {
            size: DrinkSize::Medium,
            ice: true,
            strength: None,
            extras: Vec::new(),
        }
    }
}

// ============================================================================
// Status
// ============================================================================

/// Order lifecycle status
///
/// `picked` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Picked,
    Cancelled,
}

impl OrderStatus {
    /// Statuses directly reachable from `self`
    ///
    /// | From | To allowed |
    /// |------|------------|
    /// | pending | preparing, cancelled |
    /// | preparing | ready, cancelled |
    /// | ready | picked, cancelled |
    /// | picked | (none) |
    /// | cancelled | (none) |
    pub fn allowed_transitions(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Preparing, OrderStatus::Cancelled],
            OrderStatus::Preparing => &[OrderStatus::Ready, OrderStatus::Cancelled],
            OrderStatus::Ready => &[OrderStatus::Picked, OrderStatus::Cancelled],
            OrderStatus::Picked | OrderStatus::Cancelled => &[],
        }
    }

    /// Whether a direct transition to `to` is legal. No skipping: only
    /// statuses listed in the table are reachable.
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Terminal statuses accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Picked | OrderStatus::Cancelled)
    }

    /// Wire name, matching the serde representation
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Picked => "picked",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "picked" => Ok(Self::Picked),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

// ============================================================================
// Order
// ============================================================================

/// Order entity
///
/// `pickup_code` is assigned exactly once at creation and never changes.
/// Orders are never physically deleted; terminal orders stay around for
/// the history view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub drink: String,
    pub options: OrderOptions,
    pub status: OrderStatus,
    pub pickup_code: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(Preparing));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Preparing.can_transition_to(Cancelled));
        assert!(Ready.can_transition_to(Picked));
        assert!(Ready.can_transition_to(Cancelled));

        // No skipping
        assert!(!Pending.can_transition_to(Ready));
        assert!(!Pending.can_transition_to(Picked));
        assert!(!Preparing.can_transition_to(Picked));

        // No self transitions
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Ready.can_transition_to(Ready));

        // No going backwards
        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Preparing.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        use OrderStatus::*;

        for terminal in [Picked, Cancelled] {
            assert!(terminal.is_terminal());
            for to in [Pending, Preparing, Ready, Picked, Cancelled] {
                assert!(!terminal.can_transition_to(to));
            }
        }
        assert!(!Pending.is_terminal());
        assert!(!Preparing.is_terminal());
        assert!(!Ready.is_terminal());
    }

    #[test]
    fn test_status_string_roundtrip() {
        use OrderStatus::*;

        for status in [Pending, Preparing, Ready, Picked, Cancelled] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("unknown".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_options_defaults() {
        let options = OrderOptions::default();
        assert_eq!(options.size, DrinkSize::Medium);
        assert!(options.ice);
        assert!(options.strength.is_none());
        assert!(options.extras.is_empty());
    }
}

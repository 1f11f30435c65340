//! Order lifecycle.
//!
//! ```text
//! pending ─► confirmed ─► preparing ─► ready ─► completed
//!    │           │
//!    └─────┬─────┘
//!          ▼
//!      cancelled
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// The single forward successor on the happy path.
    pub fn successor(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn can_cancel(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    pub fn can_move_to(self, to: OrderStatus) -> bool {
        match to {
            OrderStatus::Cancelled => self.can_cancel(),
            _ => self.successor() == Some(to),
        }
    }

    pub fn apply(self, transition: &Transition) -> Result<OrderStatus, TransitionError> {
        let to = transition.target();
        if self.can_move_to(to) {
            Ok(to)
        } else {
            Err(TransitionError { from: self, to })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to move an order one step along its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transition {
    Accept,
    StartPreparing,
    MarkReady,
    Complete,
    Cancel { reason: Option<String> },
}

impl Transition {
    pub fn target(&self) -> OrderStatus {
        match self {
            Transition::Accept => OrderStatus::Confirmed,
            Transition::StartPreparing => OrderStatus::Preparing,
            Transition::MarkReady => OrderStatus::Ready,
            Transition::Complete => OrderStatus::Completed,
            Transition::Cancel { .. } => OrderStatus::Cancelled,
        }
    }

    pub fn is_cancel(&self) -> bool {
        matches!(self, Transition::Cancel { .. })
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Transition::Accept => "accept",
            Transition::StartPreparing => "start preparing",
            Transition::MarkReady => "mark ready",
            Transition::Complete => "complete",
            Transition::Cancel { .. } => "cancel",
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot move order from {from} to {to}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Counter-side view of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupStatus {
    Waiting,
    Ready,
    Collected,
}

impl PickupStatus {
    /// Pickup trails the order by one step: it only turns ready once the
    /// kitchen is done and collected once the order completes. Cancelled
    /// orders have no pickup status.
    pub fn for_order(status: OrderStatus) -> Option<PickupStatus> {
        match status {
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Preparing => {
                Some(PickupStatus::Waiting)
            }
            OrderStatus::Ready => Some(PickupStatus::Ready),
            OrderStatus::Completed => Some(PickupStatus::Collected),
            OrderStatus::Cancelled => None,
        }
    }
}

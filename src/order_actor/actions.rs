use chrono::{DateTime, Utc};

use crate::ordering::{OrderStatus, Transition};

/// Custom actions for orders. Status is the only thing that moves after checkout.
#[derive(Debug, Clone)]
pub enum OrderAction {
    Transition {
        transition: Transition,
        at: DateTime<Utc>,
    },
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    Transition { from: OrderStatus, to: OrderStatus },
}

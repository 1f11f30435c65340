use chrono::{DateTime, Utc};

use crate::domain::{NotificationCreate, NotificationKind, Order, Recipient};
use crate::ordering::OrderStatus;

/// Order lifecycle moments that fan out to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    Created,
    Accepted,
    Ready,
    Collected,
    Cancelled,
}

impl OrderEvent {
    /// Event raised by entering `status`. Starting preparation is silent.
    pub fn for_status(status: OrderStatus) -> Option<OrderEvent> {
        match status {
            OrderStatus::Pending => Some(OrderEvent::Created),
            OrderStatus::Confirmed => Some(OrderEvent::Accepted),
            OrderStatus::Preparing => None,
            OrderStatus::Ready => Some(OrderEvent::Ready),
            OrderStatus::Completed => Some(OrderEvent::Collected),
            OrderStatus::Cancelled => Some(OrderEvent::Cancelled),
        }
    }
}

/// What an observer gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct EventContext<'a> {
    pub event: OrderEvent,
    pub order: &'a Order,
    pub queue_number: Option<u32>,
    pub at: DateTime<Utc>,
}

impl EventContext<'_> {
    fn notice(&self, recipient: Recipient, kind: NotificationKind, message: String) -> NotificationCreate {
        NotificationCreate {
            recipient,
            kind,
            order_id: self.order.id.clone(),
            message,
            created_at: self.at,
        }
    }

    fn queue_label(&self) -> String {
        self.queue_number
            .map(|number| format!(" (queue #{number})"))
            .unwrap_or_default()
    }
}

/// Turns an order event into zero or more notifications.
pub trait OrderObserver: Send + Sync {
    fn name(&self) -> &'static str;
    fn notices(&self, ctx: &EventContext<'_>) -> Vec<NotificationCreate>;
}

/// Keeps the ordering customer informed of every step.
#[derive(Debug, Default)]
pub struct CustomerObserver;

impl OrderObserver for CustomerObserver {
    fn name(&self) -> &'static str {
        "customer"
    }

    fn notices(&self, ctx: &EventContext<'_>) -> Vec<NotificationCreate> {
        let order = ctx.order;
        let (kind, message) = match ctx.event {
            OrderEvent::Created => (
                NotificationKind::OrderPlaced,
                format!("Order {} placed{}, total {}", order.id, ctx.queue_label(), order.total),
            ),
            OrderEvent::Accepted => (
                NotificationKind::OrderAccepted,
                format!("Order {} was accepted by the vendor", order.id),
            ),
            OrderEvent::Ready => (
                NotificationKind::OrderReady,
                format!("Order {} is ready for pickup{}", order.id, ctx.queue_label()),
            ),
            OrderEvent::Collected => (
                NotificationKind::OrderCollected,
                format!("Order {} was collected. Enjoy your meal!", order.id),
            ),
            OrderEvent::Cancelled => (
                NotificationKind::OrderCancelled,
                match &order.cancellation_reason {
                    Some(reason) => format!("Order {} was cancelled: {reason}", order.id),
                    None => format!("Order {} was cancelled", order.id),
                },
            ),
        };
        vec![ctx.notice(Recipient::Customer(order.user_id.clone()), kind, message)]
    }
}

/// Tells the vendor about new and cancelled orders.
#[derive(Debug, Default)]
pub struct VendorObserver;

impl OrderObserver for VendorObserver {
    fn name(&self) -> &'static str {
        "vendor"
    }

    fn notices(&self, ctx: &EventContext<'_>) -> Vec<NotificationCreate> {
        let order = ctx.order;
        let recipient = Recipient::Vendor(order.vendor_id.clone());
        match ctx.event {
            OrderEvent::Created => {
                let count: u32 = order.items.iter().map(|item| item.quantity).sum();
                vec![ctx.notice(
                    recipient,
                    NotificationKind::OrderReceived,
                    format!("New order {}{}: {count} item(s)", order.id, ctx.queue_label()),
                )]
            }
            OrderEvent::Cancelled => vec![ctx.notice(
                recipient,
                NotificationKind::OrderCancelled,
                format!("Order {} was cancelled", order.id),
            )],
            _ => Vec::new(),
        }
    }
}

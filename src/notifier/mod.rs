//! Fan-out of order events to a fixed, ordered list of observers.

pub mod observers;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::clients::NotificationClient;
use crate::domain::Order;
use crate::notification_actor::NotificationError;

pub use observers::*;

#[derive(Clone)]
pub struct Notifier {
    observers: Vec<Arc<dyn OrderObserver>>,
    notifications: NotificationClient,
}

impl Notifier {
    /// Customer first, then vendor.
    pub fn new(notifications: NotificationClient) -> Self {
        Self::with_observers(
            notifications,
            vec![Arc::new(CustomerObserver), Arc::new(VendorObserver)],
        )
    }

    pub fn with_observers(notifications: NotificationClient, observers: Vec<Arc<dyn OrderObserver>>) -> Self {
        Self {
            observers,
            notifications,
        }
    }

    /// Runs every observer in order and stores their notices one by one.
    /// The first failed insert aborts the fan-out.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn publish(
        &self,
        event: OrderEvent,
        order: &Order,
        queue_number: Option<u32>,
        at: DateTime<Utc>,
    ) -> Result<Vec<String>, NotificationError> {
        let ctx = EventContext {
            event,
            order,
            queue_number,
            at,
        };
        let mut created = Vec::new();
        for observer in &self.observers {
            for notice in observer.notices(&ctx) {
                debug!(observer = observer.name(), kind = ?notice.kind, "Delivering notice");
                created.push(self.notifications.create_notification(notice).await?);
            }
        }
        Ok(created)
    }
}

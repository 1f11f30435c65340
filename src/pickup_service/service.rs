use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::error::PickupError;
use super::messages::{PickupRequest, ServiceResponse};
use crate::clients::PickupClient;
use crate::domain::Pickup;
use crate::ordering::{OrderStatus, PickupStatus, QueueBook};

/// Owns the pickup records and the per-vendor daily counters.
///
/// Counters are kept for every day seen, so a late request stamped with an
/// earlier day continues that day's numbering.
pub struct PickupService {
    receiver: mpsc::Receiver<PickupRequest>,
    utc_offset: FixedOffset,
    pickups: HashMap<String, Pickup>,
    book: QueueBook,
}

impl PickupService {
    pub fn new(buffer_size: usize, utc_offset: FixedOffset) -> (Self, PickupClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            utc_offset,
            pickups: HashMap::new(),
            book: QueueBook::new(),
        };
        (service, PickupClient::new(sender))
    }

    #[instrument(name = "pickup_service", skip(self))]
    pub async fn run(mut self) {
        info!("PickupService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                PickupRequest::Assign {
                    order_id,
                    vendor_id,
                    at,
                    respond_to,
                } => {
                    let _ = respond_to.send(Ok(self.handle_assign(order_id, vendor_id, at)));
                }
                PickupRequest::Get { order_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.pickups.get(&order_id).cloned()));
                }
                PickupRequest::Advance {
                    order_id,
                    status,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_advance(order_id, status));
                }
                PickupRequest::ActiveQueue { vendor_id, respond_to } => {
                    self.handle_active_queue(vendor_id, respond_to);
                }
                PickupRequest::Shutdown => {
                    info!("PickupService shutting down");
                    break;
                }
            }
        }
        info!("PickupService stopped");
    }

    fn local_day(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.utc_offset).date_naive()
    }

    #[instrument(skip(self))]
    fn handle_assign(&mut self, order_id: String, vendor_id: String, at: DateTime<Utc>) -> Pickup {
        if let Some(existing) = self.pickups.get(&order_id) {
            debug!(queue_number = existing.queue_number, "Pickup already assigned");
            return existing.clone();
        }

        let day = self.local_day(at);
        let queue_number = self.book.next_number(&vendor_id, day);
        let pickup = Pickup {
            order_id: order_id.clone(),
            vendor_id,
            queue_number,
            queue_date: day,
            status: PickupStatus::Waiting,
            withdrawn: false,
            assigned_at: at,
        };
        info!(queue_number, %day, "Pickup assigned");
        self.pickups.insert(order_id, pickup.clone());
        pickup
    }

    #[instrument(skip(self))]
    fn handle_advance(&mut self, order_id: String, status: OrderStatus) -> Result<Pickup, PickupError> {
        let pickup = self
            .pickups
            .get_mut(&order_id)
            .ok_or_else(|| PickupError::NotFound(order_id.clone()))?;

        match PickupStatus::for_order(status) {
            Some(_) if pickup.withdrawn => {
                warn!("Advance on withdrawn pickup");
                return Err(PickupError::Withdrawn(order_id));
            }
            Some(next) => pickup.status = next,
            None => pickup.withdrawn = true,
        }
        debug!(pickup_status = ?pickup.status, withdrawn = pickup.withdrawn, "Pickup advanced");
        Ok(pickup.clone())
    }

    #[instrument(skip(self, respond_to))]
    fn handle_active_queue(&self, vendor_id: String, respond_to: ServiceResponse<Vec<Pickup>, PickupError>) {
        let mut queue: Vec<Pickup> = self
            .pickups
            .values()
            .filter(|pickup| pickup.vendor_id == vendor_id && pickup.is_active())
            .cloned()
            .collect();
        queue.sort_by_key(|pickup| (pickup.queue_date, pickup.queue_number));
        debug!(waiting = queue.len(), "Active queue listed");
        let _ = respond_to.send(Ok(queue));
    }
}

use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::Pickup;
use crate::ordering::OrderStatus;
use crate::pickup_service::{PickupError, PickupRequest};
use chrono::{DateTime, Utc};

#[derive(Clone)]
pub struct PickupClient {
    sender: mpsc::Sender<PickupRequest>,
}

impl PickupClient {
    pub fn new(sender: mpsc::Sender<PickupRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), PickupError> {
        debug!("Sending request");
        self.sender
            .send(PickupRequest::Shutdown)
            .await
            .map_err(|_| PickupError::ActorCommunicationError("Actor closed".to_string()))
    }
}

crate::client_method!(PickupClient => fn assign(order_id: String, vendor_id: String, at: DateTime<Utc>) -> Pickup as PickupRequest::Assign, Error = PickupError);
crate::client_method!(PickupClient => fn get(order_id: String) -> Option<Pickup> as PickupRequest::Get, Error = PickupError);
crate::client_method!(PickupClient => fn advance(order_id: String, status: OrderStatus) -> Pickup as PickupRequest::Advance, Error = PickupError);
crate::client_method!(PickupClient => fn active_queue(vendor_id: String) -> Vec<Pickup> as PickupRequest::ActiveQueue, Error = PickupError);

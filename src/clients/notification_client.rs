use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Notification, NotificationCreate, Recipient};
use crate::notification_actor::{NotificationAction, NotificationError};

#[derive(Clone)]
pub struct NotificationClient {
    inner: ResourceClient<Notification>,
}

crate::impl_basic_client!(NotificationClient, Notification, NotificationError, notification);

impl NotificationClient {
    #[instrument(skip(self, params), fields(order_id = %params.order_id, kind = ?params.kind))]
    pub async fn create_notification(&self, params: NotificationCreate) -> Result<String, NotificationError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(|e| e.into_domain())
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn list_for(&self, recipient: Recipient) -> Result<Vec<Notification>, NotificationError> {
        debug!("Sending request");
        let mut mine: Vec<Notification> = self
            .inner
            .list()
            .await
            .map_err(|e| e.into_domain())?
            .into_iter()
            .filter(|notification| notification.recipient == recipient)
            .collect();
        mine.reverse();
        Ok(mine)
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, recipient: Recipient) -> Result<usize, NotificationError> {
        let mine = self.list_for(recipient).await?;
        Ok(mine.iter().filter(|notification| !notification.is_read()).count())
    }

    /// `false` when it was already read.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: String, at: DateTime<Utc>) -> Result<bool, NotificationError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, NotificationAction::MarkRead { at })
            .await
            .map_err(|e| e.into_domain())
    }
}

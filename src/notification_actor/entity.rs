use crate::actor_framework::Entity;
use crate::domain::{Notification, NotificationCreate};

use super::actions::NotificationAction;
use super::error::NotificationError;

impl Entity for Notification {
    type Id = String;
    type CreateParams = NotificationCreate;
    type Patch = ();
    type Action = NotificationAction;
    type ActionResult = bool;
    type Error = NotificationError;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: NotificationCreate) -> Result<Self, NotificationError> {
        if params.message.trim().is_empty() {
            return Err(NotificationError::ValidationError(
                "Message cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            id,
            recipient: params.recipient,
            kind: params.kind,
            order_id: params.order_id,
            message: params.message,
            created_at: params.created_at,
            read_at: None,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), NotificationError> {
        Ok(())
    }

    fn handle_action(&mut self, action: NotificationAction) -> Result<bool, NotificationError> {
        match action {
            NotificationAction::MarkRead { at } => {
                if self.is_read() {
                    return Ok(false);
                }
                self.read_at = Some(at);
                Ok(true)
            }
        }
    }
}

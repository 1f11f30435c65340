use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, PaymentStatus, ReorderLine, StatusTimestamps};
use crate::ordering::{OrderStatus, Transition};

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;

impl Order {
    /// Item set and quantities for putting this order back in a cart.
    /// Reading it never changes the order.
    pub fn reorder_lines(&self) -> Result<Vec<ReorderLine>, OrderError> {
        if self.status != OrderStatus::Completed {
            return Err(OrderError::NotReorderable {
                order_id: self.id.clone(),
                status: self.status,
            });
        }
        Ok(self
            .items
            .iter()
            .map(|item| ReorderLine {
                menu_item_id: item.menu_item_id.clone(),
                quantity: item.quantity,
                instructions: item.instructions.clone(),
            })
            .collect())
    }

    fn settle_payment(&mut self, status: OrderStatus) {
        self.payment.status = match (status, self.payment.status) {
            (OrderStatus::Cancelled, PaymentStatus::Paid) => PaymentStatus::Refunded,
            (OrderStatus::Completed, PaymentStatus::Pending) => PaymentStatus::Paid,
            (_, unchanged) => unchanged,
        };
    }
}

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = ();
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Error = OrderError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a pending order from builder output.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::ValidationError("Order has no items".to_string()));
        }
        let mut timestamps = StatusTimestamps::default();
        timestamps.stamp(OrderStatus::Pending, params.placed_at);

        Ok(Self {
            id,
            user_id: params.user_id,
            vendor_id: params.vendor_id,
            items: params.items,
            subtotal: params.subtotal,
            service_fee: params.service_fee,
            discount: params.discount,
            total: params.total,
            voucher_code: params.voucher_code,
            status: OrderStatus::Pending,
            timestamps,
            payment: params.payment,
            idempotency_key: params.idempotency_key,
            cancellation_reason: None,
        })
    }

    /// Orders are immutable apart from status transitions.
    fn on_update(&mut self, _patch: ()) -> Result<(), OrderError> {
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::Transition { transition, at } => {
                let from = self.status;
                let to = from.apply(&transition)?;
                self.status = to;
                self.timestamps.stamp(to, at);
                if let Transition::Cancel { reason } = transition {
                    self.cancellation_reason = reason;
                }
                self.settle_payment(to);
                Ok(OrderActionResult::Transition { from, to })
            }
        }
    }

    /// A customer's idempotency key may only ever produce one order.
    fn unique_key(&self) -> Option<String> {
        self.idempotency_key
            .as_ref()
            .map(|key| format!("{}:{}", self.user_id, key))
    }
}

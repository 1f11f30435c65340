use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::app_system::MarketSettings;
use crate::domain::{Cart, CartItem, Order, PaymentMethod, Pickup, RedemptionContext};
use crate::menu_actor::MenuError;
use crate::notifier::{Notifier, OrderEvent};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use crate::ordering::{BuildError, OrderBuilder, OrderStatus, Transition};
use crate::vendor_actor::VendorError;

use super::{CartClient, MenuClient, PickupClient, VendorClient, VoucherClient};

/// Who is asking to move an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requester {
    /// A customer, by user id.
    Customer(String),
    /// A vendor, by vendor id.
    Vendor(String),
}

impl fmt::Display for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requester::Customer(id) => write!(f, "customer {id}"),
            Requester::Vendor(id) => write!(f, "vendor {id}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub user_id: String,
    pub payment_method: PaymentMethod,
    /// Client-generated key; resubmitting it returns the first order.
    pub idempotency_key: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub queue_number: Option<u32>,
    /// The order already existed for this idempotency key.
    pub replayed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReorderOutcome {
    pub cart: Cart,
    /// Menu items that could not go back in the cart.
    pub skipped: Vec<String>,
}

/// Everything checkout and status changes fan out to.
#[derive(Clone)]
pub struct OrderDependencies {
    pub vendors: VendorClient,
    pub menu: MenuClient,
    pub carts: CartClient,
    pub vouchers: VoucherClient,
    pub pickups: PickupClient,
    pub notifier: Notifier,
}

/// In-flight checkouts by `user:key`. A second checkout with the same key
/// waits for the first to finish and then replays its order.
#[derive(Clone, Default)]
struct CheckoutClaims {
    held: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

struct CheckoutClaim {
    claims: CheckoutClaims,
    claim: String,
    _guard: OwnedMutexGuard<()>,
}

impl CheckoutClaims {
    async fn acquire(&self, user_id: &str, key: &str) -> CheckoutClaim {
        let claim = format!("{user_id}:{key}");
        let lock = {
            let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
            held.entry(claim.clone()).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        CheckoutClaim {
            claims: self.clone(),
            claim,
            _guard: guard,
        }
    }
}

impl Drop for CheckoutClaim {
    fn drop(&mut self) {
        let mut held = self.claims.held.lock().unwrap_or_else(PoisonError::into_inner);
        // The map and this guard hold one reference each; more means someone is waiting.
        if held.get(&self.claim).is_some_and(|lock| Arc::strong_count(lock) <= 2) {
            held.remove(&self.claim);
        }
    }
}

#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    deps: OrderDependencies,
    settings: MarketSettings,
    claims: CheckoutClaims,
}

crate::impl_client_methods!(OrderClient, Order, OrderError, order);

fn authorize(order: &Order, requester: &Requester, transition: &Transition) -> Result<(), OrderError> {
    let allowed = match requester {
        Requester::Vendor(vendor_id) => *vendor_id == order.vendor_id,
        Requester::Customer(user_id) => transition.is_cancel() && *user_id == order.user_id,
    };
    if allowed {
        return Ok(());
    }
    Err(OrderError::Forbidden {
        requester: requester.to_string(),
        action: transition.verb().to_string(),
        order_id: order.id.clone(),
    })
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, deps: OrderDependencies, settings: MarketSettings) -> Self {
        Self {
            inner,
            deps,
            settings,
            claims: CheckoutClaims::default(),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_key(&self, user_id: &str, key: &str) -> Result<Option<Order>, OrderError> {
        let orders = self.list_orders().await?;
        Ok(orders
            .into_iter()
            .find(|order| order.user_id == user_id && order.idempotency_key.as_deref() == Some(key)))
    }

    async fn replay(&self, order: Order) -> Result<CheckoutReceipt, OrderError> {
        let pickup = self.deps.pickups.get(order.id.clone()).await?;
        Ok(CheckoutReceipt {
            queue_number: pickup.map(|pickup| pickup.queue_number),
            order,
            replayed: true,
        })
    }

    /// Give back a use taken by a checkout that did not produce an order.
    async fn undo_redemption(&self, code: Option<&str>, user_id: &str) {
        let Some(code) = code else { return };
        if let Err(e) = self.deps.vouchers.release(code, user_id.to_string()).await {
            error!(%code, error = %e, "Failed to release voucher use");
        }
    }

    /// Turns the customer's cart into an order.
    ///
    /// Replaying an idempotency key returns the order it created first.
    /// Concurrent checkouts with the same key run one after the other, so
    /// the later one replays instead of tripping over the emptied cart or
    /// an already used voucher.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, key = ?request.idempotency_key))]
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutReceipt, OrderError> {
        info!("Processing checkout");
        let CheckoutRequest {
            user_id,
            payment_method,
            idempotency_key,
            at,
        } = request;
        let idempotency_key = idempotency_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let _claim = match &idempotency_key {
            Some(key) => Some(self.claims.acquire(&user_id, key).await),
            None => None,
        };

        // Step 1: Replay
        if let Some(key) = &idempotency_key {
            if let Some(existing) = self.find_by_key(&user_id, key).await? {
                info!(order_id = %existing.id, "Replaying checkout");
                return self.replay(existing).await;
            }
        }

        // Step 2: Cart
        let cart = self.deps.carts.cart_for(user_id.clone()).await?;
        let vendor_id = match (&cart.vendor_id, cart.is_empty()) {
            (Some(vendor_id), false) => vendor_id.clone(),
            _ => return Err(BuildError::EmptyCart.into()),
        };

        // Step 3: Vendor open
        let vendor = self.deps.vendors.fetch_vendor(vendor_id.clone()).await?;
        let local = at.with_timezone(&self.settings.utc_offset).naive_local();
        if !vendor.accepts_orders_at(local) {
            warn!(%vendor_id, %local, "Vendor closed");
            return Err(VendorError::Closed(vendor.id).into());
        }

        // Step 4: Menu still orderable
        for line in &cart.items {
            self.deps.menu.orderable(line.menu_item_id.clone(), &vendor_id).await?;
        }

        // Step 5: Voucher
        let mut builder = OrderBuilder::from_cart(&cart)
            .vendor(vendor_id.clone())
            .service_fee(self.settings.service_fee)
            .payment(payment_method)
            .idempotency_key(idempotency_key)
            .placed_at(at);
        let redeemed = match &cart.voucher_code {
            Some(code) => {
                let ctx = RedemptionContext {
                    user_id: user_id.clone(),
                    vendor_id: vendor_id.clone(),
                    subtotal: cart.subtotal(),
                    at,
                };
                let discount = self.deps.vouchers.redeem(code, ctx).await?;
                builder = builder.voucher(code.clone(), discount);
                Some(code.clone())
            }
            None => None,
        };

        // Step 6: Create
        let params = match builder.build() {
            Ok(params) => params,
            Err(e) => {
                self.undo_redemption(redeemed.as_deref(), &user_id).await;
                return Err(e.into());
            }
        };
        let order_id = match self.inner.create(params).await {
            Ok(id) => id,
            Err(FrameworkError::Duplicate(existing)) => {
                warn!(order_id = %existing, "Concurrent checkout with the same idempotency key");
                self.undo_redemption(redeemed.as_deref(), &user_id).await;
                let existing = self.fetch_order(existing).await?;
                return self.replay(existing).await;
            }
            Err(e) => {
                self.undo_redemption(redeemed.as_deref(), &user_id).await;
                return Err(e.into_domain());
            }
        };
        let order = self.fetch_order(order_id).await?;

        // Step 7: Pickup number
        let pickup = self
            .deps
            .pickups
            .assign(order.id.clone(), order.vendor_id.clone(), at)
            .await?;

        // Step 8: Empty the cart
        self.deps.carts.clear(user_id).await?;

        // Step 9: Tell everyone
        self.deps
            .notifier
            .publish(OrderEvent::Created, &order, Some(pickup.queue_number), at)
            .await?;

        info!(order_id = %order.id, total = %order.total, queue_number = pickup.queue_number, "Checkout complete");
        Ok(CheckoutReceipt {
            order,
            queue_number: Some(pickup.queue_number),
            replayed: false,
        })
    }

    /// Moves an order one step. Vendors drive the order forward; the
    /// customer may only cancel.
    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        order_id: String,
        requester: Requester,
        transition: Transition,
        at: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        let order = self.fetch_order(order_id.clone()).await?;
        authorize(&order, &requester, &transition)?;

        let OrderActionResult::Transition { from, to } = self
            .inner
            .perform_action(order_id.clone(), OrderAction::Transition { transition, at })
            .await
            .map_err(|e| e.into_domain())?;
        info!(%from, %to, "Order status changed");

        let pickup = self.deps.pickups.advance(order_id.clone(), to).await?;
        let order = self.fetch_order(order_id).await?;

        if to == OrderStatus::Cancelled {
            if let Some(code) = &order.voucher_code {
                let released = self.deps.vouchers.release(code, order.user_id.clone()).await?;
                debug!(%code, released, "Voucher use returned");
            }
        }
        if let Some(event) = OrderEvent::for_status(to) {
            self.deps
                .notifier
                .publish(event, &order, Some(pickup.queue_number), at)
                .await?;
        }
        Ok(order)
    }

    pub async fn cancel(
        &self,
        order_id: String,
        requester: Requester,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        self.transition(order_id, requester, Transition::Cancel { reason }, at)
            .await
    }

    /// Fills the customer's cart with a completed order's items at today's
    /// prices. Items no longer on the menu are skipped and reported.
    #[instrument(skip(self))]
    pub async fn reorder(&self, order_id: String, user_id: String) -> Result<ReorderOutcome, OrderError> {
        let order = self.fetch_order(order_id).await?;
        if order.user_id != user_id {
            return Err(OrderError::Forbidden {
                requester: Requester::Customer(user_id).to_string(),
                action: "reorder".to_string(),
                order_id: order.id,
            });
        }
        let lines = order.reorder_lines()?;

        let mut items = Vec::with_capacity(lines.len());
        let mut skipped = Vec::new();
        for line in lines {
            match self.deps.menu.orderable(line.menu_item_id.clone(), &order.vendor_id).await {
                Ok(item) => items.push(CartItem {
                    menu_item_id: item.id,
                    name: item.name,
                    unit_price: item.price,
                    quantity: line.quantity.min(self.settings.max_item_quantity),
                    instructions: line.instructions,
                }),
                Err(MenuError::NotFound(_) | MenuError::Unavailable(_)) => skipped.push(line.menu_item_id),
                Err(e) => return Err(e.into()),
            }
        }
        if items.is_empty() {
            return Err(OrderError::NothingToReorder(order.id));
        }

        let cart = self.deps.carts.replace(user_id, order.vendor_id, items).await?;
        info!(lines = cart.items.len(), skipped = skipped.len(), "Cart refilled from order");
        Ok(ReorderOutcome { cart, skipped })
    }

    /// A customer's orders, newest first.
    #[instrument(skip(self))]
    pub async fn orders_for_customer(&self, user_id: String) -> Result<Vec<Order>, OrderError> {
        let mut orders: Vec<Order> = self
            .list_orders()
            .await?
            .into_iter()
            .filter(|order| order.user_id == user_id)
            .collect();
        orders.reverse();
        Ok(orders)
    }

    /// A vendor's orders in the order they came in, optionally by status.
    #[instrument(skip(self))]
    pub async fn orders_for_vendor(
        &self,
        vendor_id: String,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrderError> {
        Ok(self
            .list_orders()
            .await?
            .into_iter()
            .filter(|order| order.vendor_id == vendor_id && status.map_or(true, |s| order.status == s))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn pickup_for(&self, order_id: String) -> Result<Option<Pickup>, OrderError> {
        Ok(self.deps.pickups.get(order_id).await?)
    }

    /// Waiting and ready pickups of a vendor, by queue number.
    #[instrument(skip(self))]
    pub async fn active_queue(&self, vendor_id: String) -> Result<Vec<Pickup>, OrderError> {
        Ok(self.deps.pickups.active_queue(vendor_id).await?)
    }
}

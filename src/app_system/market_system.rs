use tokio::task::JoinHandle;
use tracing::{error, info};

use super::config::Config;
use super::error::MarketError;
use crate::actor_framework::{sequential_ids, Entity, ResourceActor, ResourceClient};
use crate::clients::{
    CartClient, MenuClient, NotificationClient, OrderClient, OrderDependencies, PickupClient, UserClient,
    VendorClient, VoucherClient,
};
use crate::notifier::Notifier;
use crate::pickup_service::PickupService;

/// Every actor of the marketplace, wired together.
///
/// Dropping the last clone of each client stops its actor; [`shutdown`](Self::shutdown)
/// does that and waits for the tasks.
pub struct MarketSystem {
    pub users: UserClient,
    pub vendors: VendorClient,
    pub menu: MenuClient,
    pub vouchers: VoucherClient,
    pub carts: CartClient,
    pub notifications: NotificationClient,
    pub pickups: PickupClient,
    pub orders: OrderClient,
    handles: Vec<JoinHandle<()>>,
}

fn spawn<T: Entity<Id = String>>(
    name: &'static str,
    buffer: usize,
    handles: &mut Vec<JoinHandle<()>>,
) -> ResourceClient<T> {
    let (actor, client) = ResourceActor::<T>::new(name, buffer, sequential_ids(name));
    handles.push(tokio::spawn(actor.run()));
    client
}

impl MarketSystem {
    pub fn new(config: &Config) -> Self {
        let buffer = config.channel_buffer;
        let settings = config.market;
        let mut handles = Vec::new();

        let users = UserClient::new(spawn("user", buffer, &mut handles));
        let vendors = VendorClient::new(spawn("vendor", buffer, &mut handles));
        let menu = MenuClient::new(spawn("menu", buffer, &mut handles), vendors.clone());
        let vouchers = VoucherClient::new(spawn("voucher", buffer, &mut handles));
        let carts = CartClient::new(
            spawn("cart", buffer, &mut handles),
            menu.clone(),
            vouchers.clone(),
            settings,
        );
        let notifications = NotificationClient::new(spawn("notification", buffer, &mut handles));

        let (pickup_service, pickups) = PickupService::new(buffer, settings.utc_offset);
        handles.push(tokio::spawn(pickup_service.run()));

        let orders = OrderClient::new(
            spawn("order", buffer, &mut handles),
            OrderDependencies {
                vendors: vendors.clone(),
                menu: menu.clone(),
                carts: carts.clone(),
                vouchers: vouchers.clone(),
                pickups: pickups.clone(),
                notifier: Notifier::new(notifications.clone()),
            },
            settings,
        );

        info!(actors = handles.len(), "Market system started");
        Self {
            users,
            vendors,
            menu,
            vouchers,
            carts,
            notifications,
            pickups,
            orders,
            handles,
        }
    }

    /// Stops the pickup service, drops every client and waits for the actors.
    /// Clones handed out earlier must be dropped first or this waits for them.
    pub async fn shutdown(self) -> Result<(), MarketError> {
        info!("Shutting down system...");
        self.pickups.shutdown().await?;

        let Self {
            users,
            vendors,
            menu,
            vouchers,
            carts,
            notifications,
            pickups,
            orders,
            handles,
        } = self;
        drop((users, vendors, menu, vouchers, carts, notifications, pickups, orders));

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(MarketError::Shutdown(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

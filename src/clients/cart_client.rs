use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::app_system::MarketSettings;
use crate::cart_actor::{CartAction, CartError};
use crate::domain::{Cart, CartCreate, CartItem, RedemptionContext, Voucher};
use crate::menu_actor::MenuError;
use crate::ordering::Quote;

use super::{MenuClient, VoucherClient};

#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
    menu: MenuClient,
    vouchers: VoucherClient,
    settings: MarketSettings,
}

crate::impl_client_methods!(CartClient, Cart, CartError, cart);

impl CartClient {
    pub fn new(
        inner: ResourceClient<Cart>,
        menu: MenuClient,
        vouchers: VoucherClient,
        settings: MarketSettings,
    ) -> Self {
        Self {
            inner,
            menu,
            vouchers,
            settings,
        }
    }

    /// The customer's cart, created empty on first use.
    #[instrument(skip(self))]
    pub async fn cart_for(&self, user_id: String) -> Result<Cart, CartError> {
        debug!("Sending request");
        let carts = self.inner.list().await.map_err(|e| e.into_domain())?;
        if let Some(cart) = carts.into_iter().find(|cart| cart.user_id == user_id) {
            return Ok(cart);
        }
        let id = match self.inner.create(CartCreate { user_id }).await {
            Ok(id) => id,
            // Lost a race with a concurrent first use.
            Err(FrameworkError::Duplicate(existing)) => existing,
            Err(e) => return Err(e.into_domain()),
        };
        self.inner.fetch(id).await.map_err(|e| e.into_domain())
    }

    async fn act(&self, user_id: String, action: CartAction) -> Result<Cart, CartError> {
        let cart = self.cart_for(user_id).await?;
        self.inner
            .perform_action(cart.id, action)
            .await
            .map_err(|e| e.into_domain())
    }

    /// Adds `quantity` of a menu item at its current price. Adding an item
    /// already in the cart bumps its quantity.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: String,
        menu_item_id: String,
        quantity: u32,
        instructions: Option<String>,
    ) -> Result<Cart, CartError> {
        let item = self.menu.fetch_menu_item(menu_item_id).await?;
        if !item.is_available {
            return Err(MenuError::Unavailable(item.id).into());
        }
        let cart = self
            .act(
                user_id,
                CartAction::AddItem {
                    vendor_id: item.vendor_id,
                    item: CartItem {
                        menu_item_id: item.id,
                        name: item.name,
                        unit_price: item.price,
                        quantity,
                        instructions: instructions.filter(|text| !text.trim().is_empty()),
                    },
                    max_quantity: self.settings.max_item_quantity,
                },
            )
            .await?;
        info!(lines = cart.items.len(), "Item added to cart");
        Ok(cart)
    }

    /// A quantity of zero removes the line.
    #[instrument(skip(self))]
    pub async fn set_quantity(&self, user_id: String, menu_item_id: String, quantity: u32) -> Result<Cart, CartError> {
        self.act(
            user_id,
            CartAction::SetQuantity {
                menu_item_id,
                quantity,
                max_quantity: self.settings.max_item_quantity,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn set_instructions(
        &self,
        user_id: String,
        menu_item_id: String,
        instructions: Option<String>,
    ) -> Result<Cart, CartError> {
        self.act(
            user_id,
            CartAction::SetInstructions {
                menu_item_id,
                instructions,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, user_id: String, menu_item_id: String) -> Result<Cart, CartError> {
        self.act(user_id, CartAction::RemoveItem { menu_item_id }).await
    }

    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: String) -> Result<Cart, CartError> {
        self.act(user_id, CartAction::Clear).await
    }

    /// Swap the whole cart content for lines of one vendor.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn replace(&self, user_id: String, vendor_id: String, items: Vec<CartItem>) -> Result<Cart, CartError> {
        self.act(user_id, CartAction::Replace { vendor_id, items }).await
    }

    /// Attach a voucher after checking it would discount the current cart.
    /// Nothing is consumed until checkout.
    #[instrument(skip(self))]
    pub async fn apply_voucher(
        &self,
        user_id: String,
        code: String,
        at: DateTime<Utc>,
    ) -> Result<(Cart, Decimal), CartError> {
        let cart = self.cart_for(user_id.clone()).await?;
        let vendor_id = match (&cart.vendor_id, cart.is_empty()) {
            (Some(vendor_id), false) => vendor_id.clone(),
            _ => return Err(CartError::Empty),
        };
        let ctx = RedemptionContext {
            user_id,
            vendor_id,
            subtotal: cart.subtotal(),
            at,
        };
        let discount = self.vouchers.preview(&code, ctx).await?;
        let cart = self
            .inner
            .perform_action(
                cart.id,
                CartAction::ApplyVoucher {
                    code: Voucher::normalize_code(&code),
                },
            )
            .await
            .map_err(|e| e.into_domain())?;
        info!(%discount, "Voucher applied to cart");
        Ok((cart, discount))
    }

    #[instrument(skip(self))]
    pub async fn remove_voucher(&self, user_id: String) -> Result<Cart, CartError> {
        self.act(user_id, CartAction::RemoveVoucher).await
    }

    /// Price breakdown of the cart as it stands. A voucher that stopped
    /// applying since it was attached contributes no discount.
    #[instrument(skip(self))]
    pub async fn quote(&self, user_id: String, at: DateTime<Utc>) -> Result<Quote, CartError> {
        let cart = self.cart_for(user_id.clone()).await?;
        let (Some(vendor_id), false) = (cart.vendor_id.clone(), cart.is_empty()) else {
            return Ok(Quote::compute(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        };
        let subtotal = cart.subtotal();
        let discount = match &cart.voucher_code {
            Some(code) => {
                let ctx = RedemptionContext {
                    user_id,
                    vendor_id,
                    subtotal,
                    at,
                };
                match self.vouchers.preview(code, ctx).await {
                    Ok(discount) => discount,
                    Err(e) => {
                        warn!(%code, error = %e, "Voucher no longer applies");
                        Decimal::ZERO
                    }
                }
            }
            None => Decimal::ZERO,
        };
        Ok(Quote::compute(subtotal, self.settings.service_fee, discount))
    }
}

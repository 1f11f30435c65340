mod actor_framework;
mod app_system;
mod cart_actor;
mod clients;
mod domain;
mod menu_actor;
mod notification_actor;
mod notifier;
mod order_actor;
mod ordering;
mod pickup_service;
mod user_actor;
mod vendor_actor;
mod voucher_actor;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, ApiResponse, Config, MarketError, MarketSystem};
use crate::clients::{CheckoutRequest, Requester};
use crate::domain::{MenuItemCreate, PaymentMethod, Recipient, UserCreate, VendorCreate, VoucherCreate};
use crate::ordering::{DiscountRule, Transition};

fn print_envelope<T: Serialize>(response: &ApiResponse<T>) {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "Failed to render response"),
    }
}

#[tokio::main]
async fn main() -> Result<(), MarketError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = Config::load()?;
    info!(?config, "Starting food market");
    let system = MarketSystem::new(&config);
    let now = Utc::now();

    let span = tracing::info_span!("storefront_setup");
    let (customer_id, vendor_id, noodles_id, tea_id) = async {
        let customer_id = system.users.create_user(UserCreate::customer("Alice", "alice@example.com")).await?;
        let owner_id = system.users.create_user(UserCreate::vendor("Mei", "mei@example.com")).await?;
        let vendor_id = system
            .vendors
            .create_vendor(VendorCreate {
                owner_id,
                name: "Mei's Noodle Bar".into(),
                hours: vec![],
            })
            .await?;
        system.vendors.set_open(vendor_id.clone(), true).await?;

        let noodles_id = system
            .menu
            .create_menu_item(MenuItemCreate {
                vendor_id: vendor_id.clone(),
                name: "Wonton Noodles".into(),
                category: "Noodles".into(),
                price: Decimal::new(650, 2),
            })
            .await?;
        let tea_id = system
            .menu
            .create_menu_item(MenuItemCreate {
                vendor_id: vendor_id.clone(),
                name: "Iced Lemon Tea".into(),
                category: "Drinks".into(),
                price: Decimal::new(220, 2),
            })
            .await?;

        system
            .vouchers
            .create_voucher(VoucherCreate {
                code: "welcome10".into(),
                vendor_id: None,
                rule: DiscountRule::Percentage { percent: Decimal::from(10) },
                min_order: Some(Decimal::from(10)),
                max_discount: Some(Decimal::from(3)),
                usage_limit: Some(100),
                per_user_limit: Some(1),
                valid_from: now - Duration::days(1),
                valid_until: now + Duration::days(30),
            })
            .await?;
        Ok::<_, MarketError>((customer_id, vendor_id, noodles_id, tea_id))
    }
    .instrument(span)
    .await?;

    info!(%customer_id, %vendor_id, "Storefront ready");

    // Fill the cart and look at the price
    system
        .carts
        .add_item(customer_id.clone(), noodles_id, 2, Some("less oil".into()))
        .await?;
    system.carts.add_item(customer_id.clone(), tea_id, 1, None).await?;
    system
        .carts
        .apply_voucher(customer_id.clone(), "WELCOME10".into(), now)
        .await?;
    print_envelope(&ApiResponse::from_result(
        system.carts.quote(customer_id.clone(), now).await,
        200,
        "Cart quote",
    ));

    // Checkout twice with the same key: one order
    let span = tracing::info_span!("order_processing");
    let request = CheckoutRequest {
        user_id: customer_id.clone(),
        payment_method: PaymentMethod::EWallet,
        idempotency_key: Some("checkout-demo-1".into()),
        at: now,
    };
    let receipt = async {
        let first = system.orders.checkout(request.clone()).await?;
        let replay = system.orders.checkout(request).await?;
        info!(order_id = %first.order.id, replayed = replay.replayed, "Checkout submitted twice");
        Ok::<_, MarketError>(first)
    }
    .instrument(span)
    .await;

    let order = match receipt {
        Ok(receipt) => {
            let order = receipt.order.clone();
            print_envelope(&ApiResponse::ok(201, "Order placed", receipt.order));
            order
        }
        Err(e) => {
            error!(error = %e, "Order processing failed");
            print_envelope(&e.clone().into_response::<()>());
            return Err(e);
        }
    };

    // A customer cannot accept their own order
    let forbidden = system
        .orders
        .transition(order.id.clone(), Requester::Customer(customer_id.clone()), Transition::Accept, now)
        .await;
    print_envelope(&ApiResponse::from_result(forbidden, 200, "Order accepted"));

    // The vendor walks it to collection
    let vendor = Requester::Vendor(vendor_id.clone());
    for step in [
        Transition::Accept,
        Transition::StartPreparing,
        Transition::MarkReady,
        Transition::Complete,
    ] {
        let updated = system
            .orders
            .transition(order.id.clone(), vendor.clone(), step, Utc::now())
            .await?;
        info!(status = %updated.status, "Order moved");
    }

    print_envelope(&ApiResponse::from_result(
        system.orders.reorder(order.id.clone(), customer_id.clone()).await,
        200,
        "Cart refilled",
    ));
    print_envelope(&ApiResponse::from_result(
        system.notifications.list_for(Recipient::Customer(customer_id)).await,
        200,
        "Notifications",
    ));

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

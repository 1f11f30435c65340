#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc, Weekday};
    use rust_decimal::Decimal;
    use tokio::sync::mpsc;

    use crate::actor_framework::{Entity, FrameworkError};
    use crate::app_system::{Config, MarketError, MarketSettings, MarketSystem};
    use crate::cart_actor::{CartAction, CartError};
    use crate::clients::{
        CartClient, CheckoutRequest, MenuClient, NotificationClient, OrderClient, OrderDependencies, PickupClient,
        Requester, VendorClient, VoucherClient,
    };
    use crate::domain::{
        Cart, CartItem, MenuItem, MenuItemCreate, MenuItemPatch, Notification, NotificationKind, OperatingHours, Order,
        PaymentMethod, PaymentStatus, Pickup, Recipient, UserCreate, Vendor, VendorCreate, Voucher, VoucherCreate,
        VoucherPatch,
    };
    use crate::mock_framework::{create_mock_client, expect_action, expect_create, expect_get, expect_list};
    use crate::notifier::Notifier;
    use crate::order_actor::OrderError;
    use crate::ordering::{BuildError, DiscountRule, OrderStatus, PickupStatus, Transition};
    use crate::pickup_service::PickupRequest;
    use crate::vendor_actor::VendorError;
    use crate::voucher_actor::{VoucherAction, VoucherActionResult, VoucherError};

    fn noon(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap()
    }

    // =========================================================================
    // Checkout orchestration against mocked actors
    // =========================================================================

    fn cart_with(voucher_code: Option<&str>) -> Cart {
        Cart {
            id: "cart_1".into(),
            user_id: "user_1".into(),
            vendor_id: Some("vendor_1".into()),
            items: vec![CartItem {
                menu_item_id: "menu_1".into(),
                name: "Chicken Rice".into(),
                unit_price: Decimal::new(650, 2),
                quantity: 2,
                instructions: Some("no chili".into()),
            }],
            voucher_code: voucher_code.map(str::to_string),
        }
    }

    fn open_vendor() -> Vendor {
        Vendor {
            id: "vendor_1".into(),
            owner_id: "user_9".into(),
            name: "Hawker Stall".into(),
            is_open: true,
            hours: vec![],
        }
    }

    fn chicken_rice() -> MenuItem {
        MenuItem {
            id: "menu_1".into(),
            vendor_id: "vendor_1".into(),
            name: "Chicken Rice".into(),
            category: "Mains".into(),
            price: Decimal::new(650, 2),
            is_available: true,
        }
    }

    fn lunch_voucher() -> Voucher {
        Voucher::from_create_params(
            "voucher_1".into(),
            VoucherCreate {
                code: "lunch".into(),
                vendor_id: None,
                rule: DiscountRule::Fixed { amount: Decimal::from(3) },
                min_order: None,
                max_discount: None,
                usage_limit: Some(10),
                per_user_limit: Some(1),
                valid_from: noon(1),
                valid_until: noon(30),
            },
        )
        .unwrap()
    }

    struct Mocks {
        orders: mpsc::Receiver<crate::actor_framework::ResourceRequest<Order>>,
        vendors: mpsc::Receiver<crate::actor_framework::ResourceRequest<Vendor>>,
        menu: mpsc::Receiver<crate::actor_framework::ResourceRequest<MenuItem>>,
        carts: mpsc::Receiver<crate::actor_framework::ResourceRequest<Cart>>,
        vouchers: mpsc::Receiver<crate::actor_framework::ResourceRequest<Voucher>>,
        notifications: mpsc::Receiver<crate::actor_framework::ResourceRequest<Notification>>,
        pickups: mpsc::Receiver<PickupRequest>,
    }

    fn mocked_order_client() -> (OrderClient, Mocks) {
        let settings = MarketSettings::default();
        let (order_inner, orders) = create_mock_client::<Order>(10);
        let (vendor_inner, vendors) = create_mock_client::<Vendor>(10);
        let (menu_inner, menu) = create_mock_client::<MenuItem>(10);
        let (cart_inner, carts) = create_mock_client::<Cart>(10);
        let (voucher_inner, vouchers) = create_mock_client::<Voucher>(10);
        let (notification_inner, notifications) = create_mock_client::<Notification>(10);
        let (pickup_sender, pickups) = mpsc::channel(10);

        let vendor_client = VendorClient::new(vendor_inner);
        let menu_client = MenuClient::new(menu_inner, vendor_client.clone());
        let voucher_client = VoucherClient::new(voucher_inner);
        let cart_client = CartClient::new(cart_inner, menu_client.clone(), voucher_client.clone(), settings);

        let client = OrderClient::new(
            order_inner,
            OrderDependencies {
                vendors: vendor_client,
                menu: menu_client,
                carts: cart_client,
                vouchers: voucher_client,
                pickups: PickupClient::new(pickup_sender),
                notifier: Notifier::new(NotificationClient::new(notification_inner)),
            },
            settings,
        );
        let mocks = Mocks {
            orders,
            vendors,
            menu,
            carts,
            vouchers,
            notifications,
            pickups,
        };
        (client, mocks)
    }

    fn request(key: &str) -> CheckoutRequest {
        CheckoutRequest {
            user_id: "user_1".into(),
            payment_method: PaymentMethod::EWallet,
            idempotency_key: Some(key.into()),
            at: noon(16),
        }
    }

    #[tokio::test]
    async fn test_checkout_flow() {
        let (client, mut mocks) = mocked_order_client();
        let checkout = tokio::spawn(async move { client.checkout(request("key-1")).await });

        // Step 1: no earlier order for the key
        let responder = expect_list(&mut mocks.orders).await.expect("Expected Order List");
        responder.send(Ok(vec![])).unwrap();

        // Step 2: cart lookup
        let responder = expect_list(&mut mocks.carts).await.expect("Expected Cart List");
        responder.send(Ok(vec![cart_with(None)])).unwrap();

        // Step 3: vendor open
        let (vendor_id, responder) = expect_get(&mut mocks.vendors).await.expect("Expected Vendor Get");
        assert_eq!(vendor_id, "vendor_1");
        responder.send(Ok(Some(open_vendor()))).unwrap();

        // Step 4: menu item still on sale
        let (menu_id, responder) = expect_get(&mut mocks.menu).await.expect("Expected Menu Get");
        assert_eq!(menu_id, "menu_1");
        responder.send(Ok(Some(chicken_rice()))).unwrap();

        // Step 6: order create with the snapshot
        let (params, responder) = expect_create(&mut mocks.orders).await.expect("Expected Order Create");
        assert_eq!(params.subtotal, Decimal::new(1300, 2));
        assert_eq!(params.service_fee, Decimal::new(200, 2));
        assert_eq!(params.total, Decimal::new(1500, 2));
        assert_eq!(params.items[0].instructions.as_deref(), Some("no chili"));
        assert_eq!(params.payment.status, PaymentStatus::Paid);
        assert_eq!(params.idempotency_key.as_deref(), Some("key-1"));
        let stored = Order::from_create_params("order_1".into(), params).unwrap();
        responder.send(Ok("order_1".into())).unwrap();

        let (order_id, responder) = expect_get(&mut mocks.orders).await.expect("Expected Order Get");
        assert_eq!(order_id, "order_1");
        responder.send(Ok(Some(stored))).unwrap();

        // Step 7: pickup number
        match mocks.pickups.recv().await {
            Some(PickupRequest::Assign {
                order_id,
                vendor_id,
                at,
                respond_to,
            }) => {
                assert_eq!((order_id.as_str(), vendor_id.as_str()), ("order_1", "vendor_1"));
                respond_to
                    .send(Ok(Pickup {
                        order_id,
                        vendor_id,
                        queue_number: 1,
                        queue_date: at.date_naive(),
                        status: PickupStatus::Waiting,
                        withdrawn: false,
                        assigned_at: at,
                    }))
                    .unwrap();
            }
            other => panic!("Expected Pickup Assign, got {other:?}"),
        }

        // Step 8: cart cleared
        let responder = expect_list(&mut mocks.carts).await.expect("Expected Cart List");
        responder.send(Ok(vec![cart_with(None)])).unwrap();
        let (cart_id, action, responder) = expect_action(&mut mocks.carts).await.expect("Expected Cart Action");
        assert_eq!(cart_id, "cart_1");
        assert!(matches!(action, CartAction::Clear));
        let mut emptied = cart_with(None);
        emptied.items.clear();
        emptied.vendor_id = None;
        responder.send(Ok(emptied)).unwrap();

        // Step 9: customer, then vendor
        let (notice, responder) = expect_create(&mut mocks.notifications).await.expect("Expected customer notice");
        assert_eq!(notice.recipient, Recipient::Customer("user_1".into()));
        assert_eq!(notice.kind, NotificationKind::OrderPlaced);
        responder.send(Ok("notification_1".into())).unwrap();
        let (notice, responder) = expect_create(&mut mocks.notifications).await.expect("Expected vendor notice");
        assert_eq!(notice.recipient, Recipient::Vendor("vendor_1".into()));
        responder.send(Ok("notification_2".into())).unwrap();

        let receipt = checkout.await.unwrap().unwrap();
        assert_eq!(receipt.order.id, "order_1");
        assert_eq!(receipt.queue_number, Some(1));
        assert!(!receipt.replayed);
    }

    #[tokio::test]
    async fn test_racing_checkout_returns_first_order_and_releases_voucher() {
        let (client, mut mocks) = mocked_order_client();
        let checkout = tokio::spawn(async move { client.checkout(request("key-2")).await });

        expect_list(&mut mocks.orders).await.unwrap().send(Ok(vec![])).unwrap();
        expect_list(&mut mocks.carts)
            .await
            .unwrap()
            .send(Ok(vec![cart_with(Some("LUNCH"))]))
            .unwrap();
        expect_get(&mut mocks.vendors).await.unwrap().1.send(Ok(Some(open_vendor()))).unwrap();
        expect_get(&mut mocks.menu).await.unwrap().1.send(Ok(Some(chicken_rice()))).unwrap();

        // Step 5: voucher redeemed
        expect_list(&mut mocks.vouchers)
            .await
            .unwrap()
            .send(Ok(vec![lunch_voucher()]))
            .unwrap();
        let (voucher_id, action, responder) = expect_action(&mut mocks.vouchers).await.expect("Expected Redeem");
        assert_eq!(voucher_id, "voucher_1");
        assert!(matches!(action, VoucherAction::Redeem(ref ctx) if ctx.subtotal == Decimal::new(1300, 2)));
        responder.send(Ok(VoucherActionResult::Redeem(Decimal::from(3)))).unwrap();

        // Another request with the same key won the race.
        let (params, responder) = expect_create(&mut mocks.orders).await.expect("Expected Order Create");
        assert_eq!(params.discount, Decimal::from(3));
        let winner = Order::from_create_params("order_9".into(), params).unwrap();
        responder.send(Err(FrameworkError::Duplicate("order_9".into()))).unwrap();

        // The losing request hands its voucher use back.
        expect_list(&mut mocks.vouchers)
            .await
            .unwrap()
            .send(Ok(vec![lunch_voucher()]))
            .unwrap();
        let (_, action, responder) = expect_action(&mut mocks.vouchers).await.expect("Expected Release");
        assert!(matches!(action, VoucherAction::Release { ref user_id } if user_id == "user_1"));
        responder.send(Ok(VoucherActionResult::Release(true))).unwrap();

        let (order_id, responder) = expect_get(&mut mocks.orders).await.unwrap();
        assert_eq!(order_id, "order_9");
        responder.send(Ok(Some(winner))).unwrap();

        match mocks.pickups.recv().await {
            Some(PickupRequest::Get { order_id, respond_to }) => {
                assert_eq!(order_id, "order_9");
                respond_to.send(Ok(None)).unwrap();
            }
            other => panic!("Expected Pickup Get, got {other:?}"),
        }

        let receipt = checkout.await.unwrap().unwrap();
        assert_eq!(receipt.order.id, "order_9");
        assert!(receipt.replayed);
        assert_eq!(receipt.queue_number, None);
        assert!(mocks.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_vendor_stops_checkout_before_any_write() {
        let (client, mut mocks) = mocked_order_client();
        let checkout = tokio::spawn(async move { client.checkout(request("key-3")).await });

        expect_list(&mut mocks.orders).await.unwrap().send(Ok(vec![])).unwrap();
        expect_list(&mut mocks.carts)
            .await
            .unwrap()
            .send(Ok(vec![cart_with(Some("LUNCH"))]))
            .unwrap();
        let mut closed = open_vendor();
        closed.is_open = false;
        expect_get(&mut mocks.vendors).await.unwrap().1.send(Ok(Some(closed))).unwrap();

        let err = checkout.await.unwrap().unwrap_err();
        assert_eq!(err, OrderError::Vendor(VendorError::Closed("vendor_1".into())));
        assert_eq!(err.status_code(), 422);
        assert!(mocks.vouchers.try_recv().is_err());
        assert!(mocks.orders.try_recv().is_err());
    }

    // =========================================================================
    // End to end against a live market
    // =========================================================================

    struct Fixture {
        market: MarketSystem,
        vendor_id: String,
        noodles: String,
        tea: String,
    }

    async fn market() -> Fixture {
        let market = MarketSystem::new(&Config::default());
        let owner = market
            .users
            .create_user(UserCreate::vendor("Mei", "mei@stall.test"))
            .await
            .unwrap();
        let vendor_id = market
            .vendors
            .create_vendor(VendorCreate {
                owner_id: owner,
                name: "Mei's Noodles".into(),
                hours: vec![],
            })
            .await
            .unwrap();
        market.vendors.set_open(vendor_id.clone(), true).await.unwrap();

        let item = |name: &str, cents: i64| MenuItemCreate {
            vendor_id: vendor_id.clone(),
            name: name.into(),
            category: "Menu".into(),
            price: Decimal::new(cents, 2),
        };
        let noodles = market.menu.create_menu_item(item("Wonton Noodles", 550)).await.unwrap();
        let tea = market.menu.create_menu_item(item("Iced Tea", 150)).await.unwrap();

        Fixture {
            market,
            vendor_id,
            noodles,
            tea,
        }
    }

    async fn customer(market: &MarketSystem, name: &str) -> String {
        market
            .users
            .create_user(UserCreate::customer(name, format!("{name}@mail.test")))
            .await
            .unwrap()
    }

    fn checkout_req(user_id: &str, key: Option<&str>, at: DateTime<Utc>) -> CheckoutRequest {
        CheckoutRequest {
            user_id: user_id.into(),
            payment_method: PaymentMethod::Cash,
            idempotency_key: key.map(str::to_string),
            at,
        }
    }

    #[tokio::test]
    async fn resubmitted_checkout_returns_the_same_order() {
        let f = market().await;
        let ana = customer(&f.market, "ana").await;
        f.market.carts.add_item(ana.clone(), f.noodles.clone(), 2, None).await.unwrap();

        let first = f.market.orders.checkout(checkout_req(&ana, Some("tap-1"), noon(16))).await.unwrap();
        let second = f.market.orders.checkout(checkout_req(&ana, Some("tap-1"), noon(16))).await.unwrap();

        assert_eq!(first.order.id, second.order.id);
        assert_eq!(first.queue_number, second.queue_number);
        assert!(second.replayed);
        assert_eq!(f.market.orders.orders_for_customer(ana.clone()).await.unwrap().len(), 1);

        // Without a key the emptied cart is rejected.
        let err = f.market.orders.checkout(checkout_req(&ana, None, noon(16))).await.unwrap_err();
        assert_eq!(err, OrderError::Build(BuildError::EmptyCart));
        assert_eq!(MarketError::from(err).status_code(), 422);
    }

    #[tokio::test]
    async fn voucher_usage_never_exceeds_its_limit() {
        let f = market().await;
        f.market
            .vouchers
            .create_voucher(VoucherCreate {
                code: "Mei10".into(),
                vendor_id: Some(f.vendor_id.clone()),
                rule: DiscountRule::Percentage { percent: Decimal::from(10) },
                min_order: Some(Decimal::from(5)),
                max_discount: Some(Decimal::from(1)),
                usage_limit: Some(1),
                per_user_limit: None,
                valid_from: noon(1),
                valid_until: noon(30),
            })
            .await
            .unwrap();

        let ana = customer(&f.market, "ana").await;
        let ben = customer(&f.market, "ben").await;
        for user in [&ana, &ben] {
            f.market.carts.add_item(user.clone(), f.noodles.clone(), 3, None).await.unwrap();
            let (_, preview) = f.market.carts.apply_voucher(user.clone(), "mei10".into(), noon(16)).await.unwrap();
            // 10% of 16.50 is 1.65, capped at 1.
            assert_eq!(preview, Decimal::from(1));
        }

        let quote = f.market.carts.quote(ana.clone(), noon(16)).await.unwrap();
        assert_eq!(quote.total, Decimal::new(1750, 2));

        let first = f.market.orders.checkout(checkout_req(&ana, None, noon(16))).await.unwrap();
        assert_eq!(first.order.discount, Decimal::from(1));
        assert_eq!(first.order.voucher_code.as_deref(), Some("MEI10"));

        let err = f.market.orders.checkout(checkout_req(&ben, None, noon(16))).await.unwrap_err();
        assert_eq!(err, OrderError::Voucher(VoucherError::UsageLimitReached("MEI10".into())));
        assert_eq!(err.status_code(), 429);
        assert!(!f.market.carts.cart_for(ben.clone()).await.unwrap().is_empty());

        // Cancelling gives the use back.
        f.market
            .orders
            .cancel(first.order.id, Requester::Customer(ana), None, noon(16))
            .await
            .unwrap();
        let second = f.market.orders.checkout(checkout_req(&ben, None, noon(16))).await.unwrap();
        assert_eq!(second.order.discount, Decimal::from(1));
        assert_eq!(f.market.vouchers.find_by_code("mei10").await.unwrap().used_count, 1);
    }

    #[tokio::test]
    async fn vendor_drives_lifecycle_and_everyone_hears_about_it() {
        let f = market().await;
        let ana = customer(&f.market, "ana").await;
        f.market.carts.add_item(ana.clone(), f.tea.clone(), 1, None).await.unwrap();
        let receipt = f.market.orders.checkout(checkout_req(&ana, None, noon(16))).await.unwrap();
        let order_id = receipt.order.id.clone();
        let vendor = Requester::Vendor(f.vendor_id.clone());

        let err = f
            .market
            .orders
            .transition(order_id.clone(), Requester::Customer(ana.clone()), Transition::Accept, noon(16))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Forbidden { .. }));
        assert_eq!(err.status_code(), 403);

        let orders = &f.market.orders;
        for transition in [Transition::Accept, Transition::StartPreparing] {
            orders.transition(order_id.clone(), vendor.clone(), transition, noon(16)).await.unwrap();
        }
        assert_eq!(
            orders.pickup_for(order_id.clone()).await.unwrap().unwrap().status,
            PickupStatus::Waiting
        );
        orders
            .transition(order_id.clone(), vendor.clone(), Transition::MarkReady, noon(16))
            .await
            .unwrap();
        assert_eq!(
            orders.pickup_for(order_id.clone()).await.unwrap().unwrap().status,
            PickupStatus::Ready
        );

        let err = orders
            .cancel(order_id.clone(), Requester::Customer(ana.clone()), None, noon(16))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition(_)));
        assert_eq!(err.status_code(), 409);

        let done = orders
            .transition(order_id.clone(), vendor, Transition::Complete, noon(16))
            .await
            .unwrap();
        assert_eq!(done.status, OrderStatus::Completed);
        assert_eq!(done.payment.status, PaymentStatus::Paid);
        assert!(done.timestamps.ready_at.is_some());
        assert!(f.market.orders.active_queue(f.vendor_id.clone()).await.unwrap().is_empty());

        let inbox = f.market.notifications.list_for(Recipient::Customer(ana.clone())).await.unwrap();
        let kinds: Vec<NotificationKind> = inbox.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::OrderCollected,
                NotificationKind::OrderReady,
                NotificationKind::OrderAccepted,
                NotificationKind::OrderPlaced,
            ]
        );
        let vendor_inbox = f.market.notifications.list_for(Recipient::Vendor(f.vendor_id.clone())).await.unwrap();
        assert_eq!(vendor_inbox.len(), 1);

        assert!(f.market.notifications.mark_read(inbox[0].id.clone(), noon(16)).await.unwrap());
        assert!(!f.market.notifications.mark_read(inbox[0].id.clone(), noon(16)).await.unwrap());
        assert_eq!(f.market.notifications.unread_count(Recipient::Customer(ana)).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn cancelled_pickup_leaves_queue_and_numbers_reset_next_day() {
        let f = market().await;
        let mut numbers = Vec::new();
        let mut orders = Vec::new();
        for name in ["ana", "ben", "cai"] {
            let user = customer(&f.market, name).await;
            f.market.carts.add_item(user.clone(), f.tea.clone(), 1, None).await.unwrap();
            let mut request = checkout_req(&user, None, noon(16));
            request.payment_method = PaymentMethod::Card;
            let receipt = f.market.orders.checkout(request).await.unwrap();
            numbers.push(receipt.queue_number.unwrap());
            orders.push((user, receipt.order.id));
        }
        assert_eq!(numbers, vec![1, 2, 3]);

        let (ben, ben_order) = orders[1].clone();
        let cancelled = f
            .market
            .orders
            .cancel(ben_order, Requester::Customer(ben.clone()), Some("changed my mind".into()), noon(16))
            .await
            .unwrap();
        assert_eq!(cancelled.payment.status, PaymentStatus::Refunded);

        let queue: Vec<u32> = f
            .market
            .orders
            .active_queue(f.vendor_id.clone())
            .await
            .unwrap()
            .iter()
            .map(|pickup| pickup.queue_number)
            .collect();
        assert_eq!(queue, vec![1, 3]);

        f.market.carts.add_item(ben.clone(), f.tea.clone(), 1, None).await.unwrap();
        let same_day = f.market.orders.checkout(checkout_req(&ben, None, noon(16) + Duration::hours(1))).await.unwrap();
        assert_eq!(same_day.queue_number, Some(4));

        f.market.carts.add_item(ben.clone(), f.tea.clone(), 1, None).await.unwrap();
        let next_day = f.market.orders.checkout(checkout_req(&ben, None, noon(17))).await.unwrap();
        assert_eq!(next_day.queue_number, Some(1));
    }

    #[tokio::test]
    async fn reorder_refills_cart_with_what_is_still_on_sale() {
        let f = market().await;
        let ana = customer(&f.market, "ana").await;
        f.market
            .carts
            .add_item(ana.clone(), f.noodles.clone(), 2, Some("extra chili".into()))
            .await
            .unwrap();
        f.market.carts.add_item(ana.clone(), f.tea.clone(), 1, None).await.unwrap();
        let order = f.market.orders.checkout(checkout_req(&ana, None, noon(16))).await.unwrap().order;

        let err = f.market.orders.reorder(order.id.clone(), ana.clone()).await.unwrap_err();
        assert!(matches!(err, OrderError::NotReorderable { .. }));

        let vendor = Requester::Vendor(f.vendor_id.clone());
        for t in [
            Transition::Accept,
            Transition::StartPreparing,
            Transition::MarkReady,
            Transition::Complete,
        ] {
            f.market.orders.transition(order.id.clone(), vendor.clone(), t, noon(16)).await.unwrap();
        }
        f.market.menu.set_availability(f.tea.clone(), false).await.unwrap();

        let outcome = f.market.orders.reorder(order.id.clone(), ana.clone()).await.unwrap();
        assert_eq!(outcome.skipped, vec![f.tea.clone()]);
        assert_eq!(outcome.cart.items.len(), 1);
        assert_eq!(outcome.cart.items[0].quantity, 2);
        assert_eq!(outcome.cart.items[0].instructions.as_deref(), Some("extra chili"));

        let unchanged = f.market.orders.fetch_order(order.id.clone()).await.unwrap();
        assert_eq!(unchanged.items, order.items);
        assert_eq!(unchanged.status, OrderStatus::Completed);

        let stranger = customer(&f.market, "zed").await;
        let err = f.market.orders.reorder(order.id, stranger).await.unwrap_err();
        assert!(matches!(err, OrderError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn cart_stays_with_one_vendor() {
        let f = market().await;
        let other_owner = customer(&f.market, "owner2").await;
        let other_vendor = f
            .market
            .vendors
            .create_vendor(VendorCreate {
                owner_id: other_owner,
                name: "Kopi Corner".into(),
                hours: vec![],
            })
            .await
            .unwrap();
        let kopi = f
            .market
            .menu
            .create_menu_item(MenuItemCreate {
                vendor_id: other_vendor,
                name: "Kopi".into(),
                category: "Drinks".into(),
                price: Decimal::new(180, 2),
            })
            .await
            .unwrap();

        let ana = customer(&f.market, "ana").await;
        f.market.carts.add_item(ana.clone(), f.noodles.clone(), 1, None).await.unwrap();
        let err = f.market.carts.add_item(ana.clone(), kopi, 1, None).await.unwrap_err();
        assert!(matches!(err, CartError::VendorMismatch { .. }));

        let cart = f.market.carts.set_quantity(ana.clone(), f.noodles.clone(), 0).await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.vendor_id, None);
    }

    #[tokio::test]
    async fn concurrent_resubmit_with_single_use_voucher_replays() {
        let f = market().await;
        f.market
            .vouchers
            .create_voucher(VoucherCreate {
                code: "ONCE".into(),
                vendor_id: None,
                rule: DiscountRule::Fixed { amount: Decimal::from(1) },
                min_order: None,
                max_discount: None,
                usage_limit: None,
                per_user_limit: Some(1),
                valid_from: noon(1),
                valid_until: noon(30),
            })
            .await
            .unwrap();
        let ana = customer(&f.market, "ana").await;
        f.market.carts.add_item(ana.clone(), f.noodles.clone(), 1, None).await.unwrap();
        f.market.carts.apply_voucher(ana.clone(), "once".into(), noon(16)).await.unwrap();

        let orders = &f.market.orders;
        let (a, b) = tokio::join!(
            orders.checkout(checkout_req(&ana, Some("tap-1"), noon(16))),
            orders.checkout(checkout_req(&ana, Some("tap-1"), noon(16))),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.order.id, b.order.id);
        assert_eq!(a.queue_number, b.queue_number);
        assert!(a.replayed != b.replayed);
        assert_eq!(a.order.discount, Decimal::from(1));
        assert_eq!(orders.orders_for_customer(ana).await.unwrap().len(), 1);
        assert_eq!(f.market.vouchers.find_by_code("ONCE").await.unwrap().used_count, 1);
    }

    #[tokio::test]
    async fn order_keeps_its_prices_and_reorder_uses_todays() {
        let f = market().await;
        let ana = customer(&f.market, "ana").await;
        f.market.carts.add_item(ana.clone(), f.noodles.clone(), 2, None).await.unwrap();
        let placed = f.market.orders.checkout(checkout_req(&ana, None, noon(16))).await.unwrap().order;
        assert_eq!(placed.items[0].unit_price, Decimal::new(550, 2));
        assert_eq!(placed.total, Decimal::new(1300, 2));

        f.market
            .menu
            .update_menu_item(
                f.noodles.clone(),
                MenuItemPatch {
                    price: Some(Decimal::new(600, 2)),
                    ..MenuItemPatch::default()
                },
            )
            .await
            .unwrap();

        let vendor = Requester::Vendor(f.vendor_id.clone());
        for t in [
            Transition::Accept,
            Transition::StartPreparing,
            Transition::MarkReady,
            Transition::Complete,
        ] {
            f.market.orders.transition(placed.id.clone(), vendor.clone(), t, noon(16)).await.unwrap();
        }

        let stored = f.market.orders.fetch_order(placed.id.clone()).await.unwrap();
        assert_eq!(stored.items, placed.items);
        assert_eq!(stored.items[0].unit_price, Decimal::new(550, 2));
        assert_eq!(stored.total, placed.total);

        let outcome = f.market.orders.reorder(placed.id, ana.clone()).await.unwrap();
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.cart.items[0].unit_price, Decimal::new(600, 2));
        let quote = f.market.carts.quote(ana, noon(16)).await.unwrap();
        assert_eq!(quote.total, Decimal::new(1400, 2));
    }

    #[tokio::test]
    async fn vendor_lists_orders_by_status() {
        let f = market().await;
        let mut placed = Vec::new();
        for name in ["ana", "ben", "cai"] {
            let user = customer(&f.market, name).await;
            f.market.carts.add_item(user.clone(), f.tea.clone(), 1, None).await.unwrap();
            placed.push(f.market.orders.checkout(checkout_req(&user, None, noon(16))).await.unwrap().order.id);
        }
        f.market
            .orders
            .transition(placed[1].clone(), Requester::Vendor(f.vendor_id.clone()), Transition::Accept, noon(16))
            .await
            .unwrap();

        let ids = |orders: Vec<Order>| orders.into_iter().map(|o| o.id).collect::<Vec<_>>();
        let orders = &f.market.orders;
        assert_eq!(ids(orders.orders_for_vendor(f.vendor_id.clone(), None).await.unwrap()), placed);
        assert_eq!(
            ids(orders.orders_for_vendor(f.vendor_id.clone(), Some(OrderStatus::Pending)).await.unwrap()),
            vec![placed[0].clone(), placed[2].clone()]
        );
        assert_eq!(
            ids(orders.orders_for_vendor(f.vendor_id.clone(), Some(OrderStatus::Confirmed)).await.unwrap()),
            vec![placed[1].clone()]
        );
        assert!(orders
            .orders_for_vendor("vendor_99".into(), None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn cart_edits_and_voucher_switches() {
        let f = market().await;
        f.market
            .vouchers
            .create_voucher(VoucherCreate {
                code: "TEA".into(),
                vendor_id: Some(f.vendor_id.clone()),
                rule: DiscountRule::Fixed { amount: Decimal::new(50, 2) },
                min_order: None,
                max_discount: None,
                usage_limit: Some(5),
                per_user_limit: None,
                valid_from: noon(1),
                valid_until: noon(30),
            })
            .await
            .unwrap();
        let ana = customer(&f.market, "ana").await;
        let carts = &f.market.carts;
        carts.add_item(ana.clone(), f.noodles.clone(), 1, None).await.unwrap();
        carts.add_item(ana.clone(), f.tea.clone(), 2, None).await.unwrap();

        let cart = carts
            .set_instructions(ana.clone(), f.noodles.clone(), Some("no spring onion".into()))
            .await
            .unwrap();
        assert_eq!(cart.items[0].instructions.as_deref(), Some("no spring onion"));
        let cart = carts.remove_item(ana.clone(), f.tea.clone()).await.unwrap();
        assert_eq!(cart.items.len(), 1);

        assert!(f.market.vouchers.set_active("tea", false).await.unwrap());
        let err = carts.apply_voucher(ana.clone(), "tea".into(), noon(16)).await.unwrap_err();
        assert_eq!(err, CartError::Voucher(VoucherError::Inactive("TEA".into())));
        assert!(f.market.vouchers.set_active("tea", true).await.unwrap());

        let (cart, discount) = carts.apply_voucher(ana.clone(), "tea".into(), noon(16)).await.unwrap();
        assert_eq!(cart.voucher_code.as_deref(), Some("TEA"));
        assert_eq!(discount, Decimal::new(50, 2));

        // Ending the voucher early drops it from the quote but leaves it attached.
        let voucher = f.market.vouchers.find_by_code("tea").await.unwrap();
        f.market
            .vouchers
            .update_voucher(
                voucher.id,
                VoucherPatch {
                    valid_until: Some(noon(10)),
                    ..VoucherPatch::default()
                },
            )
            .await
            .unwrap();
        let quote = carts.quote(ana.clone(), noon(16)).await.unwrap();
        assert_eq!(quote.discount, Decimal::ZERO);
        assert_eq!(quote.total, Decimal::new(750, 2));

        let cart = carts.remove_voucher(ana.clone()).await.unwrap();
        assert_eq!(cart.voucher_code, None);
        let receipt = f.market.orders.checkout(checkout_req(&ana, None, noon(16))).await.unwrap();
        assert_eq!(receipt.order.voucher_code, None);
        assert_eq!(receipt.order.items[0].instructions.as_deref(), Some("no spring onion"));
    }

    #[tokio::test]
    async fn published_hours_gate_checkout() {
        let f = market().await;
        let at = |h: u32| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        // The 16th is a Friday; the default market clock is UTC.
        let vendor = f
            .market
            .vendors
            .replace_hours(f.vendor_id.clone(), vec![OperatingHours::new(Weekday::Fri, at(7), at(11))])
            .await
            .unwrap();
        assert_eq!(vendor.hours.len(), 1);

        let ana = customer(&f.market, "ana").await;
        f.market.carts.add_item(ana.clone(), f.tea.clone(), 1, None).await.unwrap();
        let err = f.market.orders.checkout(checkout_req(&ana, None, noon(16))).await.unwrap_err();
        assert_eq!(err, OrderError::Vendor(VendorError::Closed(f.vendor_id.clone())));

        f.market
            .vendors
            .replace_hours(f.vendor_id.clone(), vec![OperatingHours::new(Weekday::Fri, at(11), at(14))])
            .await
            .unwrap();
        assert!(f.market.orders.checkout(checkout_req(&ana, None, noon(16))).await.is_ok());
    }

    #[tokio::test]
    async fn shutdown_stops_every_actor() {
        let f = market().await;
        f.market.shutdown().await.unwrap();
    }
}

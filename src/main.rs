mod domain;
mod engine;

mod actor_framework;
mod user_actor;
mod messages;
mod market_service;
mod clients;

mod app_system;

#[cfg(test)]
mod mock_framework;

use tracing::{debug, error, info, warn, Instrument};

use crate::app_system::{
    seed_demo, setup_tracing, AppConfig, DemoData, KoperasiSystem, SystemError, ADMIN_EMAIL,
    BALI_VENDOR_EMAIL, BUYER_EMAIL, DEMO_PASSWORD,
};
use crate::domain::PaymentMethod;

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let config = AppConfig::from_env();
    setup_tracing(&config);

    info!("Starting Koperasi marketplace");
    let system = KoperasiSystem::new(&config);

    if config.seed_demo {
        let demo = seed_demo(&system).await?;
        walk_through(&system, &demo).await?;
    } else {
        info!("Demo seeding disabled, nothing to walk through");
    }

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}

/// Plays one buyer, one vendor and the admin through a full day of trading.
async fn walk_through(system: &KoperasiSystem, demo: &DemoData) -> Result<(), SystemError> {
    let span = tracing::info_span!("cart_checkout");
    let order_ids = async {
        let mut budi = system.login(BUYER_EMAIL, DEMO_PASSWORD).await?;
        info!(screens = ?budi.screens(), "Buyer logged in");
        let catalog = system.market.list_products().await?;
        info!(products = catalog.len(), "Marketplace loaded");

        let mistake = budi
            .add_to_cart(demo.nusa_penida.clone(), 1, Some("Siang (11:00)".into()), String::new())
            .await?;
        budi.remove_from_cart(&mistake.line_id);
        budi.add_to_cart(demo.nusa_penida.clone(), 2, Some("Pagi (08:00)".into()), "Jemput di hotel".into())
            .await?;
        budi.add_to_cart(demo.hiace.clone(), 1, Some("Dengan Supir".into()), String::new())
            .await?;
        info!(total = ?budi.cart().total(), "Cart ready");

        if let Err(e) = budi.checkout(PaymentMethod::Qris, None).await {
            warn!(error = %e, "Checkout without proof refused, cart kept");
        }
        let order_ids = budi.checkout(PaymentMethod::Qris, Some("bukti_transfer.jpg".into())).await?;
        budi.logout();
        Ok::<_, SystemError>(order_ids)
    }
    .instrument(span)
    .await?;
    info!(orders = ?order_ids, "Cart orders placed");

    let span = tracing::info_span!("vendor_fulfilment");
    async {
        let bali = system.login(BALI_VENDOR_EMAIL, DEMO_PASSWORD).await?;
        let market = &system.market;
        let listed = market.list_vendor_products(bali.actor().id.clone()).await?;
        let board = market.list_open_requests().await?;
        for request in &board {
            let own = market
                .get_vendor_offer(request.id.clone(), bali.actor().id.clone())
                .await?;
            info!(request_id = %request.id, budget = request.budget, offered = own.is_some(), "Tender board entry");
        }
        info!(products = listed.len(), open_requests = board.len(), "Vendor dashboard loaded");

        for mut order in market.list_orders(bali.actor().clone()).await? {
            while let Some(transition) = order.status.next_transition() {
                order = market
                    .advance_order(bali.actor().clone(), order.id.clone(), transition)
                    .await?;
                info!(
                    order_id = %order.id,
                    status = %order.status,
                    label = order.status.label(),
                    done = order.status.is_terminal(),
                    "Order advanced"
                );
            }
        }
        Ok::<_, SystemError>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("offer_acceptance");
    async {
        let budi = system.login(BUYER_EMAIL, DEMO_PASSWORD).await?;
        let mine = system.market.list_buyer_requests(budi.actor().id.clone()).await?;
        for request in &mine {
            let offers = system.market.list_offers(request.id.clone()).await?;
            info!(request_id = %request.id, status = ?request.status, offers = offers.len(), "Own request");
        }

        let order_id = system
            .market
            .accept_offer(budi.actor().clone(), demo.request_id.clone(), demo.offer_id.clone())
            .await?;
        if let Some(order) = system.market.get_order(order_id.clone()).await? {
            info!(%order_id, vendor = %order.vendor_name, total = order.total_price, status = %order.status, "Offer accepted");
        }

        match system
            .market
            .accept_offer(budi.actor().clone(), demo.request_id.clone(), demo.offer_id.clone())
            .await
        {
            Ok(order_id) => error!(%order_id, "Request accepted twice"),
            Err(e) => info!(error = %e, "Second acceptance refused"),
        }
        Ok::<_, SystemError>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("admin_review");
    async {
        let admin = system.identity.login(ADMIN_EMAIL, DEMO_PASSWORD).await?;
        let users = system.identity.list_users(&admin).await?;
        let requests = system.market.list_all_requests(admin.clone()).await?;
        let orders = system.market.list_orders(admin.clone()).await?;
        info!(users = users.len(), requests = requests.len(), orders = orders.len(), "Ledger reviewed");

        if let Some(first) = orders.first() {
            if let Some(buyer) = system.identity.get_user(first.buyer_id.clone()).await? {
                info!(order_id = %first.id, buyer = %buyer.name, "Buyer looked up");
            }
        }
        if let Err(e) = system.identity.delete_user(&admin, admin.id.clone()).await {
            info!(error = %e, "Self-deletion refused");
        }
        Ok::<_, SystemError>(())
    }
    .instrument(span)
    .await?;

    let snapshot = system.market.snapshot().await?;
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => debug!("Final market state:\n{json}"),
        Err(e) => warn!(error = %e, "Could not render market snapshot"),
    }
    Ok(())
}

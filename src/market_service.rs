//! The actor that owns the [`Marketplace`].
//!
//! All reads and writes go through its mailbox, so every lifecycle
//! operation runs to completion before the next message is looked at. That
//! serial mailbox is what keeps stock non-negative and a request from being
//! accepted twice when many sessions talk to the same market.

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::clients::MarketClient;
use crate::domain::{Actor, OfferCreate, Order, OrderTransition, ProductCreate, RequestCreate};
use crate::engine::{CheckoutCommit, MarketError, Marketplace};
use crate::messages::{MarketRequest, ServiceResponse};

pub struct MarketService {
    receiver: mpsc::Receiver<MarketRequest>,
    market: Marketplace,
}

impl MarketService {
    pub fn new(buffer_size: usize) -> (Self, MarketClient) {
        Self::with_market(buffer_size, Marketplace::new())
    }

    pub fn with_market(buffer_size: usize, market: Marketplace) -> (Self, MarketClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self { receiver, market };
        (service, MarketClient::new(sender))
    }

    #[instrument(name = "market_service", skip(self))]
    pub async fn run(mut self) {
        info!("MarketService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                MarketRequest::CreateProduct { actor, product, respond_to } => {
                    self.handle_create_product(actor, product, respond_to);
                }
                MarketRequest::GetProduct { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.market.product(&id).cloned()));
                }
                MarketRequest::ListProducts { respond_to } => {
                    let _ = respond_to.send(Ok(self.market.products().to_vec()));
                }
                MarketRequest::ListVendorProducts { vendor_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.market.vendor_products(&vendor_id)));
                }
                MarketRequest::Checkout { actor, commit, respond_to } => {
                    self.handle_checkout(actor, commit, respond_to);
                }
                MarketRequest::PostRequest { actor, request, respond_to } => {
                    self.handle_post_request(actor, request, respond_to);
                }
                MarketRequest::SubmitOffer { actor, request_id, offer, respond_to } => {
                    self.handle_submit_offer(actor, request_id, offer, respond_to);
                }
                MarketRequest::AcceptOffer { actor, request_id, offer_id, respond_to } => {
                    self.handle_accept_offer(actor, request_id, offer_id, respond_to);
                }
                MarketRequest::ListOpenRequests { respond_to } => {
                    let _ = respond_to.send(Ok(self.market.open_requests()));
                }
                MarketRequest::ListBuyerRequests { buyer_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.market.buyer_requests(&buyer_id)));
                }
                MarketRequest::ListAllRequests { actor, respond_to } => {
                    let _ = respond_to.send(self.market.all_requests(&actor));
                }
                MarketRequest::ListOffers { request_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.market.offers_for(&request_id)));
                }
                MarketRequest::GetVendorOffer { request_id, vendor_id, respond_to } => {
                    let offer = self.market.vendor_offer(&request_id, &vendor_id).cloned();
                    let _ = respond_to.send(Ok(offer));
                }
                MarketRequest::AdvanceOrder { actor, order_id, transition, respond_to } => {
                    self.handle_advance_order(actor, order_id, transition, respond_to);
                }
                MarketRequest::GetOrder { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.market.order(&id).cloned()));
                }
                MarketRequest::ListOrders { actor, respond_to } => {
                    let _ = respond_to.send(Ok(self.market.orders_for(&actor)));
                }
                MarketRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.market.snapshot()));
                }
                MarketRequest::Shutdown => {
                    info!("MarketService shutting down");
                    break;
                }
                #[cfg(test)]
                MarketRequest::GetOrderCount { respond_to } => {
                    let _ = respond_to.send(Ok(self.market.snapshot().orders.len()));
                }
            }
        }
        info!("MarketService stopped");
    }

    #[instrument(fields(vendor_id = %actor.id), skip(self, actor, product, respond_to))]
    fn handle_create_product(
        &mut self,
        actor: Actor,
        product: ProductCreate,
        respond_to: ServiceResponse<String, MarketError>,
    ) {
        debug!("Processing create_product request");
        let result = self.market.create_product(&actor, product);
        respond(result, respond_to);
    }

    #[instrument(fields(buyer_id = %actor.id), skip(self, actor, commit, respond_to))]
    fn handle_checkout(
        &mut self,
        actor: Actor,
        commit: CheckoutCommit,
        respond_to: ServiceResponse<Vec<String>, MarketError>,
    ) {
        debug!("Processing checkout request");
        let result = self.market.commit_checkout(&actor, &commit);
        respond(result, respond_to);
    }

    #[instrument(fields(buyer_id = %actor.id), skip(self, actor, request, respond_to))]
    fn handle_post_request(
        &mut self,
        actor: Actor,
        request: RequestCreate,
        respond_to: ServiceResponse<String, MarketError>,
    ) {
        debug!("Processing post_request request");
        let result = self.market.post_request(&actor, request);
        respond(result, respond_to);
    }

    #[instrument(fields(vendor_id = %actor.id, request = %request_id), skip(self, actor, request_id, offer, respond_to))]
    fn handle_submit_offer(
        &mut self,
        actor: Actor,
        request_id: String,
        offer: OfferCreate,
        respond_to: ServiceResponse<String, MarketError>,
    ) {
        debug!("Processing submit_offer request");
        let result = self.market.submit_offer(&actor, &request_id, offer);
        respond(result, respond_to);
    }

    #[instrument(fields(buyer_id = %actor.id, request = %request_id, offer = %offer_id), skip(self, actor, request_id, offer_id, respond_to))]
    fn handle_accept_offer(
        &mut self,
        actor: Actor,
        request_id: String,
        offer_id: String,
        respond_to: ServiceResponse<String, MarketError>,
    ) {
        debug!("Processing accept_offer request");
        let result = self.market.accept_offer(&actor, &request_id, &offer_id);
        respond(result, respond_to);
    }

    #[instrument(fields(vendor_id = %actor.id, order = %order_id, step = %transition), skip(self, actor, order_id, transition, respond_to))]
    fn handle_advance_order(
        &mut self,
        actor: Actor,
        order_id: String,
        transition: OrderTransition,
        respond_to: ServiceResponse<Order, MarketError>,
    ) {
        debug!("Processing advance_order request");
        let result = self.market.advance_order(&actor, &order_id, transition);
        respond(result, respond_to);
    }
}

fn respond<T>(result: Result<T, MarketError>, respond_to: ServiceResponse<T, MarketError>) {
    if let Err(e) = &result {
        warn!(error = %e, "Request rejected");
    }
    let _ = respond_to.send(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    /// Test-only messages let us read the actor's internal state.
    #[tokio::test]
    async fn test_market_service_internal_state() -> Result<(), Box<dyn std::error::Error>> {
        let (service, client) = MarketService::new(10);
        let handle = tokio::spawn(service.run());

        assert_eq!(client.get_order_count().await?, 0);

        let buyer = Actor::new("user_4", "Budi Wisatawan", Role::Buyer);
        let request_id = client
            .post_request(buyer.clone(), RequestCreate::new("Hotel Ubud", "2 malam", 3_000_000))
            .await?;
        let vendor = Actor::new("user_2", "Bali Tour Travel", Role::Vendor);
        let offer_id = client
            .submit_offer(vendor, request_id.clone(), OfferCreate::new(2_800_000, "Villa"))
            .await?;
        client.accept_offer(buyer, request_id, offer_id).await?;

        assert_eq!(client.get_order_count().await?, 1);

        client.shutdown().await?;
        handle.await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_rejections_reach_the_caller() {
        let (service, client) = MarketService::new(10);
        tokio::spawn(service.run());

        let vendor = Actor::new("user_2", "Bali Tour Travel", Role::Vendor);
        let err = client
            .post_request(vendor, RequestCreate::new("Villa", "x", 100))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Forbidden { .. }));
    }
}

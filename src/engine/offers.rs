use chrono::Utc;
use tracing::{info, instrument, warn};

use super::authz::{require, Permission};
use super::error::MarketError;
use super::Marketplace;
use crate::domain::{
    Actor, Offer, OfferCreate, OfferStatus, Order, OrderSource, OrderStatus, PaymentMethod,
    Request, RequestCreate, RequestStatus, CUSTOM_REQUEST_VARIANT,
};

impl Marketplace {
    #[instrument(skip(self, actor, payload), fields(buyer_id = %actor.id, budget = payload.budget))]
    pub fn post_request(
        &mut self,
        actor: &Actor,
        payload: RequestCreate,
    ) -> Result<String, MarketError> {
        require(actor, Permission::PostRequest)?;
        if payload.title.trim().is_empty() {
            return Err(MarketError::ValidationError("request title is required".into()));
        }
        if payload.budget == 0 {
            return Err(MarketError::ValidationError("budget must be positive".into()));
        }

        let id = self.request_ids.next();
        self.requests.push(Request {
            id: id.clone(),
            buyer_id: actor.id.clone(),
            buyer_name: actor.name.clone(),
            title: payload.title,
            description: payload.description,
            budget: payload.budget,
            status: RequestStatus::Open,
            created_at: Utc::now(),
        });
        info!(request_id = %id, "Request posted");
        Ok(id)
    }

    #[instrument(skip(self, actor, payload), fields(vendor_id = %actor.id, price = payload.price))]
    pub fn submit_offer(
        &mut self,
        actor: &Actor,
        request_id: &str,
        payload: OfferCreate,
    ) -> Result<String, MarketError> {
        require(actor, Permission::SubmitOffer)?;
        let request = self
            .request(request_id)
            .ok_or_else(|| MarketError::RequestNotFound(request_id.to_string()))?;
        if !request.is_open() {
            return Err(MarketError::RequestNotOpen(request_id.to_string()));
        }
        if payload.price == 0 {
            return Err(MarketError::ValidationError("offer price must be positive".into()));
        }
        if self.vendor_offer(request_id, &actor.id).is_some() {
            return Err(MarketError::DuplicateOffer {
                vendor_id: actor.id.clone(),
                request_id: request_id.to_string(),
            });
        }

        let id = self.offer_ids.next();
        self.offers.push(Offer {
            id: id.clone(),
            request_id: request_id.to_string(),
            vendor_id: actor.id.clone(),
            vendor_name: actor.name.clone(),
            price: payload.price,
            message: payload.message,
            status: OfferStatus::Pending,
        });
        info!(offer_id = %id, "Offer submitted");
        Ok(id)
    }

    /// Closes the request, accepts the chosen offer and opens an order for it
    /// directly at `diproses`. Sibling offers are left pending.
    #[instrument(skip(self, actor), fields(buyer_id = %actor.id))]
    pub fn accept_offer(
        &mut self,
        actor: &Actor,
        request_id: &str,
        offer_id: &str,
    ) -> Result<String, MarketError> {
        require(actor, Permission::AcceptOffer)?;

        let req_idx = self
            .requests
            .iter()
            .position(|r| r.id == request_id)
            .ok_or_else(|| MarketError::RequestNotFound(request_id.to_string()))?;
        let offer_idx = self
            .offers
            .iter()
            .position(|o| o.id == offer_id)
            .ok_or_else(|| MarketError::OfferNotFound(offer_id.to_string()))?;

        let request = &self.requests[req_idx];
        let offer = &self.offers[offer_idx];
        if request.buyer_id != actor.id {
            return Err(MarketError::forbidden(actor.role, "accept offers on another buyer's request"));
        }
        if !request.is_open() {
            warn!("Request already closed");
            return Err(MarketError::RequestNotOpen(request_id.to_string()));
        }
        if offer.request_id != request_id {
            return Err(MarketError::OfferMismatch {
                offer_id: offer_id.to_string(),
                request_id: request_id.to_string(),
            });
        }
        if offer.status != OfferStatus::Pending {
            return Err(MarketError::OfferNotPending(offer_id.to_string()));
        }

        let order = Order {
            id: self.order_ids.next(),
            source: OrderSource::Offer,
            source_item_id: request.id.clone(),
            source_item_name: format!("[REQUEST] {}", request.title),
            buyer_id: actor.id.clone(),
            buyer_name: actor.name.clone(),
            vendor_id: offer.vendor_id.clone(),
            vendor_name: offer.vendor_name.clone(),
            unit_price: offer.price,
            total_price: offer.price,
            quantity: 1,
            variant: Some(CUSTOM_REQUEST_VARIANT.to_string()),
            note: "-".to_string(),
            payment_method: PaymentMethod::ManualAgreement,
            payment_proof: None,
            created_at: Utc::now(),
            status: OrderStatus::Diproses,
        };

        self.requests[req_idx].status = RequestStatus::Closed;
        self.offers[offer_idx].status = OfferStatus::Accepted;
        let order_id = order.id.clone();
        self.orders.push(order);

        info!(request_id, offer_id, order_id = %order_id, "Offer accepted");
        Ok(order_id)
    }
}

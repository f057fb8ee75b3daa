use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{
    Actor, Offer, OfferCreate, Order, OrderTransition, Product, ProductCreate, Request,
    RequestCreate,
};
use crate::engine::{CheckoutCommit, MarketError, MarketSnapshot};
use crate::messages::MarketRequest;

/// Handle to the market service. Cheap to clone; every session holds one.
#[derive(Clone)]
pub struct MarketClient {
    sender: mpsc::Sender<MarketRequest>,
}

impl MarketClient {
    pub fn new(sender: mpsc::Sender<MarketRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), MarketError> {
        debug!("Sending shutdown");
        self.sender
            .send(MarketRequest::Shutdown)
            .await
            .map_err(|_| MarketError::ActorCommunicationError("Actor closed".to_string()))
    }
}

// catalog
client_method!(MarketClient => fn create_product(actor: Actor, product: ProductCreate) -> String as MarketRequest::CreateProduct, Error = MarketError);
client_method!(MarketClient => fn get_product(id: String) -> Option<Product> as MarketRequest::GetProduct, Error = MarketError);
client_method!(MarketClient => fn list_products() -> Vec<Product> as MarketRequest::ListProducts, Error = MarketError);
client_method!(MarketClient => fn list_vendor_products(vendor_id: String) -> Vec<Product> as MarketRequest::ListVendorProducts, Error = MarketError);

// checkout
client_method!(MarketClient => fn checkout(actor: Actor, commit: CheckoutCommit) -> Vec<String> as MarketRequest::Checkout, Error = MarketError);

// requests and offers
client_method!(MarketClient => fn post_request(actor: Actor, request: RequestCreate) -> String as MarketRequest::PostRequest, Error = MarketError);
client_method!(MarketClient => fn submit_offer(actor: Actor, request_id: String, offer: OfferCreate) -> String as MarketRequest::SubmitOffer, Error = MarketError);
client_method!(MarketClient => fn accept_offer(actor: Actor, request_id: String, offer_id: String) -> String as MarketRequest::AcceptOffer, Error = MarketError);
client_method!(MarketClient => fn list_open_requests() -> Vec<Request> as MarketRequest::ListOpenRequests, Error = MarketError);
client_method!(MarketClient => fn list_buyer_requests(buyer_id: String) -> Vec<Request> as MarketRequest::ListBuyerRequests, Error = MarketError);
client_method!(MarketClient => fn list_all_requests(actor: Actor) -> Vec<Request> as MarketRequest::ListAllRequests, Error = MarketError);
client_method!(MarketClient => fn list_offers(request_id: String) -> Vec<Offer> as MarketRequest::ListOffers, Error = MarketError);
client_method!(MarketClient => fn get_vendor_offer(request_id: String, vendor_id: String) -> Option<Offer> as MarketRequest::GetVendorOffer, Error = MarketError);

// ledger
client_method!(MarketClient => fn advance_order(actor: Actor, order_id: String, transition: OrderTransition) -> Order as MarketRequest::AdvanceOrder, Error = MarketError);
client_method!(MarketClient => fn get_order(id: String) -> Option<Order> as MarketRequest::GetOrder, Error = MarketError);
client_method!(MarketClient => fn list_orders(actor: Actor) -> Vec<Order> as MarketRequest::ListOrders, Error = MarketError);
client_method!(MarketClient => fn snapshot() -> MarketSnapshot as MarketRequest::Snapshot, Error = MarketError);

// Test-only message for reading actor internals
#[cfg(test)]
client_method!(MarketClient => fn get_order_count() -> usize as MarketRequest::GetOrderCount, Error = MarketError);

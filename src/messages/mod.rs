use tokio::sync::oneshot;
use crate::domain::{
    Actor, Offer, OfferCreate, Order, OrderTransition, Product, ProductCreate, Request,
    RequestCreate,
};
use crate::engine::{CheckoutCommit, MarketError, MarketSnapshot};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

type Reply<T> = ServiceResponse<T, MarketError>;

/// Typed messages for the market service. Each variant carries its parameters
/// and a oneshot channel for the response. Mutating variants also carry the
/// acting identity.
#[derive(Debug)]
pub enum MarketRequest {
    // --- catalog ---
    CreateProduct {
        actor: Actor,
        product: ProductCreate,
        respond_to: Reply<String>,
    },
    GetProduct {
        id: String,
        respond_to: Reply<Option<Product>>,
    },
    ListProducts {
        respond_to: Reply<Vec<Product>>,
    },
    ListVendorProducts {
        vendor_id: String,
        respond_to: Reply<Vec<Product>>,
    },

    // --- checkout ---
    Checkout {
        actor: Actor,
        commit: CheckoutCommit,
        respond_to: Reply<Vec<String>>,
    },

    // --- requests and offers ---
    PostRequest {
        actor: Actor,
        request: RequestCreate,
        respond_to: Reply<String>,
    },
    SubmitOffer {
        actor: Actor,
        request_id: String,
        offer: OfferCreate,
        respond_to: Reply<String>,
    },
    AcceptOffer {
        actor: Actor,
        request_id: String,
        offer_id: String,
        respond_to: Reply<String>,
    },
    ListOpenRequests {
        respond_to: Reply<Vec<Request>>,
    },
    ListBuyerRequests {
        buyer_id: String,
        respond_to: Reply<Vec<Request>>,
    },
    ListAllRequests {
        actor: Actor,
        respond_to: Reply<Vec<Request>>,
    },
    ListOffers {
        request_id: String,
        respond_to: Reply<Vec<Offer>>,
    },
    GetVendorOffer {
        request_id: String,
        vendor_id: String,
        respond_to: Reply<Option<Offer>>,
    },

    // --- ledger ---
    AdvanceOrder {
        actor: Actor,
        order_id: String,
        transition: OrderTransition,
        respond_to: Reply<Order>,
    },
    GetOrder {
        id: String,
        respond_to: Reply<Option<Order>>,
    },
    ListOrders {
        actor: Actor,
        respond_to: Reply<Vec<Order>>,
    },
    Snapshot {
        respond_to: Reply<MarketSnapshot>,
    },

    Shutdown,
    #[cfg(test)]
    GetOrderCount {
        respond_to: Reply<usize>,
    },
}

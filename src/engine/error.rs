use std::fmt;

use thiserror::Error;

use crate::domain::{OrderStatus, OrderTransition, Role};

/// One product whose committed quantity exceeds its stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortfall {
    pub product_id: String,
    pub product_name: String,
    pub requested: u32,
    pub available: u32,
    /// Cart lines drawing on this product.
    pub line_ids: Vec<String>,
}

impl fmt::Display for StockShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): requested {}, available {}",
            self.product_name, self.product_id, self.requested, self.available
        )
    }
}

fn list_shortfalls(shortfalls: &[StockShortfall]) -> String {
    shortfalls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised by the marketplace lifecycle engine.
///
/// Every failing operation leaves the store exactly as it was.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MarketError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Request not found: {0}")]
    RequestNotFound(String),
    #[error("Offer not found: {0}")]
    OfferNotFound(String),
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Insufficient stock: {}", list_shortfalls(.shortfalls))]
    InsufficientStock { shortfalls: Vec<StockShortfall> },
    #[error("Payment proof is required")]
    MissingPaymentProof,
    #[error("Request is not open: {0}")]
    RequestNotOpen(String),
    #[error("Offer {offer_id} does not belong to request {request_id}")]
    OfferMismatch { offer_id: String, request_id: String },
    #[error("Offer is not pending: {0}")]
    OfferNotPending(String),
    #[error("Vendor {vendor_id} already made an offer on request {request_id}")]
    DuplicateOffer { vendor_id: String, request_id: String },
    #[error("Cannot {attempted} order {order_id} while it is {from}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        attempted: OrderTransition,
    },
    #[error("Role {role} may not {action}")]
    Forbidden { role: Role, action: String },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl MarketError {
    pub(crate) fn forbidden(role: Role, action: impl Into<String>) -> Self {
        MarketError::Forbidden {
            role,
            action: action.into(),
        }
    }
}

//! The marketplace lifecycle engine.
//!
//! [`Marketplace`] is the single store for catalog, requests, offers and the
//! order ledger. Every operation takes the acting identity explicitly and
//! either applies completely or returns an error with the store untouched.
//! The engine is synchronous; the market service owns it and feeds it one
//! message at a time.

pub mod authz;
pub mod cart;
mod checkout;
pub mod error;
mod offers;
mod orders;

pub use authz::{Permission, Screen};
pub use cart::{AddOutcome, Cart};
pub use checkout::CheckoutCommit;
pub use error::MarketError;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::domain::{
    Actor, Offer, Order, Product, ProductCreate, Request, Role, DEFAULT_PRODUCT_IMAGE,
};
use authz::require;

/// Monotonic id source, `"<prefix>_<n>"` starting at 1.
#[derive(Debug)]
struct IdSequence {
    prefix: &'static str,
    issued: u64,
}

impl IdSequence {
    fn new(prefix: &'static str) -> Self {
        Self { prefix, issued: 0 }
    }

    fn next(&mut self) -> String {
        self.issued += 1;
        format!("{}_{}", self.prefix, self.issued)
    }
}

/// Serializable view of the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub products: Vec<Product>,
    pub requests: Vec<Request>,
    pub offers: Vec<Offer>,
    pub orders: Vec<Order>,
}

#[derive(Debug)]
pub struct Marketplace {
    products: Vec<Product>,
    requests: Vec<Request>,
    offers: Vec<Offer>,
    orders: Vec<Order>,
    product_ids: IdSequence,
    request_ids: IdSequence,
    offer_ids: IdSequence,
    order_ids: IdSequence,
}

impl Default for Marketplace {
    fn default() -> Self {
        Self::new()
    }
}

impl Marketplace {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            requests: Vec::new(),
            offers: Vec::new(),
            orders: Vec::new(),
            product_ids: IdSequence::new("product"),
            request_ids: IdSequence::new("request"),
            offer_ids: IdSequence::new("offer"),
            order_ids: IdSequence::new("order"),
        }
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    #[instrument(skip(self, actor, payload), fields(vendor_id = %actor.id, product_name = %payload.name))]
    pub fn create_product(
        &mut self,
        actor: &Actor,
        payload: ProductCreate,
    ) -> Result<String, MarketError> {
        require(actor, Permission::ListProduct)?;
        if payload.name.trim().is_empty() {
            return Err(MarketError::ValidationError("product name is required".into()));
        }
        if payload.price == 0 {
            return Err(MarketError::ValidationError("price must be positive".into()));
        }

        let id = self.product_ids.next();
        self.products.push(Product {
            id: id.clone(),
            vendor_id: actor.id.clone(),
            vendor_name: actor.name.clone(),
            name: payload.name,
            price: payload.price,
            category: payload.category,
            image: payload
                .image
                .filter(|img| !img.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PRODUCT_IMAGE.to_string()),
            description: payload.description,
            stock: payload.stock,
            variants: payload.variants,
        });
        info!(product_id = %id, "Product listed");
        Ok(id)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn vendor_products(&self, vendor_id: &str) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.vendor_id == vendor_id)
            .cloned()
            .collect()
    }

    // -------------------------------------------------------------------------
    // Requests and offers (read side)
    // -------------------------------------------------------------------------

    pub fn request(&self, id: &str) -> Option<&Request> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// The vendor tender board.
    pub fn open_requests(&self) -> Vec<Request> {
        self.requests.iter().filter(|r| r.is_open()).cloned().collect()
    }

    pub fn buyer_requests(&self, buyer_id: &str) -> Vec<Request> {
        self.requests
            .iter()
            .filter(|r| r.buyer_id == buyer_id)
            .cloned()
            .collect()
    }

    pub fn all_requests(&self, actor: &Actor) -> Result<Vec<Request>, MarketError> {
        require(actor, Permission::ViewAllRequests)?;
        Ok(self.requests.clone())
    }

    pub fn offers_for(&self, request_id: &str) -> Vec<Offer> {
        self.offers
            .iter()
            .filter(|o| o.request_id == request_id)
            .cloned()
            .collect()
    }

    pub fn vendor_offer(&self, request_id: &str, vendor_id: &str) -> Option<&Offer> {
        self.offers
            .iter()
            .find(|o| o.request_id == request_id && o.vendor_id == vendor_id)
    }

    // -------------------------------------------------------------------------
    // Ledger (read side)
    // -------------------------------------------------------------------------

    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Orders visible to `actor`: a vendor sees what they sold, a buyer what
    /// they bought, an admin the whole ledger.
    pub fn orders_for(&self, actor: &Actor) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|o| match actor.role {
                Role::Vendor => o.vendor_id == actor.id,
                Role::Buyer => o.buyer_id == actor.id,
                Role::Admin => true,
            })
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            products: self.products.clone(),
            requests: self.requests.clone(),
            offers: self.offers.clone(),
            orders: self.orders.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::domain::Category;

    pub fn admin() -> Actor {
        Actor::new("user_1", "Admin Koperasi", Role::Admin)
    }

    pub fn bali_tour() -> Actor {
        Actor::new("user_2", "Bali Tour Travel", Role::Vendor)
    }

    pub fn jogja_transport() -> Actor {
        Actor::new("user_3", "Jogja Transport", Role::Vendor)
    }

    pub fn budi() -> Actor {
        Actor::new("user_4", "Budi Wisatawan", Role::Buyer)
    }

    /// A store holding one product from `bali_tour` with the given stock.
    pub fn market_with_stock(stock: u32) -> (Marketplace, String) {
        let mut market = Marketplace::new();
        let id = market
            .create_product(
                &bali_tour(),
                ProductCreate::new("Paket Tour Nusa Penida 1 Hari", 750_000, stock)
                    .category(Category::Tour)
                    .variants(vec!["Pagi (08:00)".into(), "Siang (11:00)".into()]),
            )
            .unwrap();
        (market, id)
    }
}

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, instrument, warn};

use super::authz::{require, Permission};
use super::cart::CartLine;
use super::error::{MarketError, StockShortfall};
use super::Marketplace;
use crate::domain::{Actor, Order, OrderSource, OrderStatus, PaymentMethod};

/// Everything a buyer hands over when confirming payment for a cart.
#[derive(Debug, Clone)]
pub struct CheckoutCommit {
    pub lines: Vec<CartLine>,
    pub payment_method: PaymentMethod,
    /// Opaque media-store reference to the transfer receipt.
    pub payment_proof: Option<String>,
}

/// A cart line checked against the catalog, ready to become an order.
struct PricedLine {
    product_id: String,
    product_name: String,
    vendor_id: String,
    vendor_name: String,
    unit_price: u64,
    total_price: u64,
    quantity: u32,
    variant: Option<String>,
    note: String,
}

impl Marketplace {
    /// Turns cart lines into `pending_verification` orders, one per line, and
    /// takes their quantities out of stock.
    ///
    /// All checks run before the first mutation, so a failure leaves both
    /// catalog and ledger unchanged.
    #[instrument(
        skip(self, actor, commit),
        fields(buyer_id = %actor.id, lines = commit.lines.len(), method = ?commit.payment_method)
    )]
    pub fn commit_checkout(
        &mut self,
        actor: &Actor,
        commit: &CheckoutCommit,
    ) -> Result<Vec<String>, MarketError> {
        require(actor, Permission::Checkout)?;

        let proof = commit
            .payment_proof
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(MarketError::MissingPaymentProof)?;
        if commit.lines.is_empty() {
            return Err(MarketError::EmptyCart);
        }
        if !commit.payment_method.is_checkout_method() {
            return Err(MarketError::ValidationError(format!(
                "{} is not available at checkout",
                commit.payment_method.label()
            )));
        }
        if let Some(line) = commit.lines.iter().find(|l| l.quantity == 0) {
            return Err(MarketError::InvalidQuantity(line.quantity));
        }

        let demand = self.stock_demand(&commit.lines)?;
        let shortfalls = self.shortfalls(&commit.lines, &demand);
        if !shortfalls.is_empty() {
            warn!(products = shortfalls.len(), "Checkout rejected, insufficient stock");
            return Err(MarketError::InsufficientStock { shortfalls });
        }
        let priced = self.price_lines(&commit.lines)?;

        // Validation passed; from here on nothing can fail.
        for (product_id, quantity) in &demand {
            if let Some(product) = self.products.iter_mut().find(|p| &p.id == product_id) {
                product.stock -= *quantity;
            }
        }

        let created_at = Utc::now();
        let mut order_ids = Vec::with_capacity(priced.len());
        for line in priced {
            let id = self.order_ids.next();
            self.orders.push(Order {
                id: id.clone(),
                source: OrderSource::Cart,
                source_item_id: line.product_id,
                source_item_name: line.product_name,
                buyer_id: actor.id.clone(),
                buyer_name: actor.name.clone(),
                vendor_id: line.vendor_id,
                vendor_name: line.vendor_name,
                unit_price: line.unit_price,
                total_price: line.total_price,
                quantity: line.quantity,
                variant: line.variant,
                note: line.note,
                payment_method: commit.payment_method,
                payment_proof: Some(proof.to_string()),
                created_at,
                status: OrderStatus::PendingVerification,
            });
            order_ids.push(id);
        }

        info!(orders = order_ids.len(), "Checkout committed");
        Ok(order_ids)
    }

    /// Total quantity asked of each product. Variants of one product share
    /// its stock, so their lines are summed.
    fn stock_demand(&self, lines: &[CartLine]) -> Result<HashMap<String, u32>, MarketError> {
        let mut demand: HashMap<String, u32> = HashMap::new();
        for line in lines {
            if self.product(&line.product_id).is_none() {
                return Err(MarketError::ProductNotFound(line.product_id.clone()));
            }
            let total = demand.entry(line.product_id.clone()).or_default();
            *total = total
                .checked_add(line.quantity)
                .ok_or(MarketError::InvalidQuantity(line.quantity))?;
        }
        Ok(demand)
    }

    /// Prices each line from the live catalog. Seller, name and unit price
    /// come from the product, not from the line.
    fn price_lines(&self, lines: &[CartLine]) -> Result<Vec<PricedLine>, MarketError> {
        lines
            .iter()
            .map(|line| {
                let product = self
                    .product(&line.product_id)
                    .ok_or_else(|| MarketError::ProductNotFound(line.product_id.clone()))?;
                if !product.offers_variant(line.variant.as_deref()) {
                    return Err(MarketError::ValidationError(format!(
                        "variant {:?} is not offered by {}",
                        line.variant, product.id
                    )));
                }
                let total_price = product
                    .price
                    .checked_mul(u64::from(line.quantity))
                    .ok_or_else(|| {
                        MarketError::ValidationError(format!(
                            "order total for {} is out of range",
                            product.id
                        ))
                    })?;
                Ok(PricedLine {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    vendor_id: product.vendor_id.clone(),
                    vendor_name: product.vendor_name.clone(),
                    unit_price: product.price,
                    total_price,
                    quantity: line.quantity,
                    variant: line.variant.clone(),
                    note: line.note.clone(),
                })
            })
            .collect()
    }

    fn shortfalls(&self, lines: &[CartLine], demand: &HashMap<String, u32>) -> Vec<StockShortfall> {
        // Walk the lines rather than the map so the report follows cart order.
        let mut shortfalls: Vec<StockShortfall> = Vec::new();
        for line in lines {
            if shortfalls.iter().any(|s| s.product_id == line.product_id) {
                continue;
            }
            let Some(product) = self.product(&line.product_id) else {
                continue;
            };
            let requested = demand.get(&product.id).copied().unwrap_or_default();
            if requested > product.stock {
                shortfalls.push(StockShortfall {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    requested,
                    available: product.stock,
                    line_ids: lines
                        .iter()
                        .filter(|l| l.product_id == product.id)
                        .map(|l| l.line_id.clone())
                        .collect(),
                });
            }
        }
        shortfalls
    }
}

//! Buyer-local cart. Lives only inside a session and is never shared.

use serde::Serialize;

use super::error::MarketError;
use crate::domain::Product;

/// A staged purchase, carrying a snapshot of the product at add time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub line_id: String,
    pub product_id: String,
    pub product_name: String,
    pub unit_price: u64,
    pub image: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub quantity: u32,
    pub variant: Option<String>,
    pub note: String,
}

impl CartLine {
    /// `None` when price times quantity does not fit in a `u64`.
    pub fn subtotal(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

/// What `Cart::add_line` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub line_id: String,
    /// Quantity went into an existing line instead of a new one.
    pub merged: bool,
    /// The line now asks for more than the product had in stock when added.
    /// Advisory only; checkout re-validates against live stock.
    pub exceeds_stock: bool,
}

#[derive(Debug, Default, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    next_line: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of `product`. A line with the same product and variant
    /// absorbs the quantity; otherwise a new line is appended.
    pub fn add_line(
        &mut self,
        product: &Product,
        quantity: u32,
        variant: Option<String>,
        note: impl Into<String>,
    ) -> Result<AddOutcome, MarketError> {
        if quantity == 0 {
            return Err(MarketError::InvalidQuantity(quantity));
        }
        if !product.offers_variant(variant.as_deref()) {
            return Err(MarketError::ValidationError(format!(
                "variant {:?} is not offered by {}",
                variant, product.id
            )));
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id && l.variant == variant)
        {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or(MarketError::InvalidQuantity(quantity))?;
            return Ok(AddOutcome {
                line_id: line.line_id.clone(),
                merged: true,
                exceeds_stock: line.quantity > product.stock,
            });
        }

        self.next_line += 1;
        let line = CartLine {
            line_id: format!("line_{}", self.next_line),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price: product.price,
            image: product.image.clone(),
            vendor_id: product.vendor_id.clone(),
            vendor_name: product.vendor_name.clone(),
            quantity,
            variant,
            note: note.into(),
        };
        let outcome = AddOutcome {
            line_id: line.line_id.clone(),
            merged: false,
            exceeds_stock: quantity > product.stock,
        };
        self.lines.push(line);
        Ok(outcome)
    }

    /// Removes a line; unknown ids are ignored.
    pub fn remove_line(&mut self, line_id: &str) {
        self.lines.retain(|l| l.line_id != line_id);
    }

    pub fn total(&self) -> Option<u64> {
        self.lines
            .iter()
            .try_fold(0u64, |acc, line| acc.checked_add(line.subtotal()?))
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

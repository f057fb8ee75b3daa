use tracing::{debug, info, instrument, warn};

use crate::clients::MarketClient;
use crate::domain::{Actor, PaymentMethod};
use crate::engine::{AddOutcome, Cart, CheckoutCommit, MarketError, Screen};

/// A logged-in member. For buyers it also owns the cart, which nobody else
/// can see and which disappears with the session.
pub struct Session {
    actor: Actor,
    cart: Cart,
    market: MarketClient,
}

impl Session {
    pub fn new(actor: Actor, market: MarketClient) -> Self {
        info!(user_id = %actor.id, role = %actor.role, "Session opened");
        Self {
            actor,
            cart: Cart::new(),
            market,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn screens(&self) -> &'static [Screen] {
        self.actor.role.screens()
    }

    /// Stages a product in the cart. Stock is only advisory here: an
    /// over-stock line is kept but logged, and checkout makes the call.
    #[instrument(skip(self), fields(buyer_id = %self.actor.id))]
    pub async fn add_to_cart(
        &mut self,
        product_id: String,
        quantity: u32,
        variant: Option<String>,
        note: String,
    ) -> Result<AddOutcome, MarketError> {
        self.require_buyer()?;
        let product = self
            .market
            .get_product(product_id.clone())
            .await?
            .ok_or(MarketError::ProductNotFound(product_id))?;

        let outcome = self.cart.add_line(&product, quantity, variant, note)?;
        debug!(line_id = %outcome.line_id, merged = outcome.merged, "Cart line staged");
        if outcome.exceeds_stock {
            warn!(line_id = %outcome.line_id, stock = product.stock, "Cart line exceeds current stock");
        }
        Ok(outcome)
    }

    pub fn remove_from_cart(&mut self, line_id: &str) {
        self.cart.remove_line(line_id);
    }

    /// Commits the whole cart. The cart is cleared only when the market
    /// accepted it; on any error it stays as it was.
    #[instrument(skip(self, payment_proof), fields(buyer_id = %self.actor.id, lines = self.cart.lines().len()))]
    pub async fn checkout(
        &mut self,
        payment_method: PaymentMethod,
        payment_proof: Option<String>,
    ) -> Result<Vec<String>, MarketError> {
        self.require_buyer()?;
        let commit = CheckoutCommit {
            lines: self.cart.lines().to_vec(),
            payment_method,
            payment_proof,
        };
        let order_ids = self.market.checkout(self.actor.clone(), commit).await?;
        self.cart.clear();
        info!(orders = order_ids.len(), "Cart checked out");
        Ok(order_ids)
    }

    /// Ends the session. Any staged cart lines are discarded.
    pub fn logout(self) -> Actor {
        if !self.cart.is_empty() {
            info!(discarded_lines = self.cart.lines().len(), "Cart discarded");
        }
        info!(user_id = %self.actor.id, "Session closed");
        self.actor
    }

    fn require_buyer(&self) -> Result<(), MarketError> {
        if Screen::Cart.allowed_for(self.actor.role) {
            Ok(())
        } else {
            Err(MarketError::forbidden(self.actor.role, "use a cart"))
        }
    }
}

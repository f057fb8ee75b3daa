use tracing::{info, instrument, warn};

use super::authz::{require, Permission};
use super::error::MarketError;
use super::Marketplace;
use crate::domain::{Actor, Order, OrderTransition};

impl Marketplace {
    /// Moves an order one step along `pending_verification -> diproses ->
    /// selesai`. Only the vendor who owns the order may do this.
    #[instrument(skip(self, actor), fields(vendor_id = %actor.id))]
    pub fn advance_order(
        &mut self,
        actor: &Actor,
        order_id: &str,
        transition: OrderTransition,
    ) -> Result<Order, MarketError> {
        require(actor, Permission::AdvanceOrder)?;
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| MarketError::OrderNotFound(order_id.to_string()))?;
        if order.vendor_id != actor.id {
            return Err(MarketError::forbidden(actor.role, "advance another vendor's order"));
        }

        let Some(next) = order.status.apply(transition) else {
            warn!(from = %order.status, "Transition not allowed");
            return Err(MarketError::InvalidTransition {
                order_id: order_id.to_string(),
                from: order.status,
                attempted: transition,
            });
        };

        let from = order.status;
        order.status = next;
        info!(%from, to = %next, "Order status updated");
        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::{Cart, CheckoutCommit};
    use super::*;
    use crate::domain::{OfferCreate, OrderStatus, PaymentMethod, RequestCreate};

    fn checked_out_order(market: &mut Marketplace, product_id: &str) -> String {
        let mut cart = Cart::new();
        let product = market.product(product_id).unwrap().clone();
        cart.add_line(&product, 1, Some("Siang (11:00)".into()), "").unwrap();
        let commit = CheckoutCommit {
            lines: cart.lines().to_vec(),
            payment_method: PaymentMethod::Qris,
            payment_proof: Some("proof".into()),
        };
        market.commit_checkout(&budi(), &commit).unwrap().remove(0)
    }

    #[test]
    fn test_vendor_walks_order_to_completion() {
        let (mut market, product_id) = market_with_stock(5);
        let order_id = checked_out_order(&mut market, &product_id);

        let order = market
            .advance_order(&bali_tour(), &order_id, OrderTransition::Process)
            .unwrap();
        assert_eq!(order.status, OrderStatus::Diproses);

        let order = market
            .advance_order(&bali_tour(), &order_id, OrderTransition::Complete)
            .unwrap();
        assert_eq!(order.status, OrderStatus::Selesai);

        for transition in [OrderTransition::Process, OrderTransition::Complete] {
            let err = market
                .advance_order(&bali_tour(), &order_id, transition)
                .unwrap_err();
            assert!(matches!(err, MarketError::InvalidTransition { from: OrderStatus::Selesai, .. }));
        }
    }

    #[test]
    fn test_cannot_skip_verification() {
        let (mut market, product_id) = market_with_stock(5);
        let order_id = checked_out_order(&mut market, &product_id);

        let err = market
            .advance_order(&bali_tour(), &order_id, OrderTransition::Complete)
            .unwrap_err();

        assert_eq!(
            err,
            MarketError::InvalidTransition {
                order_id: order_id.clone(),
                from: OrderStatus::PendingVerification,
                attempted: OrderTransition::Complete,
            }
        );
        assert_eq!(
            market.order(&order_id).unwrap().status,
            OrderStatus::PendingVerification
        );
    }

    #[test]
    fn test_offer_order_can_only_be_completed() {
        let mut market = Marketplace::new();
        let request_id = market
            .post_request(&budi(), RequestCreate::new("Tiket Jakarta - Bali", "10 orang", 15_000_000))
            .unwrap();
        let offer_id = market
            .submit_offer(&bali_tour(), &request_id, OfferCreate::new(14_500_000, "Batik Air"))
            .unwrap();
        let order_id = market.accept_offer(&budi(), &request_id, &offer_id).unwrap();

        assert!(market
            .advance_order(&bali_tour(), &order_id, OrderTransition::Process)
            .is_err());
        let order = market
            .advance_order(&bali_tour(), &order_id, OrderTransition::Complete)
            .unwrap();
        assert_eq!(order.status, OrderStatus::Selesai);
    }

    #[test]
    fn test_only_owning_vendor_advances() {
        let (mut market, product_id) = market_with_stock(5);
        let order_id = checked_out_order(&mut market, &product_id);

        let err = market
            .advance_order(&jogja_transport(), &order_id, OrderTransition::Process)
            .unwrap_err();
        assert!(matches!(err, MarketError::Forbidden { .. }));

        let err = market
            .advance_order(&budi(), &order_id, OrderTransition::Process)
            .unwrap_err();
        assert!(matches!(err, MarketError::Forbidden { .. }));

        assert_eq!(
            market.advance_order(&bali_tour(), "order_404", OrderTransition::Process),
            Err(MarketError::OrderNotFound("order_404".into()))
        );
        assert_eq!(
            market.order(&order_id).unwrap().status,
            OrderStatus::PendingVerification
        );
    }

    #[test]
    fn test_orders_visible_by_role() {
        let (mut market, product_id) = market_with_stock(5);
        checked_out_order(&mut market, &product_id);

        assert_eq!(market.orders_for(&budi()).len(), 1);
        assert_eq!(market.orders_for(&bali_tour()).len(), 1);
        assert!(market.orders_for(&jogja_transport()).is_empty());
        assert_eq!(market.orders_for(&admin()).len(), 1);
    }
}

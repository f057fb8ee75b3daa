use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Variant label carried by orders that come from an accepted offer.
pub const CUSTOM_REQUEST_VARIANT: &str = "Custom Request";

/// Lifecycle of an order in the ledger.
///
/// Cart orders enter at `PendingVerification`, offer orders at `Diproses`.
/// `Selesai` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingVerification,
    Diproses,
    Selesai,
}

/// The vendor-side events that advance an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTransition {
    /// Payment verified, work starts.
    Process,
    Complete,
}

impl OrderStatus {
    /// The status reached by applying `transition`, or `None` when the
    /// transition is not defined from this status.
    pub fn apply(self, transition: OrderTransition) -> Option<OrderStatus> {
        match (self, transition) {
            (OrderStatus::PendingVerification, OrderTransition::Process) => {
                Some(OrderStatus::Diproses)
            }
            (OrderStatus::Diproses, OrderTransition::Complete) => Some(OrderStatus::Selesai),
            _ => None,
        }
    }

    /// The single transition available from this status, if any.
    pub fn next_transition(self) -> Option<OrderTransition> {
        match self {
            OrderStatus::PendingVerification => Some(OrderTransition::Process),
            OrderStatus::Diproses => Some(OrderTransition::Complete),
            OrderStatus::Selesai => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next_transition().is_none()
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::PendingVerification => "Menunggu Verifikasi",
            OrderStatus::Diproses => "Sedang Diproses",
            OrderStatus::Selesai => "Selesai",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wire = match self {
            OrderStatus::PendingVerification => "pending_verification",
            OrderStatus::Diproses => "diproses",
            OrderStatus::Selesai => "selesai",
        };
        f.write_str(wire)
    }
}

impl fmt::Display for OrderTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderTransition::Process => f.write_str("process"),
            OrderTransition::Complete => f.write_str("complete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    TransferBca,
    TransferMandiri,
    Qris,
    /// Price agreed directly between buyer and vendor through an offer.
    ManualAgreement,
}

impl PaymentMethod {
    /// Methods a buyer can pick at checkout.
    pub const CHECKOUT: [PaymentMethod; 3] = [
        PaymentMethod::TransferBca,
        PaymentMethod::TransferMandiri,
        PaymentMethod::Qris,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::TransferBca => "Transfer BCA - 1234567890 (Koperasi)",
            PaymentMethod::TransferMandiri => "Transfer Mandiri - 0987654321 (Koperasi)",
            PaymentMethod::Qris => "QRIS",
            PaymentMethod::ManualAgreement => "Custom Agreement",
        }
    }

    pub fn is_checkout_method(self) -> bool {
        Self::CHECKOUT.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    Cart,
    Offer,
}

/// Represents one entry of the shared order ledger.
///
/// For cart orders `source_item_id` is the product id; for offer orders it
/// is the request id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub source: OrderSource,
    pub source_item_id: String,
    pub source_item_name: String,
    pub buyer_id: String,
    pub buyer_name: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub unit_price: u64,
    pub total_price: u64,
    pub quantity: u32,
    pub variant: Option<String>,
    pub note: String,
    pub payment_method: PaymentMethod,
    pub payment_proof: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        let status = OrderStatus::PendingVerification;
        let status = status.apply(OrderTransition::Process).unwrap();
        assert_eq!(status, OrderStatus::Diproses);
        let status = status.apply(OrderTransition::Complete).unwrap();
        assert_eq!(status, OrderStatus::Selesai);
        assert!(status.is_terminal());
    }

    #[test]
    fn test_no_skip_and_no_regress() {
        assert_eq!(OrderStatus::PendingVerification.apply(OrderTransition::Complete), None);
        assert_eq!(OrderStatus::Diproses.apply(OrderTransition::Process), None);
        assert_eq!(OrderStatus::Selesai.apply(OrderTransition::Process), None);
        assert_eq!(OrderStatus::Selesai.apply(OrderTransition::Complete), None);
    }

    #[test]
    fn test_status_wire_names() {
        for (status, wire) in [
            (OrderStatus::PendingVerification, "pending_verification"),
            (OrderStatus::Diproses, "diproses"),
            (OrderStatus::Selesai, "selesai"),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), format!("\"{}\"", wire));
            assert_eq!(status.to_string(), wire);
        }
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentMethod::TransferBca).unwrap(), "\"transfer_bca\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::ManualAgreement).unwrap(), "\"manual_agreement\"");
        let qris: PaymentMethod = serde_json::from_str("\"qris\"").unwrap();
        assert_eq!(qris, PaymentMethod::Qris);
    }

    #[test]
    fn test_manual_agreement_is_not_a_checkout_method() {
        assert!(!PaymentMethod::ManualAgreement.is_checkout_method());
        assert!(PaymentMethod::Qris.is_checkout_method());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Open,
    /// Set once, when the buyer accepts an offer. Never reopened.
    Closed,
}

/// A buyer's call for vendor bids against a stated budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    pub buyer_id: String,
    pub buyer_name: String,
    pub title: String,
    pub description: String,
    pub budget: u64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl Request {
    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Open
    }
}

#[derive(Debug, Clone)]
pub struct RequestCreate {
    pub title: String,
    pub description: String,
    pub budget: u64,
}

impl RequestCreate {
    pub fn new(title: impl Into<String>, description: impl Into<String>, budget: u64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            budget,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
}

/// A vendor's priced response to an open request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub request_id: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub price: u64,
    pub message: String,
    pub status: OfferStatus,
}

#[derive(Debug, Clone)]
pub struct OfferCreate {
    pub price: u64,
    pub message: String,
}

impl OfferCreate {
    pub fn new(price: u64, message: impl Into<String>) -> Self {
        Self {
            price,
            message: message.into(),
        }
    }
}

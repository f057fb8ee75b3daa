//! Async handles to the actors, plus the per-member session.

#[macro_use]
mod macros;

pub mod market_client;
pub mod session;
pub mod user_client;

pub use market_client::MarketClient;
pub use session::Session;
pub use user_client::IdentityClient;

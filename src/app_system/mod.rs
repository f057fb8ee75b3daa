//! System orchestration, startup, and shutdown logic.

pub mod config;
pub mod error;
pub mod market_system;
pub mod seed;
pub mod tracing;

pub use config::*;
pub use error::*;
pub use market_system::*;
pub use seed::*;
pub use self::tracing::*;

use thiserror::Error;

use crate::engine::MarketError;
use crate::user_actor::UserError;

/// Errors surfaced by the coordinator and the binary.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SystemError {
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Market(#[from] MarketError),
    #[error("Shutdown failed: {0}")]
    Shutdown(String),
}

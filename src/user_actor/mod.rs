//! User directory entity: registration rules and lookup queries.

pub mod entity;
pub mod error;

pub use entity::*;
pub use error::*;

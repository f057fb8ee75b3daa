pub mod user;
pub mod product;
pub mod request;
pub mod order;

pub use user::*;
pub use product::*;
pub use request::*;
pub use order::*;

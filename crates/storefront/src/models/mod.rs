//! Domain models for the storefront.

pub mod cart;
pub mod session;
pub mod transaction;
pub mod user;

pub use cart::{Cart, CartItem};
pub use session::{CurrentUser, Flash};
pub use transaction::{NewTransaction, Transaction};
pub use user::{User, UserWithPassword};

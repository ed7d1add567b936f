//! Domain models for the storefront API.

pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::{
    Address, NewAddress, NewOrder, NewOrderItem, Order, OrderDetail, OrderItem, OrderItemDetail,
};
pub use product::Product;
pub use session::{AuthContext, CurrentUser, session_keys};
pub use user::{NewUser, User};

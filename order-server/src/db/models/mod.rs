//! Persisted models and API shapes for the order aggregate.

pub mod order;

pub use order::{
    NewOrder, NewOrderItem, Order, OrderItem, OrderItemDetail, OrderDetail, OrderRecord,
    OrderStatus, Receipt,
};

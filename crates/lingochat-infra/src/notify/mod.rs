//! Notification sink implementations.

pub mod service_bus;

pub use service_bus::ServiceBusSink;

mod backend;
mod client;
mod warehouse;

pub use backend::JobBackend;
pub use client::BqClient;
pub use warehouse::Warehouse;

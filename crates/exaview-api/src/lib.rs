// exaview-api: Async Rust client for the Ercole inventory backend

pub mod client;
pub mod error;
pub mod exadata;
pub mod licenses;
pub mod models;
pub mod transport;

pub use client::{BackendClient, ListQuery};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};

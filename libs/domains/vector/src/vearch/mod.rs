//! Vearch client layer.
//!
//! Control-plane calls (databases, spaces) go to the master endpoint,
//! document and search calls go to the router endpoint. Every reply passes
//! through [`normalizer`] before it is interpreted.

mod client;
mod config;
mod database;
pub mod ids;
pub mod normalizer;
mod record;
mod search;
mod space;
pub mod transport;
mod wire;

pub use client::VearchClient;
pub use config::VearchConfig;
pub use ids::derive_id;
pub use normalizer::{Verdict, checked, classify};
pub use transport::{HttpMethod, HttpTransport, Transport, TransportRequest};

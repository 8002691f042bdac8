//! HTTP adapters for the remote posts API.

mod client;

pub use client::{ApiClient, ClientError};

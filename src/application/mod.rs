//! Application layer: admin workflows over the remote posts API.

pub mod posts;

//! newsdesk: terminal admin desk for posts served by a remote blog REST API.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;

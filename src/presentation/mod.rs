//! Text rendering for the admin desk.

pub mod views;

//! HTTP handlers

pub mod health;
pub mod profiles;
pub mod complaints;

//! Data models

pub mod profile;
pub mod complaint;

pub use profile::*;
pub use complaint::*;

//! Logic Module - client-side complaint intake
//!
//! - `device` - device / environment fingerprint
//! - `store` - local complaint store (JSON file)
//! - `api_client` - intake server client (profiles, remote classification)
//! - `intake` - submission flow (local or remote classification)
//! - `report` - terminal result view

pub mod device;
pub mod store;
pub mod api_client;
pub mod intake;
pub mod report;

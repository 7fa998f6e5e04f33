//! FxHub - WebSocket broadcast hub with exchange-rate lookups.
//!
//! Clients connect over WebSocket and send short text commands. Chat text
//! is echoed to every connected client tagged with the sender's display
//! name; `exchange` commands fetch rates from the upstream API and
//! broadcast the formatted result.

pub mod audit;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod exchange;
pub mod hub;
pub mod lookup;
pub mod server;

pub use config::HubConfig;
pub use error::{HubError, LookupError};

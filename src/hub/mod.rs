//! Connection registry and broadcaster.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `registry` | Membership set, register/unregister, non-blocking fan-out |
//! | `names` | Display-name generation |
//!
//! Each connection owns a bounded outbox drained by its own writer task.
//! A broadcast only enqueues, so a slow socket delays nobody but itself.

pub mod names;
pub mod registry;

pub use names::NameGenerator;
pub use registry::{BroadcastReport, ConnectionId, Outbound, Registration, Registry};

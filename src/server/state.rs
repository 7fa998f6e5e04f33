//! Shared application state for the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use crate::audit::AuditLog;
use crate::config::HubConfig;
use crate::dispatch::Dispatcher;
use crate::exchange::ExchangeService;
use crate::hub::Registry;
use crate::lookup::LookupClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Per-message command handling, holding the registry.
    pub dispatcher: Dispatcher,
    /// Upper bound for writing one message to one socket.
    pub send_timeout: Duration,
    /// Per-connection outbox capacity.
    pub outbound_buffer: usize,
}

impl AppState {
    /// Builds the registry, lookup client, and audit log from `config`.
    pub fn new(config: &HubConfig) -> Self {
        let registry = Arc::new(Registry::new(config.max_peer_drops));
        let exchange = ExchangeService::new(
            LookupClient::new(config.lookup_timeout),
            config.rates_url.clone(),
        );
        let audit = AuditLog::new(config.audit_log_path.clone());

        Self {
            dispatcher: Dispatcher::new(registry, exchange, audit),
            send_timeout: config.send_timeout,
            outbound_buffer: config.outbound_buffer.max(1),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        self.dispatcher.registry()
    }
}

//! Classification of inbound chat text and the action each kind triggers.

use std::sync::Arc;

use crate::audit::AuditLog;
use crate::exchange::ExchangeService;
use crate::hub::{BroadcastReport, Registry};

/// Greeting trigger, compared case-insensitively like every other command.
pub const GREETING: &str = "hello server";

/// Reply broadcast for [`GREETING`]. Not attributed to the sender.
pub const GREETING_REPLY: &str = "Hi everyone!";

/// Largest day count accepted by `exchange N`.
pub const MAX_HISTORY_DAYS: u8 = 10;

/// One inbound message, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `exchange`: today's rates as a table.
    Snapshot,
    /// `exchange N` with N in 1..=10.
    Historical(u8),
    Greeting,
    /// Anything else, kept verbatim.
    Chat(String),
}

impl Command {
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// The day count must be written plainly (`exchange 3`, not `exchange 03`).
    pub fn parse(text: &str) -> Self {
        let normalized = text.trim().to_lowercase();

        if normalized == "exchange" {
            return Command::Snapshot;
        }
        if normalized == GREETING {
            return Command::Greeting;
        }
        if let Some(days) = normalized.strip_prefix("exchange ").and_then(parse_days) {
            return Command::Historical(days);
        }
        Command::Chat(text.to_string())
    }

    /// Audit log label; `None` for messages that are not commands.
    pub fn audit_label(&self) -> Option<String> {
        match self {
            Command::Snapshot => Some("exchange".to_string()),
            Command::Historical(days) => Some(format!("exchange {days}")),
            Command::Greeting | Command::Chat(_) => None,
        }
    }
}

fn parse_days(raw: &str) -> Option<u8> {
    let days: u8 = raw.parse().ok()?;
    let canonical = days.to_string() == raw;
    (canonical && (1..=MAX_HISTORY_DAYS).contains(&days)).then_some(days)
}

/// Turns one connection's messages into broadcasts.
///
/// Holds no per-connection state; the connection loop calls
/// [`Dispatcher::dispatch`] once per message, in arrival order.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    exchange: ExchangeService,
    audit: AuditLog,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, exchange: ExchangeService, audit: AuditLog) -> Self {
        Self {
            registry,
            exchange,
            audit,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Handles one message from the client named `sender`.
    pub async fn dispatch(&self, sender: &str, text: &str) -> BroadcastReport {
        let command = Command::parse(text);
        if let Some(label) = command.audit_label() {
            tracing::info!(sender, command = %label, "Command received");
            self.audit.record(&label);
        }

        let message = match command {
            Command::Snapshot => self.exchange.snapshot().await,
            Command::Historical(days) => self.exchange.historical(days).await,
            Command::Greeting => GREETING_REPLY.to_string(),
            Command::Chat(text) => format!("{sender}: {text}"),
        };

        self.registry.broadcast(message).await
    }
}

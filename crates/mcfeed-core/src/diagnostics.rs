//! Destinations for human-readable datafeed diagnostics.

use std::sync::Mutex;

/// Receives one formatted message per failed or empty query.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, message: &str);
}

/// Forwards diagnostics to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, message: &str) {
        tracing::warn!(target: "mcfeed::diagnostic", "{message}");
    }
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .expect("diagnostic sink lock is not poisoned")
            .clone()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, message: &str) {
        self.messages
            .lock()
            .expect("diagnostic sink lock is not poisoned")
            .push(message.to_owned());
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn emit(&self, message: &str) {
        self(message)
    }
}

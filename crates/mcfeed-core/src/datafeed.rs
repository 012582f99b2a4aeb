//! Datafeed facade: lazy terminal session plus soft-fail query entry points.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::cache::{CachedTranslator, TranslationCache};
use crate::config::DatafeedConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::history::HistoryQueryOrchestrator;
use crate::symbol::VendorSymbol;
use crate::terminal::TerminalClient;
use crate::{Bar, DatafeedError, Exchange, HistoryRequest, TerminalError, Tick};

/// Terminal session state.
///
/// `FailedInit` is not final: the next query tries to connect again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Connected,
    FailedInit,
}

/// Historical data access through the MultiCharts quote terminal.
///
/// Every public query connects on first use. Expected failures never surface
/// as errors from the soft-fail methods: they return an empty result and hand
/// one message to the configured [`DiagnosticSink`].
pub struct McDatafeed {
    config: DatafeedConfig,
    terminal: Arc<dyn TerminalClient>,
    history: HistoryQueryOrchestrator,
    sink: Arc<dyn DiagnosticSink>,
    state: Mutex<ConnectionState>,
}

impl McDatafeed {
    pub fn new(config: DatafeedConfig, terminal: Arc<dyn TerminalClient>) -> Self {
        let translator = CachedTranslator::with_capacity(config.cache_capacity);
        Self {
            history: HistoryQueryOrchestrator::new(Arc::clone(&terminal), translator),
            config,
            terminal,
            sink: Arc::new(TracingSink),
            state: Mutex::new(ConnectionState::Uninitialized),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Share a translation cache with other datafeed instances.
    pub fn with_translation_cache(mut self, cache: Arc<TranslationCache>) -> Self {
        self.history =
            HistoryQueryOrchestrator::new(Arc::clone(&self.terminal), CachedTranslator::new(cache));
        self
    }

    pub fn config(&self) -> &DatafeedConfig {
        &self.config
    }

    pub fn translation_cache(&self) -> &Arc<TranslationCache> {
        self.history.translator().cache()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.lock_state()
    }

    /// Open the terminal session if it is not open yet.
    ///
    /// Returns `true` once connected; later calls return immediately.
    pub fn init(&self) -> bool {
        match self.ensure_connected() {
            Ok(()) => true,
            Err(error) => {
                self.sink.emit(&DatafeedError::ConnectionFailure(error).to_string());
                false
            }
        }
    }

    /// Bars for `req`, or an empty list plus a diagnostic on failure.
    pub fn query_bar_history(&self, req: &HistoryRequest) -> Vec<Bar> {
        self.query_bar_history_with(req, self.sink.as_ref())
    }

    /// Same as [`query_bar_history`](Self::query_bar_history) with a per-call sink.
    pub fn query_bar_history_with(&self, req: &HistoryRequest, sink: &dyn DiagnosticSink) -> Vec<Bar> {
        match self.try_query_bar_history(req) {
            Ok(bars) => bars,
            Err(error) => {
                sink.emit(&error.to_string());
                Vec::new()
            }
        }
    }

    /// Bars for `req` with the failure reason kept as a value.
    pub fn try_query_bar_history(&self, req: &HistoryRequest) -> Result<Vec<Bar>, DatafeedError> {
        self.ensure_connected()
            .map_err(DatafeedError::ConnectionFailure)?;
        self.history.fetch_bars(req)
    }

    /// The quote terminal serves no tick history.
    pub fn query_tick_history(&self, req: &HistoryRequest) -> Vec<Tick> {
        let _ = req;
        Vec::new()
    }

    /// Every futures and option code the terminal lists.
    ///
    /// Codes that do not parse as a [`VendorSymbol`] are skipped.
    pub fn query_symbols(&self) -> Vec<VendorSymbol> {
        if !self.init() {
            return Vec::new();
        }

        let mut symbols = Vec::new();
        for exchange in Exchange::FUTURES {
            let codes = match self.terminal.list_symbols(exchange.as_str()) {
                Ok(codes) => codes,
                Err(error) => {
                    warn!(%exchange, %error, "symbol listing failed");
                    continue;
                }
            };

            for code in codes {
                match code.parse::<VendorSymbol>() {
                    Ok(symbol) => symbols.push(symbol),
                    Err(error) => debug!(%exchange, %error, "skipping listed code"),
                }
            }
        }
        symbols
    }

    fn ensure_connected(&self) -> Result<(), TerminalError> {
        let mut state = self.lock_state();
        if *state == ConnectionState::Connected {
            return Ok(());
        }

        match self.terminal.connect(&self.config.app_path) {
            Ok(()) => {
                *state = ConnectionState::Connected;
                info!(app_path = %self.config.app_path.display(), "quote terminal connected");
                Ok(())
            }
            Err(error) => {
                *state = ConnectionState::FailedInit;
                warn!(app_path = %self.config.app_path.display(), %error, "quote terminal connection failed");
                Err(error)
            }
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ConnectionState> {
        self.state
            .lock()
            .expect("datafeed state lock is not poisoned")
    }
}

//! # mcfeed core
//!
//! Historical bar retrieval from the MultiCharts quote terminal for Chinese
//! futures and options.
//!
//! ## Overview
//!
//! - **Symbol translation** from exchange contract codes (`rb2410`, `MA412`,
//!   `IO2412-C-4000`, `rbHOT`) to the terminal's dotted codes
//!   (`TC.F.SHFE.rb.202410`)
//! - **Bounded translation cache** shared across queries
//! - **Chunked history retrieval** that works around the terminal's one-day
//!   limit on minute queries and relabels bars by period start
//! - **Datafeed facade** with a lazily opened terminal session and injected
//!   diagnostics
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | LRU translation cache |
//! | [`config`] | Datafeed configuration |
//! | [`datafeed`] | Session lifecycle and public query entry points |
//! | [`diagnostics`] | Diagnostic sinks |
//! | [`domain`] | Exchanges, intervals, requests and bars |
//! | [`error`] | Error types |
//! | [`history`] | Window planning, terminal calls, row normalization |
//! | [`interval_map`] | Interval to terminal bar-type table |
//! | [`symbol`] | Contract code translation and vendor codes |
//! | [`terminal`] | Terminal client trait and scripted client |
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use mcfeed_core::{
//!     DatafeedConfig, Exchange, HistoryRequest, Interval, McDatafeed, ScriptedTerminal,
//! };
//! use time::macros::datetime;
//!
//! let terminal = Arc::new(ScriptedTerminal::new());
//! let feed = McDatafeed::new(DatafeedConfig::new("D:/MCTrader14/APPs"), terminal);
//!
//! let req = HistoryRequest::new(
//!     "rb2410",
//!     Exchange::Shfe,
//!     Interval::Minute,
//!     datetime!(2024-01-02 09:00 +8),
//!     datetime!(2024-01-02 15:00 +8),
//! )?;
//!
//! // Nothing scripted, so the query soft-fails to an empty list.
//! assert!(feed.query_bar_history(&req).is_empty());
//! # Ok::<(), mcfeed_core::ValidationError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  McDatafeed     │  lazy connect, diagnostics
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ History         │────▶│ CachedTranslator │
//! │ Orchestrator    │     │ + interval map   │
//! └────────┬────────┘     └──────────────────┘
//!          │ one call per window
//!          ▼
//! ┌─────────────────┐
//! │ TerminalClient  │
//! └─────────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod datafeed;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod history;
pub mod interval_map;
pub mod symbol;
pub mod terminal;

// Caching
pub use cache::{CachedTranslator, TranslationCache, DEFAULT_CACHE_CAPACITY};

// Configuration
pub use config::DatafeedConfig;

// Datafeed facade
pub use datafeed::{ConnectionState, McDatafeed};

// Diagnostics
pub use diagnostics::{CollectingSink, DiagnosticSink, TracingSink};

// Domain models
pub use domain::{Bar, Exchange, HistoryRequest, Interval, Tick, SOURCE_OFFSET, SOURCE_TAG};

// Error types
pub use error::{DatafeedError, TerminalError, TranslateError, ValidationError};

// History retrieval
pub use history::{plan_windows, HistoryQueryOrchestrator, QueryWindow};

// Interval mapping
pub use interval_map::{map_interval, IntervalMapping, VendorBarType};

// Symbol translation
pub use symbol::{translate, ContinuousSuffix, OptionRight, VendorSymbol};

// Terminal client
pub use terminal::{HistoryQuery, QuoteRow, ScriptedTerminal, TerminalClient};

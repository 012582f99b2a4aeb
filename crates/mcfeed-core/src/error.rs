use thiserror::Error;

use crate::{Exchange, Interval};

/// Validation and contract errors exposed by `mcfeed-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,

    #[error("invalid exchange '{value}', expected one of CFFEX, SHFE, CZCE, DCE, INE, GFEX, SSE, SZSE")]
    InvalidExchange { value: String },
    #[error("invalid interval '{value}', expected one of 1m, 1h, d, w, tick")]
    InvalidInterval { value: String },

    #[error("request start {start} is after end {end}")]
    InvertedRange { start: String, end: String },

    #[error("vendor symbol code is malformed: '{value}'")]
    InvalidVendorSymbol { value: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Reasons a canonical symbol cannot be turned into a vendor code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("exchange {exchange} has no vendor symbol mapping")]
    UnsupportedExchange { exchange: Exchange },

    #[error("symbol '{symbol}' does not match any contract layout: {reason}")]
    MalformedSymbol { symbol: String, reason: &'static str },
}

impl TranslateError {
    pub(crate) fn malformed(symbol: &str, reason: &'static str) -> Self {
        Self::MalformedSymbol {
            symbol: symbol.to_owned(),
            reason,
        }
    }
}

/// Failures reported by a quote terminal client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TerminalError {
    #[error("terminal connection failed: {0}")]
    Connect(String),

    #[error("terminal history query failed: {0}")]
    Query(String),

    #[error("terminal is not connected")]
    NotConnected,
}

/// Top-level error type for datafeed queries.
///
/// The `Display` text of each variant is the diagnostic handed to the
/// [`DiagnosticSink`](crate::DiagnosticSink) by the soft-fail entry points.
#[derive(Debug, Error)]
pub enum DatafeedError {
    #[error("history query failed: unsupported symbol {vt_symbol}")]
    UnsupportedExchange { vt_symbol: String },

    #[error("history query failed: unsupported interval {interval}")]
    UnsupportedInterval { interval: Interval },

    #[error("history query failed: {0}")]
    MalformedSymbol(TranslateError),

    #[error("datafeed initialization failed: {0}")]
    ConnectionFailure(TerminalError),

    #[error("failed to fetch {symbol} history between {start} and {end}")]
    EmptyHistory {
        symbol: String,
        start: String,
        end: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DatafeedError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedExchange { .. } => "datafeed.unsupported_exchange",
            Self::UnsupportedInterval { .. } => "datafeed.unsupported_interval",
            Self::MalformedSymbol(_) => "datafeed.malformed_symbol",
            Self::ConnectionFailure(_) => "datafeed.connection_failure",
            Self::EmptyHistory { .. } => "datafeed.empty_history",
            Self::Validation(_) => "datafeed.validation",
        }
    }

    /// Only connection failures clear up by themselves on a later call.
    pub const fn retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailure(_))
    }
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::timestamp::display_datetime;
use crate::{Exchange, Interval, ValidationError};

/// Tag stamped on every record produced from the quote terminal.
pub const SOURCE_TAG: &str = "MCDATA";

/// Caller request for a span of historical bars.
///
/// Deserialization runs the same checks as [`HistoryRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHistoryRequest")]
pub struct HistoryRequest {
    pub symbol: String,
    pub exchange: Exchange,
    pub interval: Interval,
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

impl HistoryRequest {
    pub fn new(
        symbol: impl Into<String>,
        exchange: Exchange,
        interval: Interval,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Self, ValidationError> {
        let request = Self {
            symbol: symbol.into().trim().to_owned(),
            exchange,
            interval,
            start,
            end,
        };
        request.validate()?;
        Ok(request)
    }

    /// Symbol qualified by exchange, e.g. `rb2410.SHFE`.
    pub fn vt_symbol(&self) -> String {
        format!("{}.{}", self.symbol, self.exchange)
    }

    /// Re-check the invariants for requests built without [`HistoryRequest::new`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.symbol.trim().is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        if self.start > self.end {
            return Err(ValidationError::InvertedRange {
                start: display_datetime(self.start),
                end: display_datetime(self.end),
            });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawHistoryRequest {
    symbol: String,
    exchange: Exchange,
    interval: Interval,
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
}

impl TryFrom<RawHistoryRequest> for HistoryRequest {
    type Error = ValidationError;

    fn try_from(raw: RawHistoryRequest) -> Result<Self, Self::Error> {
        Self::new(raw.symbol, raw.exchange, raw.interval, raw.start, raw.end)
    }
}

/// OHLC bar labelled by the start of its period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub exchange: Exchange,
    pub interval: Interval,
    #[serde(with = "time::serde::rfc3339")]
    pub datetime: OffsetDateTime,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
    pub open_interest: f64,
    pub source: String,
}

/// Top-of-book tick record.
///
/// The quote terminal serves no tick history, so these are never produced by
/// this crate; the type gives the tick entry point a concrete return value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub symbol: String,
    pub exchange: Exchange,
    #[serde(with = "time::serde::rfc3339")]
    pub datetime: OffsetDateTime,
    pub last_price: f64,
    pub volume: f64,
    pub open_interest: f64,
    pub bid_price_1: f64,
    pub ask_price_1: f64,
    pub source: String,
}

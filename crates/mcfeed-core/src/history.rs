//! Chunked bar history retrieval.
//!
//! The terminal only answers minute-bar queries one day at a time, so minute
//! requests are split into consecutive day windows issued in order. Hour and
//! daily requests go out as a single call. Rows from all windows are appended
//! in issue order and relabelled from period end to period start.

use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::cache::CachedTranslator;
use crate::domain::{
    attach_source_offset, date_hour_key, display_datetime, truncate_to_midnight, SOURCE_OFFSET,
    SOURCE_TAG,
};
use crate::interval_map::{map_interval, IntervalMapping};
use crate::terminal::{HistoryQuery, QuoteRow, TerminalClient};
use crate::{Bar, DatafeedError, HistoryRequest, Interval, TranslateError};

/// One terminal call's time span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl QueryWindow {
    pub fn start_key(&self) -> String {
        date_hour_key(self.start)
    }

    pub fn end_key(&self) -> String {
        date_hour_key(self.end)
    }
}

/// Split `[start, end]` into the windows the terminal accepts.
///
/// Minute requests become day-long windows `[cursor, cursor + 1 day)` starting
/// at `start`, continuing while the cursor's source-local date is not after
/// the date of `end`. The last window is clamped to `end` when a further day
/// is not representable. Every other interval is a single window.
///
/// Bounds that cannot be expressed in source-local time yield no windows.
pub fn plan_windows(
    interval: Interval,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Vec<QueryWindow> {
    let (Some(start), Some(end)) = (
        start.checked_to_offset(SOURCE_OFFSET),
        end.checked_to_offset(SOURCE_OFFSET),
    ) else {
        return Vec::new();
    };

    if interval != Interval::Minute {
        return vec![QueryWindow { start, end }];
    }

    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor.date() <= end.date() {
        let Some(next) = cursor.checked_add(Duration::days(1)) else {
            windows.push(QueryWindow {
                start: cursor,
                end: end.max(cursor),
            });
            break;
        };
        windows.push(QueryWindow {
            start: cursor,
            end: next,
        });
        cursor = next;
    }
    windows
}

/// Turn a terminal row into a bar labelled by period start.
pub fn normalize_row(req: &HistoryRequest, mapping: IntervalMapping, row: &QuoteRow) -> Bar {
    let mut datetime = attach_source_offset(row.date_time - mapping.adjustment);
    if req.interval == Interval::Daily {
        datetime = truncate_to_midnight(datetime);
    }

    Bar {
        symbol: req.symbol.clone(),
        exchange: req.exchange,
        interval: req.interval,
        datetime,
        open_price: row.open,
        high_price: row.high,
        low_price: row.low,
        close_price: row.close,
        volume: row.volume,
        open_interest: row.open_interest,
        source: SOURCE_TAG.to_owned(),
    }
}

/// Resolves a request to terminal calls and merges the results.
///
/// Assumes the terminal session is already open.
#[derive(Clone)]
pub struct HistoryQueryOrchestrator {
    terminal: Arc<dyn TerminalClient>,
    translator: CachedTranslator,
}

impl HistoryQueryOrchestrator {
    pub fn new(terminal: Arc<dyn TerminalClient>, translator: CachedTranslator) -> Self {
        Self {
            terminal,
            translator,
        }
    }

    pub fn translator(&self) -> &CachedTranslator {
        &self.translator
    }

    /// Fetch and normalize every bar for `req`.
    ///
    /// An inverted range fails with [`DatafeedError::Validation`] before any
    /// terminal call.
    ///
    /// A window whose call fails is logged and counted as empty. The request
    /// fails with [`DatafeedError::EmptyHistory`] only when no window returned
    /// any row.
    pub fn fetch_bars(&self, req: &HistoryRequest) -> Result<Vec<Bar>, DatafeedError> {
        req.validate()?;

        let vendor = self
            .translator
            .translate(&req.symbol, req.exchange)
            .map_err(|error| match error {
                TranslateError::UnsupportedExchange { .. } => DatafeedError::UnsupportedExchange {
                    vt_symbol: req.vt_symbol(),
                },
                malformed => DatafeedError::MalformedSymbol(malformed),
            })?;

        let mapping = map_interval(req.interval).ok_or(DatafeedError::UnsupportedInterval {
            interval: req.interval,
        })?;

        let symbol = vendor.to_string();
        let mut rows: Vec<QuoteRow> = Vec::new();

        for window in plan_windows(req.interval, req.start, req.end) {
            let query = HistoryQuery {
                bar_type: mapping.bar_type,
                window: mapping.window,
                symbol: symbol.clone(),
                start_key: window.start_key(),
                end_key: window.end_key(),
            };

            match self.terminal.quote_history(&query) {
                Ok(chunk) => {
                    debug!(
                        symbol = %query.symbol,
                        start = %query.start_key,
                        end = %query.end_key,
                        rows = chunk.len(),
                        "history window received"
                    );
                    rows.extend(chunk);
                }
                Err(error) => {
                    warn!(
                        symbol = %query.symbol,
                        start = %query.start_key,
                        end = %query.end_key,
                        %error,
                        "history window failed"
                    );
                }
            }
        }

        if rows.is_empty() {
            return Err(DatafeedError::EmptyHistory {
                symbol: req.symbol.clone(),
                start: display_datetime(req.start),
                end: display_datetime(req.end),
            });
        }

        Ok(rows
            .iter()
            .map(|row| normalize_row(req, mapping, row))
            .collect())
    }
}

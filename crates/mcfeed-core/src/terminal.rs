//! Quote terminal client contract.
//!
//! The terminal is an external, blocking collaborator. This module defines the
//! calls the datafeed makes on it and a deterministic scripted implementation
//! for offline replay and tests.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

use crate::interval_map::VendorBarType;
use crate::TerminalError;

time::serde::format_description!(
    terminal_datetime,
    PrimitiveDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second]"
);

const ROW_KEY: &[FormatItem<'static>] = format_description!("[year][month][day][hour]");

/// One history row as returned by the terminal.
///
/// `date_time` is terminal-local and marks the end of the bar's period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuoteRow {
    #[serde(with = "terminal_datetime")]
    pub date_time: PrimitiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub open_interest: f64,
}

/// Arguments of a single history call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub bar_type: VendorBarType,
    pub window: u32,
    pub symbol: String,
    /// `YYYYMMDDHH` in terminal-local time.
    pub start_key: String,
    /// `YYYYMMDDHH` in terminal-local time.
    pub end_key: String,
}

/// Blocking quote terminal session.
///
/// Implementations must be `Send + Sync`; the datafeed serializes calls itself.
pub trait TerminalClient: Send + Sync {
    /// Open the session against the terminal installed at `app_path`.
    fn connect(&self, app_path: &Path) -> Result<(), TerminalError>;

    /// Fetch bar history for one query window.
    fn quote_history(&self, query: &HistoryQuery) -> Result<Vec<QuoteRow>, TerminalError>;

    /// All instrument codes the terminal lists for an exchange.
    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, TerminalError> {
        let _ = exchange;
        Ok(Vec::new())
    }
}

#[derive(Debug, Default)]
struct ScriptState {
    connected_to: Option<PathBuf>,
    connect_attempts: usize,
    remaining_connect_failures: usize,
    calls: Vec<HistoryQuery>,
}

/// Deterministic in-memory terminal.
///
/// Serves scripted rows whose timestamp falls in `[start_key, end_key)` at
/// hour resolution, and records every history call in issue order.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    rows: HashMap<String, Vec<QuoteRow>>,
    listings: HashMap<String, Vec<String>>,
    failing_windows: BTreeSet<String>,
    state: Mutex<ScriptState>,
}

impl ScriptedTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for the vendor code `symbol`. Rows are kept in the order given.
    pub fn with_rows(mut self, symbol: impl Into<String>, rows: Vec<QuoteRow>) -> Self {
        self.rows.entry(symbol.into()).or_default().extend(rows);
        self
    }

    /// Serve rows decoded from a JSON array of terminal rows.
    pub fn with_json_rows(
        self,
        symbol: impl Into<String>,
        json: &str,
    ) -> Result<Self, serde_json::Error> {
        let rows: Vec<QuoteRow> = serde_json::from_str(json)?;
        Ok(self.with_rows(symbol, rows))
    }

    pub fn with_listing(mut self, exchange: impl Into<String>, codes: Vec<String>) -> Self {
        self.listings.insert(exchange.into(), codes);
        self
    }

    /// Fail the first `count` connection attempts.
    pub fn with_connect_failures(self, count: usize) -> Self {
        self.lock().remaining_connect_failures = count;
        self
    }

    /// Fail any history call whose window starts at `start_key`.
    pub fn with_failing_window(mut self, start_key: impl Into<String>) -> Self {
        self.failing_windows.insert(start_key.into());
        self
    }

    /// History calls received so far.
    pub fn calls(&self) -> Vec<HistoryQuery> {
        self.lock().calls.clone()
    }

    pub fn connect_attempts(&self) -> usize {
        self.lock().connect_attempts
    }

    pub fn connected_to(&self) -> Option<PathBuf> {
        self.lock().connected_to.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state
            .lock()
            .expect("scripted terminal lock is not poisoned")
    }
}

impl TerminalClient for ScriptedTerminal {
    fn connect(&self, app_path: &Path) -> Result<(), TerminalError> {
        let mut state = self.lock();
        state.connect_attempts += 1;

        if state.remaining_connect_failures > 0 {
            state.remaining_connect_failures -= 1;
            return Err(TerminalError::Connect(format!(
                "no terminal answering at {}",
                app_path.display()
            )));
        }

        state.connected_to = Some(app_path.to_path_buf());
        Ok(())
    }

    fn quote_history(&self, query: &HistoryQuery) -> Result<Vec<QuoteRow>, TerminalError> {
        let mut state = self.lock();
        if state.connected_to.is_none() {
            return Err(TerminalError::NotConnected);
        }
        state.calls.push(query.clone());
        drop(state);

        if self.failing_windows.contains(&query.start_key) {
            return Err(TerminalError::Query(format!(
                "window starting {} rejected",
                query.start_key
            )));
        }

        let rows = self
            .rows
            .get(&query.symbol)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        let key = row_key(row.date_time);
                        key.as_str() >= query.start_key.as_str()
                            && key.as_str() < query.end_key.as_str()
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(rows)
    }

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, TerminalError> {
        if self.lock().connected_to.is_none() {
            return Err(TerminalError::NotConnected);
        }
        Ok(self.listings.get(exchange).cloned().unwrap_or_default())
    }
}

fn row_key(value: PrimitiveDateTime) -> String {
    value
        .format(ROW_KEY)
        .expect("row key must be formattable")
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn row(date_time: PrimitiveDateTime) -> QuoteRow {
        QuoteRow {
            date_time,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10.0,
            open_interest: 100.0,
        }
    }

    fn query(start_key: &str, end_key: &str) -> HistoryQuery {
        HistoryQuery {
            bar_type: VendorBarType::Minute,
            window: 1,
            symbol: "TC.F.SHFE.rb.202410".into(),
            start_key: start_key.into(),
            end_key: end_key.into(),
        }
    }

    #[test]
    fn refuses_history_before_connect() {
        let terminal = ScriptedTerminal::new();
        let err = terminal
            .quote_history(&query("2024010100", "2024010200"))
            .expect_err("must fail");
        assert_eq!(err, TerminalError::NotConnected);
    }

    #[test]
    fn serves_rows_inside_half_open_window() {
        let terminal = ScriptedTerminal::new().with_rows(
            "TC.F.SHFE.rb.202410",
            vec![
                row(datetime!(2024-01-01 09:01)),
                row(datetime!(2024-01-02 00:00)),
            ],
        );
        terminal.connect(Path::new("/opt/terminal")).expect("connect");

        let rows = terminal
            .quote_history(&query("2024010100", "2024010200"))
            .expect("query");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date_time, datetime!(2024-01-01 09:01));
        assert_eq!(terminal.calls().len(), 1);
    }

    #[test]
    fn fails_scripted_connect_attempts() {
        let terminal = ScriptedTerminal::new().with_connect_failures(1);
        assert!(terminal.connect(Path::new("/opt/terminal")).is_err());
        assert!(terminal.connect(Path::new("/opt/terminal")).is_ok());
        assert_eq!(terminal.connect_attempts(), 2);
        assert_eq!(terminal.connected_to(), Some(PathBuf::from("/opt/terminal")));
    }

    #[test]
    fn decodes_terminal_json_rows() {
        let json = r#"[{"DateTime":"2024-01-01 09:01:00","Open":3500.0,"High":3510.0,"Low":3495.0,"Close":3505.0,"Volume":1200.0,"OpenInterest":150000.0}]"#;
        let terminal = ScriptedTerminal::new()
            .with_json_rows("TC.F.SHFE.rb.202410", json)
            .expect("valid json");
        terminal.connect(Path::new("/opt/terminal")).expect("connect");

        let rows = terminal
            .quote_history(&query("2024010100", "2024010200"))
            .expect("query");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].open_interest, 150000.0);
    }
}

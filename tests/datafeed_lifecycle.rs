//! Behavior tests for the datafeed session lifecycle and its public entry points.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use mcfeed_core::{
    CollectingSink, ConnectionState, DatafeedConfig, Exchange, HistoryRequest, Interval,
    McDatafeed, QuoteRow, ScriptedTerminal, TranslationCache, VendorSymbol,
};
use time::macros::datetime;
use time::PrimitiveDateTime;

const APP_PATH: &str = "D:/MCTrader14/APPs";

fn row(date_time: PrimitiveDateTime) -> QuoteRow {
    QuoteRow {
        date_time,
        open: 3500.0,
        high: 3512.0,
        low: 3496.0,
        close: 3508.0,
        volume: 640.0,
        open_interest: 120_500.0,
    }
}

fn rb2410_terminal() -> ScriptedTerminal {
    ScriptedTerminal::new().with_rows(
        "TC.F.SHFE.rb.202410",
        vec![
            row(datetime!(2024-01-02 15:00)),
            row(datetime!(2024-01-03 15:00)),
        ],
    )
}

fn daily_request(symbol: &str, exchange: Exchange) -> HistoryRequest {
    HistoryRequest::new(
        symbol,
        exchange,
        Interval::Daily,
        datetime!(2024-01-01 00:00 +8),
        datetime!(2024-01-05 00:00 +8),
    )
    .expect("valid request")
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[test]
fn first_query_opens_the_session_once() {
    // Given: a datafeed that has never connected
    let terminal = Arc::new(rb2410_terminal());
    let sink = Arc::new(CollectingSink::new());
    let feed = McDatafeed::new(DatafeedConfig::new(APP_PATH), terminal.clone())
        .with_sink(sink.clone());
    assert_eq!(feed.connection_state(), ConnectionState::Uninitialized);
    assert_eq!(terminal.connect_attempts(), 0);

    // When: two queries run back to back
    let first = feed.query_bar_history(&daily_request("rb2410", Exchange::Shfe));
    let second = feed.query_bar_history(&daily_request("rb2410", Exchange::Shfe));

    // Then: the session was opened exactly once, against the configured path
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(terminal.connect_attempts(), 1);
    assert_eq!(terminal.connected_to(), Some(PathBuf::from(APP_PATH)));
    assert_eq!(feed.connection_state(), ConnectionState::Connected);
    assert!(sink.messages().is_empty());
}

#[test]
fn connection_failure_soft_fails_and_next_query_retries() {
    // Given: a terminal that refuses the first connection
    let terminal = Arc::new(rb2410_terminal().with_connect_failures(1));
    let sink = Arc::new(CollectingSink::new());
    let feed = McDatafeed::new(DatafeedConfig::new(APP_PATH), terminal.clone())
        .with_sink(sink.clone());

    // When: the first query runs
    let bars = feed.query_bar_history(&daily_request("rb2410", Exchange::Shfe));

    // Then: empty result, one diagnostic, no history call
    assert!(bars.is_empty());
    assert_eq!(feed.connection_state(), ConnectionState::FailedInit);
    assert!(terminal.calls().is_empty());
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("datafeed initialization failed"));

    // When: the caller tries again
    let bars = feed.query_bar_history(&daily_request("rb2410", Exchange::Shfe));

    // Then: the session opens and data flows
    assert_eq!(bars.len(), 2);
    assert_eq!(terminal.connect_attempts(), 2);
    assert_eq!(feed.connection_state(), ConnectionState::Connected);
    assert_eq!(sink.messages().len(), 1);
}

#[test]
fn typed_query_reports_connection_failure() {
    let terminal = Arc::new(ScriptedTerminal::new().with_connect_failures(1));
    let feed = McDatafeed::new(DatafeedConfig::new(APP_PATH), terminal)
        .with_sink(Arc::new(CollectingSink::new()));

    let err = feed
        .try_query_bar_history(&daily_request("rb2410", Exchange::Shfe))
        .expect_err("must fail");

    assert_eq!(err.code(), "datafeed.connection_failure");
    assert!(err.retryable());
}

#[test]
fn tick_history_never_touches_the_terminal() {
    let terminal = Arc::new(rb2410_terminal());
    let sink = Arc::new(CollectingSink::new());
    let feed = McDatafeed::new(DatafeedConfig::new(APP_PATH), terminal.clone())
        .with_sink(sink.clone());

    let ticks = feed.query_tick_history(&HistoryRequest::new(
        "rb2410",
        Exchange::Shfe,
        Interval::Tick,
        datetime!(2024-01-02 09:00 +8),
        datetime!(2024-01-02 15:00 +8),
    )
    .expect("valid request"));

    assert!(ticks.is_empty());
    assert_eq!(terminal.connect_attempts(), 0);
    assert!(sink.messages().is_empty());
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn per_call_sink_receives_the_diagnostic() {
    let terminal = Arc::new(ScriptedTerminal::new());
    let default_sink = Arc::new(CollectingSink::new());
    let feed = McDatafeed::new(DatafeedConfig::new(APP_PATH), terminal)
        .with_sink(default_sink.clone());

    let received = Mutex::new(Vec::new());
    let capture = |message: &str| {
        received
            .lock()
            .expect("capture lock is not poisoned")
            .push(message.to_owned());
    };

    let bars = feed.query_bar_history_with(&daily_request("600000", Exchange::Sse), &capture);

    assert!(bars.is_empty());
    assert!(default_sink.messages().is_empty());
    let received = received.into_inner().expect("capture lock is not poisoned");
    assert_eq!(received.len(), 1);
    assert!(received[0].contains("600000.SSE"));
}

// =============================================================================
// Translation cache sharing
// =============================================================================

#[test]
fn feeds_can_share_one_translation_cache() {
    // Given: two datafeeds over the same cache
    let cache = Arc::new(TranslationCache::new(16));
    let first = McDatafeed::new(DatafeedConfig::new(APP_PATH), Arc::new(rb2410_terminal()))
        .with_sink(Arc::new(CollectingSink::new()))
        .with_translation_cache(cache.clone());
    let second = McDatafeed::new(DatafeedConfig::new(APP_PATH), Arc::new(rb2410_terminal()))
        .with_sink(Arc::new(CollectingSink::new()))
        .with_translation_cache(cache.clone());

    // When: both query the same contract
    assert_eq!(first.query_bar_history(&daily_request("rb2410", Exchange::Shfe)).len(), 2);
    assert_eq!(second.query_bar_history(&daily_request("rb2410", Exchange::Shfe)).len(), 2);

    // Then: one cached translation serves both
    assert_eq!(cache.len(), 1);
    assert!(Arc::ptr_eq(first.translation_cache(), second.translation_cache()));
    assert_eq!(
        cache.get("rb2410.SHFE").map(|symbol| symbol.to_string()),
        Some(String::from("TC.F.SHFE.rb.202410"))
    );
}

#[test]
fn failed_translations_are_not_cached() {
    let feed = McDatafeed::new(DatafeedConfig::new(APP_PATH), Arc::new(ScriptedTerminal::new()))
        .with_sink(Arc::new(CollectingSink::new()));

    feed.query_bar_history(&daily_request("600000", Exchange::Sse));
    feed.query_bar_history(&daily_request("IO2412-X-4000", Exchange::Cffex));

    assert!(feed.translation_cache().is_empty());
}

#[test]
fn zero_capacity_config_disables_the_cache() {
    let config = DatafeedConfig::new(APP_PATH).with_cache_capacity(0);
    let feed = McDatafeed::new(config, Arc::new(rb2410_terminal()))
        .with_sink(Arc::new(CollectingSink::new()));

    assert_eq!(feed.query_bar_history(&daily_request("rb2410", Exchange::Shfe)).len(), 2);
    assert!(feed.translation_cache().is_disabled());
    assert!(feed.translation_cache().is_empty());
}

// =============================================================================
// Symbol listing
// =============================================================================

#[test]
fn symbol_listing_parses_vendor_codes_and_skips_the_rest() {
    let terminal = Arc::new(
        ScriptedTerminal::new()
            .with_listing(
                "SHFE",
                vec![
                    String::from("TC.F.SHFE.rb.202410"),
                    String::from("TC.F.SHFE.rb.HOT"),
                    String::from("garbage"),
                ],
            )
            .with_listing(
                "CFFEX",
                vec![String::from("TC.O.CFFEX.IO.202412.C.4000")],
            ),
    );
    let feed = McDatafeed::new(DatafeedConfig::new(APP_PATH), terminal.clone())
        .with_sink(Arc::new(CollectingSink::new()));

    let symbols: Vec<String> = feed
        .query_symbols()
        .iter()
        .map(VendorSymbol::to_string)
        .collect();

    assert_eq!(
        symbols,
        vec![
            "TC.O.CFFEX.IO.202412.C.4000",
            "TC.F.SHFE.rb.202410",
            "TC.F.SHFE.rb.HOT",
        ]
    );
    assert_eq!(terminal.connect_attempts(), 1);
}

#[test]
fn symbol_listing_is_empty_when_the_session_cannot_open() {
    let terminal = Arc::new(
        ScriptedTerminal::new()
            .with_connect_failures(1)
            .with_listing("SHFE", vec![String::from("TC.F.SHFE.rb.202410")]),
    );
    let sink = Arc::new(CollectingSink::new());
    let feed = McDatafeed::new(DatafeedConfig::new(APP_PATH), terminal)
        .with_sink(sink.clone());

    assert!(feed.query_symbols().is_empty());
    assert_eq!(sink.messages().len(), 1);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn json_config_drives_the_session_path() {
    let config = DatafeedConfig::from_json_str(r#"{"app_path": "C:/MC64/APPs", "cache_capacity": 8}"#)
        .expect("valid config");
    let terminal = Arc::new(rb2410_terminal());
    let feed = McDatafeed::new(config, terminal.clone())
        .with_sink(Arc::new(CollectingSink::new()));

    assert!(feed.init());
    assert_eq!(terminal.connected_to(), Some(PathBuf::from("C:/MC64/APPs")));
    assert_eq!(feed.translation_cache().capacity(), 8);
    assert_eq!(feed.config().cache_capacity, 8);
}

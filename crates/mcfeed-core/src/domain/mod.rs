//! # Domain Models
//!
//! Canonical types shared by translation, retrieval and the datafeed facade.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Exchange`] | Exchange identifier; only futures exchanges translate |
//! | [`Interval`] | Requested bar interval |
//! | [`HistoryRequest`] | Validated request for a span of bars |
//! | [`Bar`] | Normalized OHLC bar labelled by period start |
//! | [`Tick`] | Tick record (never produced by the quote terminal) |
//!
//! Timestamps are [`time::OffsetDateTime`]. Terminal rows carry naive local
//! times which are pinned to [`SOURCE_OFFSET`] during normalization.

mod exchange;
mod interval;
mod models;
mod timestamp;

pub use exchange::Exchange;
pub use interval::Interval;
pub use models::{Bar, HistoryRequest, Tick, SOURCE_TAG};
pub use timestamp::{
    attach_source_offset, date_hour_key, display_datetime, truncate_to_midnight, SOURCE_OFFSET,
};

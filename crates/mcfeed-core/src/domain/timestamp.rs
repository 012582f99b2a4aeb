use time::format_description::FormatItem;
use time::macros::{format_description, offset};
use time::{OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// Offset of the quote terminal's local clock (China Standard Time, no DST).
pub const SOURCE_OFFSET: UtcOffset = offset!(+8);

const DATE_HOUR_KEY: &[FormatItem<'static>] = format_description!("[year][month][day][hour]");

const DISPLAY_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);

/// Format an instant as the terminal's `YYYYMMDDHH` query key, in source-local time.
pub fn date_hour_key(value: OffsetDateTime) -> String {
    value
        .to_offset(SOURCE_OFFSET)
        .format(DATE_HOUR_KEY)
        .expect("date-hour key must be formattable")
}

/// Human-readable rendering used in diagnostics.
pub fn display_datetime(value: OffsetDateTime) -> String {
    value
        .format(DISPLAY_FORMAT)
        .expect("diagnostic datetime must be formattable")
}

/// Interpret a naive terminal timestamp as source-local time.
pub fn attach_source_offset(value: PrimitiveDateTime) -> OffsetDateTime {
    value.assume_offset(SOURCE_OFFSET)
}

/// Truncate the time of day, keeping date and offset.
pub fn truncate_to_midnight(value: OffsetDateTime) -> OffsetDateTime {
    value.replace_time(Time::MIDNIGHT)
}

//! Canonical interval to terminal bar-type lookup.

use std::fmt::{Display, Formatter};

use time::Duration;

use crate::Interval;

/// Bar granularity understood by the quote terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorBarType {
    Minute,
    Daily,
}

impl VendorBarType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minute => "MINUTE",
            Self::Daily => "DK",
        }
    }
}

impl Display for VendorBarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one canonical interval is requested and relabelled.
///
/// The terminal stamps bars with the end of their period; `adjustment` is
/// subtracted from that stamp to label bars by period start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalMapping {
    pub bar_type: VendorBarType,
    pub window: u32,
    pub adjustment: Duration,
}

impl IntervalMapping {
    const fn new(bar_type: VendorBarType, window: u32, adjustment: Duration) -> Self {
        Self {
            bar_type,
            window,
            adjustment,
        }
    }
}

/// Mapping for `interval`, or `None` when the terminal cannot serve it.
pub const fn map_interval(interval: Interval) -> Option<IntervalMapping> {
    match interval {
        Interval::Minute => Some(IntervalMapping::new(
            VendorBarType::Minute,
            1,
            Duration::minutes(1),
        )),
        Interval::Hour => Some(IntervalMapping::new(
            VendorBarType::Minute,
            60,
            Duration::hours(1),
        )),
        Interval::Daily => Some(IntervalMapping::new(
            VendorBarType::Daily,
            1,
            Duration::ZERO,
        )),
        Interval::Weekly | Interval::Tick => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_bars_are_sixty_minute_windows() {
        let mapping = map_interval(Interval::Hour).expect("hour is mapped");
        assert_eq!(mapping.bar_type, VendorBarType::Minute);
        assert_eq!(mapping.window, 60);
        assert_eq!(mapping.adjustment, Duration::hours(1));
    }

    #[test]
    fn daily_bars_need_no_adjustment() {
        let mapping = map_interval(Interval::Daily).expect("daily is mapped");
        assert_eq!(mapping.bar_type, VendorBarType::Daily);
        assert_eq!(mapping.adjustment, Duration::ZERO);
    }

    #[test]
    fn weekly_and_tick_are_unmapped() {
        assert!(map_interval(Interval::Weekly).is_none());
        assert!(map_interval(Interval::Tick).is_none());
    }
}

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Bar intervals a caller may request.
///
/// Only minute, hour and daily bars can be served by the quote terminal; the
/// remaining variants exist so hosts can pass them through and get a clean
/// `UnsupportedInterval` diagnostic back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute,
    #[serde(rename = "1h")]
    Hour,
    #[serde(rename = "d")]
    Daily,
    #[serde(rename = "w")]
    Weekly,
    #[serde(rename = "tick")]
    Tick,
}

impl Interval {
    pub const ALL: [Self; 5] = [
        Self::Minute,
        Self::Hour,
        Self::Daily,
        Self::Weekly,
        Self::Tick,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minute => "1m",
            Self::Hour => "1h",
            Self::Daily => "d",
            Self::Weekly => "w",
            Self::Tick => "tick",
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(Self::Minute),
            "1h" => Ok(Self::Hour),
            "d" => Ok(Self::Daily),
            "w" => Ok(Self::Weekly),
            "tick" => Ok(Self::Tick),
            other => Err(ValidationError::InvalidInterval {
                value: other.to_owned(),
            }),
        }
    }
}

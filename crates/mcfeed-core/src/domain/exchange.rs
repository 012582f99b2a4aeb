use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical exchange identifiers accepted in history requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    Cffex,
    Shfe,
    Czce,
    Dce,
    Ine,
    Gfex,
    Sse,
    Szse,
}

impl Exchange {
    pub const ALL: [Self; 8] = [
        Self::Cffex,
        Self::Shfe,
        Self::Czce,
        Self::Dce,
        Self::Ine,
        Self::Gfex,
        Self::Sse,
        Self::Szse,
    ];

    /// Exchanges the quote terminal carries futures and options for.
    pub const FUTURES: [Self; 6] = [
        Self::Cffex,
        Self::Shfe,
        Self::Czce,
        Self::Dce,
        Self::Ine,
        Self::Gfex,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cffex => "CFFEX",
            Self::Shfe => "SHFE",
            Self::Czce => "CZCE",
            Self::Dce => "DCE",
            Self::Ine => "INE",
            Self::Gfex => "GFEX",
            Self::Sse => "SSE",
            Self::Szse => "SZSE",
        }
    }

    pub const fn is_futures(self) -> bool {
        !matches!(self, Self::Sse | Self::Szse)
    }
}

impl Display for Exchange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CFFEX" => Ok(Self::Cffex),
            "SHFE" => Ok(Self::Shfe),
            "CZCE" => Ok(Self::Czce),
            "DCE" => Ok(Self::Dce),
            "INE" => Ok(Self::Ine),
            "GFEX" => Ok(Self::Gfex),
            "SSE" => Ok(Self::Sse),
            "SZSE" => Ok(Self::Szse),
            other => Err(ValidationError::InvalidExchange {
                value: other.to_owned(),
            }),
        }
    }
}

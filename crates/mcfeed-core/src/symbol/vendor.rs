use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Exchange, ValidationError};

const PREFIX: &str = "TC";

/// Marker of a synthetic continuous series in place of an expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContinuousSuffix {
    #[serde(rename = "HOT")]
    Hot,
    #[serde(rename = "HOT/Q")]
    HotQ,
    #[serde(rename = "HOT/H")]
    HotH,
    /// The `000000` series code.
    #[serde(rename = "000000")]
    Zeroed,
}

impl ContinuousSuffix {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "HOT",
            Self::HotQ => "HOT/Q",
            Self::HotH => "HOT/H",
            Self::Zeroed => "000000",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "HOT" => Some(Self::Hot),
            "HOT/Q" => Some(Self::HotQ),
            "HOT/H" => Some(Self::HotH),
            "000000" => Some(Self::Zeroed),
            _ => None,
        }
    }
}

impl Display for ContinuousSuffix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionRight {
    #[serde(rename = "C")]
    Call,
    #[serde(rename = "P")]
    Put,
}

impl OptionRight {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Call => "C",
            Self::Put => "P",
        }
    }
}

impl Display for OptionRight {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dotted instrument code understood by the quote terminal.
///
/// | Shape | Rendering |
/// |-------|-----------|
/// | [`Future`](Self::Future) | `TC.F.<EXCH>.<PRODUCT>.<YYYYMM>` |
/// | [`Continuous`](Self::Continuous) | `TC.F.<EXCH>.<PRODUCT>.<SUFFIX>` |
/// | [`Option`](Self::Option) | `TC.O.<EXCH>.<PRODUCT>.<YYYYMM>.<C\|P>.<STRIKE>` |
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VendorSymbol {
    Future {
        exchange: Exchange,
        product: String,
        expiry: String,
    },
    Continuous {
        exchange: Exchange,
        product: String,
        suffix: ContinuousSuffix,
    },
    Option {
        exchange: Exchange,
        product: String,
        expiry: String,
        right: OptionRight,
        strike: String,
    },
}

impl VendorSymbol {
    pub fn exchange(&self) -> Exchange {
        match self {
            Self::Future { exchange, .. }
            | Self::Continuous { exchange, .. }
            | Self::Option { exchange, .. } => *exchange,
        }
    }

    pub fn product(&self) -> &str {
        match self {
            Self::Future { product, .. }
            | Self::Continuous { product, .. }
            | Self::Option { product, .. } => product,
        }
    }

    pub fn is_option(&self) -> bool {
        matches!(self, Self::Option { .. })
    }
}

impl Display for VendorSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Future {
                exchange,
                product,
                expiry,
            } => write!(f, "{PREFIX}.F.{exchange}.{product}.{expiry}"),
            Self::Continuous {
                exchange,
                product,
                suffix,
            } => write!(f, "{PREFIX}.F.{exchange}.{product}.{suffix}"),
            Self::Option {
                exchange,
                product,
                expiry,
                right,
                strike,
            } => write!(
                f,
                "{PREFIX}.O.{exchange}.{product}.{expiry}.{right}.{strike}"
            ),
        }
    }
}

impl FromStr for VendorSymbol {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidVendorSymbol {
            value: value.to_owned(),
        };

        let parts: Vec<&str> = value.trim().splitn(7, '.').collect();
        if parts.len() < 5 || parts[0] != PREFIX || parts[3].is_empty() {
            return Err(invalid());
        }

        let exchange = Exchange::from_str(parts[2]).map_err(|_| invalid())?;
        let product = parts[3].to_owned();

        match (parts[1], parts.len()) {
            ("F", 5) => {
                if let Some(suffix) = ContinuousSuffix::from_code(parts[4]) {
                    return Ok(Self::Continuous {
                        exchange,
                        product,
                        suffix,
                    });
                }
                if !is_expiry(parts[4]) {
                    return Err(invalid());
                }
                Ok(Self::Future {
                    exchange,
                    product,
                    expiry: parts[4].to_owned(),
                })
            }
            ("O", 7) => {
                let right = match parts[5] {
                    "C" => OptionRight::Call,
                    "P" => OptionRight::Put,
                    _ => return Err(invalid()),
                };
                if !is_expiry(parts[4]) || parts[6].is_empty() {
                    return Err(invalid());
                }
                Ok(Self::Option {
                    exchange,
                    product,
                    expiry: parts[4].to_owned(),
                    right,
                    strike: parts[6].to_owned(),
                })
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for VendorSymbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<VendorSymbol> for String {
    fn from(value: VendorSymbol) -> Self {
        value.to_string()
    }
}

fn is_expiry(value: &str) -> bool {
    value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit())
}

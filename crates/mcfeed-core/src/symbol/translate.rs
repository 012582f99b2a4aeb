//! Canonical contract code to vendor code translation.
//!
//! Canonical codes are the exchange's own compact contract names (`rb2410`,
//! `MA412`, `IO2412-C-4000`, `m2501C3000`, `rbHOT`). Each parsing step below is
//! a separate function so the individual rules can be exercised in isolation.

use super::vendor::{ContinuousSuffix, OptionRight, VendorSymbol};
use crate::{Exchange, TranslateError};

/// Codes up to this many characters are futures or continuous series; longer
/// codes are options.
pub const MAX_FUTURES_LEN: usize = 8;

/// Continuous-series suffixes in match order. The `HOT/x` variants come
/// before bare `HOT`.
pub const CONTINUOUS_SUFFIXES: [ContinuousSuffix; 4] = [
    ContinuousSuffix::HotQ,
    ContinuousSuffix::HotH,
    ContinuousSuffix::Hot,
    ContinuousSuffix::Zeroed,
];

/// Translate a canonical contract code into the terminal's dotted code.
///
/// # Errors
///
/// - [`TranslateError::UnsupportedExchange`] for equity exchanges
/// - [`TranslateError::MalformedSymbol`] when the code fits none of the
///   futures, continuous or option layouts
pub fn translate(symbol: &str, exchange: Exchange) -> Result<VendorSymbol, TranslateError> {
    if !exchange.is_futures() {
        return Err(TranslateError::UnsupportedExchange { exchange });
    }

    if symbol.is_empty() || !symbol.is_ascii() {
        return Err(TranslateError::malformed(symbol, "code must be non-empty ASCII"));
    }

    if symbol.len() <= MAX_FUTURES_LEN {
        translate_future(symbol, exchange)
    } else {
        translate_option(symbol, exchange)
    }
}

fn translate_future(symbol: &str, exchange: Exchange) -> Result<VendorSymbol, TranslateError> {
    if let Some(suffix) = match_continuous_suffix(symbol) {
        let product = strip_suffix_text(symbol, suffix);
        if product.is_empty() {
            return Err(TranslateError::malformed(symbol, "missing product code"));
        }
        return Ok(VendorSymbol::Continuous {
            exchange,
            product,
            suffix,
        });
    }

    let product = extract_product(symbol);
    if product.is_empty() {
        return Err(TranslateError::malformed(symbol, "missing product code"));
    }

    let expiry = parse_expiry(symbol, &symbol[product.len()..])?;
    Ok(VendorSymbol::Future {
        exchange,
        product: product.to_owned(),
        expiry,
    })
}

fn translate_option(symbol: &str, exchange: Exchange) -> Result<VendorSymbol, TranslateError> {
    let product = extract_product(symbol);
    if product.is_empty() {
        return Err(TranslateError::malformed(symbol, "missing product code"));
    }

    let remainder = &symbol[product.len()..];
    let parts = if symbol.contains('-') {
        split_dashed_option(remainder)
    } else {
        split_concatenated_option(remainder)
    }
    .ok_or_else(|| TranslateError::malformed(symbol, "missing option type marker"))?;

    if parts.strike.is_empty() {
        return Err(TranslateError::malformed(symbol, "missing strike"));
    }

    let expiry = parse_expiry(symbol, parts.time)?;
    Ok(VendorSymbol::Option {
        exchange,
        product: product.to_owned(),
        expiry,
        right: parts.right,
        strike: parts.strike.to_owned(),
    })
}

/// First continuous suffix the code ends with.
pub fn match_continuous_suffix(symbol: &str) -> Option<ContinuousSuffix> {
    CONTINUOUS_SUFFIXES
        .into_iter()
        .find(|suffix| symbol.ends_with(suffix.as_str()))
}

/// Remove every occurrence of the suffix text from the code.
///
/// This deletes the text wherever it appears, not only at the end, so a
/// product name that itself contains the suffix characters is shortened too.
pub fn strip_suffix_text(symbol: &str, suffix: ContinuousSuffix) -> String {
    symbol.replace(suffix.as_str(), "")
}

/// Leading run of non-digit characters.
pub fn extract_product(symbol: &str) -> &str {
    let end = symbol
        .find(|ch: char| ch.is_ascii_digit())
        .unwrap_or(symbol.len());
    &symbol[..end]
}

/// Two-digit year for a year fragment.
///
/// A single digit is read as 2020-2025 when it is 5 or lower and as 2016-2019
/// otherwise. Codes outside that window resolve to the wrong decade.
/// Fragments longer than two digits are rejected.
pub fn expand_year(fragment: &str) -> Option<String> {
    if fragment.is_empty() || !fragment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match fragment.len() {
        1 => {
            let digit = fragment.as_bytes()[0] - b'0';
            let decade = if digit <= 5 { '2' } else { '1' };
            Some(format!("{decade}{digit}"))
        }
        2 => Some(fragment.to_owned()),
        _ => None,
    }
}

/// Split `<year><MM>` into a `YYYYMM` expiry.
pub fn split_expiry(time: &str) -> Option<String> {
    if time.len() < 3 || !time.is_ascii() {
        return None;
    }

    let (year, month) = time.split_at(time.len() - 2);
    if !month.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month_number: u8 = month.parse().ok()?;
    if !(1..=12).contains(&month_number) {
        return None;
    }

    let year = expand_year(year)?;
    Some(format!("20{year}{month}"))
}

fn parse_expiry(symbol: &str, time: &str) -> Result<String, TranslateError> {
    split_expiry(time).ok_or_else(|| TranslateError::malformed(symbol, "invalid year/month"))
}

/// Pieces of an option code after the product has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionParts<'a> {
    pub time: &'a str,
    pub right: OptionRight,
    pub strike: &'a str,
}

/// `2412-C-4000` layout.
pub fn split_dashed_option(remainder: &str) -> Option<OptionParts<'_>> {
    let right = if remainder.contains("-C-") {
        OptionRight::Call
    } else if remainder.contains("-P-") {
        OptionRight::Put
    } else {
        return None;
    };

    let dash = remainder.find('-')?;
    let time_end = dash.checked_sub(1)?;
    Some(OptionParts {
        time: &remainder[..=time_end],
        right,
        strike: remainder.get(time_end + 4..)?,
    })
}

/// `2501C3000` layout.
pub fn split_concatenated_option(remainder: &str) -> Option<OptionParts<'_>> {
    let (marker, right) = match (remainder.find('C'), remainder.find('P')) {
        (Some(call), Some(put)) if put < call => (put, OptionRight::Put),
        (Some(call), _) => (call, OptionRight::Call),
        (None, Some(put)) => (put, OptionRight::Put),
        (None, None) => return None,
    };

    let time_end = marker.checked_sub(1)?;
    Some(OptionParts {
        time: &remainder[..=time_end],
        right,
        strike: remainder.get(time_end + 2..)?,
    })
}

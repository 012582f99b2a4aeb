//! Contract code translation between canonical and terminal naming.

mod translate;
mod vendor;

pub use translate::{
    expand_year, extract_product, match_continuous_suffix, split_concatenated_option,
    split_dashed_option, split_expiry, strip_suffix_text, translate, OptionParts,
    CONTINUOUS_SUFFIXES, MAX_FUTURES_LEN,
};
pub use vendor::{ContinuousSuffix, OptionRight, VendorSymbol};

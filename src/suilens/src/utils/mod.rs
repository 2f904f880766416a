pub mod bigint_string;
mod format;
mod type_tag;

pub use format::{format_address, format_amount, format_signed_amount, parse_amount, UNKNOWN_ADDRESS};
pub use type_tag::{
    CoinType, DYNAMIC_FIELD_LABEL, is_dynamic_field, prettify_type, short_name, split_generics,
    type_params,
};

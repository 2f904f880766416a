//! Helpers for Move type tags such as `0x2::coin::Coin<0x2::sui::SUI>`.

use std::fmt::{self, Display};

/// Single label shown for every internal dynamic-field wrapper object.
pub const DYNAMIC_FIELD_LABEL: &str = "Dynamic Field";

const DYNAMIC_FIELD_MARKER: &str = "::dynamic_field::Field";
const COIN_WRAPPER_SUFFIX: &str = "::coin::Coin";

/// A coin type `package::module::NAME`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinType {
    pub package: String,
    pub module: String,
    pub name: String,
}

impl CoinType {
    pub fn parse(coin_type: &str) -> Self {
        let (base, _) = split_generics(coin_type.trim());
        let parts: Vec<&str> = base.split("::").collect();

        CoinType {
            package: parts.first().unwrap_or(&"").to_string(),
            module: parts.get(1).unwrap_or(&"").to_string(),
            name: parts.last().unwrap_or(&"").to_string(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.name
    }
}

impl Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.name)
    }
}

impl Default for CoinType {
    fn default() -> CoinType {
        CoinType::parse("0x0::unknown::Unknown")
    }
}

/// Splits `base<params>` at the first `<`. The parameter text excludes the closing `>`.
pub fn split_generics(tag: &str) -> (&str, Option<&str>) {
    match tag.split_once('<') {
        Some((base, rest)) => (base, Some(rest.strip_suffix('>').unwrap_or(rest))),
        None => (tag, None),
    }
}

/// Top-level generic parameters of a type tag, in declaration order.
pub fn type_params(tag: &str) -> Vec<String> {
    let Some(inner) = split_generics(tag).1 else {
        return vec![];
    };

    let mut params = vec![];
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                params.push(inner[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = inner[start..].trim();
    if !last.is_empty() {
        params.push(last.to_string());
    }
    params
}

/// Trailing `::` segment of the non-generic part, e.g. `SwapEvent`.
pub fn short_name(tag: &str) -> &str {
    let (base, _) = split_generics(tag);
    base.rsplit("::").next().unwrap_or(base)
}

pub fn is_dynamic_field(tag: &str) -> bool {
    tag.contains(DYNAMIC_FIELD_MARKER)
}

/// Display form of an object type.
///
/// - `0x2::coin::Coin<0x2::sui::SUI>` becomes `Coin (SUI)`.
/// - dynamic-field wrappers collapse to [`DYNAMIC_FIELD_LABEL`].
/// - anything else drops package and module and its generic suffix:
///   `0xabc::pool::Pool<A, B>` becomes `Pool`.
pub fn prettify_type(tag: &str) -> String {
    if is_dynamic_field(tag) {
        return DYNAMIC_FIELD_LABEL.to_string();
    }

    let (base, _) = split_generics(tag);
    if base.ends_with(COIN_WRAPPER_SUFFIX) {
        if let Some(inner) = type_params(tag).first() {
            return format!("Coin ({})", short_name(inner));
        }
    }

    let segments: Vec<&str> = base.split("::").collect();
    if segments.len() >= 3 {
        segments[2..].join("::")
    } else {
        tag.to_string()
    }
}

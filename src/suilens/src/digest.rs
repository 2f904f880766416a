//! Turning user input into a transaction digest, and digests into shareable links.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::errors::InputError;

/// Query parameter carrying the digest in a shareable link.
pub const DEEP_LINK_PARAM: &str = "tx";

const TX_PATH_SEGMENT: &str = "/tx/";

// Syntactic check only. Sui digests are base58, this accepts any alphanumeric string.
static DIGEST_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{32,64}$").expect("digest pattern is valid"));

pub fn is_valid_digest(candidate: &str) -> bool {
    DIGEST_PATTERN.is_match(candidate)
}

/// Pulls the digest out of an explorer URL such as `https://suiscan.xyz/mainnet/tx/<digest>`.
/// Input without a `/tx/` segment is returned trimmed but otherwise untouched.
pub fn extract_digest(input: &str) -> &str {
    let input = input.trim();
    let Some((_, rest)) = input.split_once(TX_PATH_SEGMENT) else {
        return input;
    };

    let rest = rest.split('?').next().unwrap_or(rest);
    rest.split('/').next().unwrap_or(rest)
}

/// Validated digest from a bare digest, an explorer URL or a shareable link.
pub fn parse_input(input: &str) -> Result<String, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyInput);
    }

    let candidate = if trimmed.contains(TX_PATH_SEGMENT) {
        extract_digest(trimmed).to_string()
    } else if let Some(shared) = shared_digest(trimmed)? {
        shared
    } else {
        trimmed.to_string()
    };

    if is_valid_digest(&candidate) {
        Ok(candidate)
    } else {
        Err(InputError::InvalidDigest(candidate))
    }
}

// `Ok(None)` for anything that is not an http(s) URL.
fn shared_digest(input: &str) -> Result<Option<String>, InputError> {
    if !(input.starts_with("http://") || input.starts_with("https://")) {
        return Ok(None);
    }

    let url = Url::parse(input).map_err(|e| InputError::InvalidUrl(e.to_string()))?;
    Ok(url
        .query_pairs()
        .find(|(key, _)| key == DEEP_LINK_PARAM)
        .map(|(_, value)| value.into_owned()))
}

/// `base` with `?tx=<digest>`, replacing any existing `tx` parameter.
pub fn share_link(base: &Url, digest: &str) -> Url {
    let (_, mut link) = consume_deep_link(base);
    link.query_pairs_mut().append_pair(DEEP_LINK_PARAM, digest);
    link
}

/// Takes the digest out of a shareable link.
///
/// Returns the digest, if present, and the location with the parameter removed so that
/// reloading the stripped location does not trigger another fetch.
pub fn consume_deep_link(location: &Url) -> (Option<String>, Url) {
    let mut digest = None;
    let mut kept: Vec<(String, String)> = vec![];
    for (key, value) in location.query_pairs() {
        if key == DEEP_LINK_PARAM {
            digest.get_or_insert_with(|| value.into_owned());
        } else {
            kept.push((key.into_owned(), value.into_owned()));
        }
    }

    let mut stripped = location.clone();
    if kept.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(kept);
    }

    (digest.filter(|d| !d.is_empty()), stripped)
}

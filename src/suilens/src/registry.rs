//! Display metadata for known on-chain protocols, keyed by package id.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

/// DeepBook package ids are often written in this short form.
const DEEPBOOK_PREFIX: &str = "0xdee9";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProtocolEntry {
    pub name: &'static str,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'static str>,
}

const KNOWN_PROTOCOLS: &[(&str, ProtocolEntry)] = &[
    (
        "0x0000000000000000000000000000000000000000000000000000000000000002",
        ProtocolEntry {
            name: "Sui Framework",
            icon: "💧",
            url: Some("https://docs.sui.io/"),
        },
    ),
    (
        "0x0000000000000000000000000000000000000000000000000000000000000003",
        ProtocolEntry {
            name: "Sui System",
            icon: "⚙️",
            url: Some("https://docs.sui.io/"),
        },
    ),
    (
        "0xdee9",
        ProtocolEntry {
            name: "DeepBook",
            icon: "📘",
            url: Some("https://sui.io/deepbook"),
        },
    ),
    (
        "0x1eabed72c53feb3805120a081dc15963c20c1d28810123282f4e15e855c0e100",
        ProtocolEntry {
            name: "Cetus CLMM",
            icon: "🐳",
            url: Some("https://www.cetus.zone/"),
        },
    ),
    (
        "0x91bfbc386a41afcfd9b2533058d7e915a1d3829089cc268ff4333d54d6339ca1",
        ProtocolEntry {
            name: "Turbos Finance",
            icon: "⚡",
            url: Some("https://turbos.finance/"),
        },
    ),
];

static REGISTRY: Lazy<ProtocolRegistry> = Lazy::new(ProtocolRegistry::with_known_protocols);

/// Maps package ids to [`ProtocolEntry`].
///
/// Lookups try an exact match first. The only other match is the DeepBook short-prefix
/// heuristic, which yields name and icon without a URL.
#[derive(Debug, Default)]
pub struct ProtocolRegistry {
    entries: HashMap<&'static str, ProtocolEntry>,
}

impl ProtocolRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with the built-in protocol table
    pub fn with_known_protocols() -> Self {
        ProtocolRegistry {
            entries: KNOWN_PROTOCOLS
                .iter()
                .map(|(package_id, entry)| (*package_id, *entry))
                .collect(),
        }
    }

    /// Process-wide registry, built on first use and never mutated afterwards.
    pub fn global() -> &'static ProtocolRegistry {
        &REGISTRY
    }

    pub fn lookup(&self, package_id: &str) -> Option<ProtocolEntry> {
        if let Some(entry) = self.entries.get(package_id) {
            return Some(*entry);
        }

        if package_id.starts_with(DEEPBOOK_PREFIX) {
            return Some(ProtocolEntry {
                name: "DeepBook",
                icon: "📘",
                url: None,
            });
        }

        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

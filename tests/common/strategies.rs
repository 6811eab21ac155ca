//! Proptest strategies for launch-argument properties.

use proptest::prelude::*;

/// Names pgmq accepts as queue names
pub fn queue_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,30}"
}

/// Comma-separated lists of two to five valid names, with optional padding
pub fn queue_list_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((queue_name_strategy(), " {0,2}"), 2..=5).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(name, pad)| format!("{pad}{name}{pad}"))
            .collect::<Vec<_>>()
            .join(",")
    })
}

/// Arbitrary `--queue` text, valid or not
pub fn any_queue_argument() -> impl Strategy<Value = String> {
    ".{0,40}"
}

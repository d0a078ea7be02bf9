// CollectLog - core/pattern.rs
//
// Splits `;`-separated lists: filename pattern sets and directory specifiers.
// Glob syntax is not validated here; discovery treats a pattern that fails
// to compile as matching nothing.

use crate::util::constants::LIST_SEPARATOR;

/// Split a pattern set such as `messages.p*;TBT*` into its patterns,
/// in order, dropping empty entries.
pub fn resolve_patterns(pattern_set: &str) -> Vec<String> {
    split_list(pattern_set)
}

/// Split a directory specifier such as `.;./dirA;./dirB` into its paths,
/// in order, dropping empty entries.
pub fn split_directories(specifier: &str) -> Vec<String> {
    split_list(specifier)
}

fn split_list(list: &str) -> Vec<String> {
    list.split(LIST_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

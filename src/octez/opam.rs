//! `opam env --sexp` output.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static PAIR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\(\s*"((?:[^"\\]|\\.)*)"\s+"((?:[^"\\]|\\.)*)"\s*\)"#)
        .expect("PAIR_REGEX must compile")
});

fn unescape(s: &str) -> String {
    s.replace("\\\"", "\"").replace("\\\\", "\\")
}

/// Parse `(("NAME" "value") ...)` into a variable map.
pub fn parse_opam_env(sexp: &str) -> HashMap<String, String> {
    PAIR_REGEX
        .captures_iter(sexp)
        .map(|caps| (unescape(&caps[1]), unescape(&caps[2])))
        .collect()
}

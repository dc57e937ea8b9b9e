//! Glob pattern matching for changed-file ownership
//!
//! Patterns support `*` (any run of characters, including `/`) and `?`
//! (exactly one character); everything else matches literally, anchored to
//! the whole path. The `*` wildcard deliberately crosses path segments:
//! `src/*.ts` matches `src/a/b.ts`. Downstream pipelines rely on this
//! relaxed behavior, so it must not be tightened to shell-glob semantics.

use regex::Regex;

/// Check whether a file path matches any of the project's glob patterns
pub fn matches(file_path: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| pattern_matches(pattern, file_path))
}

fn pattern_matches(pattern: &str, file_path: &str) -> bool {
    match Regex::new(&glob_to_regex(pattern)) {
        Ok(re) => re.is_match(file_path),
        // Unreachable with escaped literals, but an unbuildable pattern
        // simply claims nothing rather than failing the run.
        Err(_) => false,
    }
}

/// Translate a glob into an anchored regex: `*` -> `.*`, `?` -> `.`,
/// all other characters escaped and matched literally.
fn glob_to_regex(pattern: &str) -> String {
    let mut re = String::with_capacity(pattern.len() + 2);
    re.push('^');

    for ch in pattern.chars() {
        match ch {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            _ => re.push_str(&regex::escape(&ch.to_string())),
        }
    }

    re.push('$');
    re
}

//! Deduplicated, developer-facing diagnostics for recoverable conditions.
//!
//! This is not an error-reporting path: every caller-recoverable failure
//! still comes back as a `CssError`. `warn_once` exists for conditions that
//! are normal CSS 2.1 error recovery (a dropped late `@import`, an
//! unrecognized at-rule, a selector that failed to parse) and that a
//! developer should see once per process, not once per occurrence.

use std::collections::HashSet;
use std::sync::Mutex;

static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Emit `message` to stderr the first time it is seen for `component`;
/// subsequent calls with the same pair are silently dropped.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("{component}:{message}");
    let mut guard = WARNED.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let seen = guard.get_or_insert_with(HashSet::new);
    if seen.insert(key) {
        eprintln!("{YELLOW}[css21 {component}] warning: {message}{RESET}");
    }
}

/// Reset the dedup set. Intended for tests that assert on warning output.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_warning_reports_once() {
        clear_warnings();
        warn_once("test", "duplicate message");
        warn_once("test", "duplicate message");
        // No assertion on stderr content here; this exercises the dedup path
        // without panicking under concurrent test execution.
    }
}

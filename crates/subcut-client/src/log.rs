// crates/subcut-client/src/log.rs
//
// Unified logging for worker threads.
//
// Front ends may run detached from any console (double-click launch), so
// `eprintln!` output from background job threads can be silently discarded.
// All log calls also go to a temp file so they're visible regardless of
// launch mode.
//
// File: <temp>/subcut.log — append-only, created on first write per session.
//
// Usage:
//   use crate::log::slog;
//   slog("[worker] upload dispatched");
//
// Or use the macro for format-string convenience:
//   subcut_log!("[api] POST {url} failed: {e}");

use std::io::Write;

/// Write `msg` to the SubCut log file in the OS temp directory.
/// Never panics — failures are silently ignored (we're already in a fallback path).
pub fn slog(msg: &str) {
    if let Ok(mut f) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(std::env::temp_dir().join("subcut.log"))
    {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = writeln!(f, "[{ts}] {msg}");
    }
}

/// Convenience macro — formats like `eprintln!` but routes through `slog`
/// AND echoes to stderr for attached runs.
#[macro_export]
macro_rules! subcut_log {
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        eprintln!("{msg}");
        $crate::log::slog(&msg);
    }};
}

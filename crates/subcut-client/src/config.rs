// crates/subcut-client/src/config.rs
// Single source of truth for where the SubCut backend lives.

/// Development default — the backend's Flask-style localhost binding.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Base URL for all backend calls: `SUBCUT_BACKEND_URL` when set and
/// non-empty, the localhost default otherwise. Trailing slashes are dropped
/// so route concatenation stays predictable.
pub fn backend_base_url() -> String {
    std::env::var("SUBCUT_BACKEND_URL")
        .ok()
        .map(|u| u.trim().trim_end_matches('/').to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        // Exercise the normalization directly — env mutation in tests races
        // with parallel test threads.
        let u = "http://backend:9000/"
            .trim()
            .trim_end_matches('/')
            .to_string();
        assert_eq!(u, "http://backend:9000");
    }

    #[test]
    fn default_is_localhost() {
        assert_eq!(DEFAULT_BASE_URL, "http://127.0.0.1:5000");
    }
}

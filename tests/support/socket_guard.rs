//! Wiremock servers for integration tests, skipped where localhost
//! sockets cannot be bound (sandboxed CI). `MEDIADUMP_REQUIRE_SOCKET_TESTS=1`
//! turns the skip into a failure.

use std::net::TcpListener;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "MEDIADUMP_REQUIRE_SOCKET_TESTS";

fn socket_tests_required() -> bool {
    std::env::var(REQUIRE_ENV)
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Starts a mock server, or returns `None` when the test should be skipped.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return Some(MockServer::start().await);
    }

    assert!(
        !socket_tests_required(),
        "cannot bind a localhost socket and {REQUIRE_ENV} is set"
    );
    eprintln!("[socket-bound-test] cannot bind a localhost socket; skipping");
    None
}

#![allow(dead_code)]

use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tempfile::TempDir;

/// Environment variables that would leak host configuration into a test run.
const ISOLATED_VARS: &[&str] = &[
    "REDASH_API_QUERY_URL",
    "REDASH_API_KEY",
    "REDASH_TIMEOUT_SECONDS",
    "EXCLUDE_SOURCES",
    "GOOD_STATUSES",
    "NEUTRAL_STATUSES",
    "MIN_TOTAL_ENTRIES",
    "DEFAULT_ERROR_THRESHOLD_PERCENT",
    "SPECIFIC_ERROR_THRESHOLD_PERCENT",
    "DEBUG",
    "RUST_LOG",
    "NO_COLOR",
    "HTTP_PROXY",
    "http_proxy",
    "HTTPS_PROXY",
    "https_proxy",
    "ALL_PROXY",
    "all_proxy",
];

/// Creates an `assert_cmd` Command for the uptake-guard binary.
#[macro_export]
macro_rules! uptake_guard {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("uptake-guard"))
    };
}

/// Temporary working directory doubling as HOME, so no host config or
/// cache is picked up.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn create_config(&self, content: &str) -> PathBuf {
        self.create_file(".uptake-guard.toml", content)
    }

    pub fn create_report(&self, rows: &[&str]) -> PathBuf {
        self.create_file("report.json", &report_json(rows))
    }

    /// Command running inside the fixture with a scrubbed environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = uptake_guard!();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env("XDG_CACHE_HOME", self.path().join(".cache"));
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }
}

/// Wrap JSON row objects in the query-result envelope.
pub fn report_json(rows: &[&str]) -> String {
    format!(
        r#"{{"query_result": {{"data": {{"rows": [{}]}}}}}}"#,
        rows.join(", ")
    )
}

/// A row that passes under the default policy.
pub const HEALTHY_ROW: &str =
    r#"{"source": "main/collection", "success": 9500, "up_to_date": 300, "sync_error": 200}"#;

/// A row flagged under the default 2% threshold (10% bad).
pub const UNHEALTHY_ROW: &str = r#"{"source": "blocklists/addons", "success": 9000, "network_error": 700, "sync_error": 300, "backoff": 0}"#;

/// A row removed by the default exclusion list.
pub const EXCLUDED_ROW: &str = r#"{"source": "normandy/recipes", "network_error": 5000}"#;

/// A row below the default minimum sample count.
pub const SPARSE_ROW: &str = r#"{"source": "main/tippytop", "success": 10, "network_error": 10}"#;

pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

impl CannedResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// One-connection-per-response HTTP server on 127.0.0.1.
///
/// Each request line received is sent on the returned channel.
pub fn serve(responses: Vec<CannedResponse>) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local address");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };

            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let request = String::from_utf8_lossy(&request);
            let _ = tx.send(request.lines().next().unwrap_or_default().to_string());

            let reply = format!(
                "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                response.status,
                response.body.len(),
                response.body
            );
            let _ = stream.write_all(reply.as_bytes());
            let _ = stream.flush();
        }
    });

    (
        format!("http://{addr}/api/queries/61352/results.json"),
        rx,
    )
}

/// A local URL nothing is listening on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{addr}/api/queries/1/results.json")
}

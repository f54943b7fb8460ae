use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use collector::config::{Config, CorsOrigins};

/// A running test server writing to its own temporary row-store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub csv_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a JSON value, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/submit"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit a raw body as-is, return (body, status).
    pub async fn submit_raw(&self, body: &'static str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/submit"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("submit raw failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Current row-store contents, `None` if the file does not exist yet.
    pub fn read_store(&self) -> Option<String> {
        std::fs::read_to_string(&self.csv_path).ok()
    }

    /// Row-store lines, header first.
    pub fn store_lines(&self) -> Vec<String> {
        self.read_store()
            .unwrap_or_default()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }
}

/// Spawn a test app on a random port with a fresh temporary row-store.
pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = dir.path().join("submissions.csv");
    spawn_app_at(dir, csv_path).await
}

/// Spawn a test app whose row-store lives at `csv_path`.
pub async fn spawn_app_at(dir: TempDir, csv_path: PathBuf) -> TestApp {
    let config = Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        csv_path: csv_path.clone(),
        max_body_size: 1_048_576,
        cors_origins: CorsOrigins::Any,
        log_level: "warn".to_string(),
    };

    let app = collector::build_app(config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        csv_path,
        _dir: dir,
    }
}

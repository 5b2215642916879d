#![allow(dead_code)]

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use passgate_api::config::PasswordConfig;
use passgate_api::{app, AppConfig, AppState};

pub const TEST_SECRET: &str = "integration-test-secret-key-32-bytes!!";

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Development preset with the test secret and the cheapest Argon2 cost
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.password = PasswordConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    };
    config
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = test_config();
        config.server.port = port;
        config.server.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string();
        let state = AppState::new(config).context("failed to build app state")?;

        let listener = std::net::TcpListener::bind(("127.0.0.1", port)).context("failed to bind test port")?;
        listener.set_nonblocking(true)?;

        // Each #[tokio::test] owns a short-lived runtime, so the server gets its
        // own thread and runtime that live as long as the test binary
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("failed to build server runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("failed to adopt listener");
                axum::serve(listener, app(state)).await.expect("server");
            });
        });

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    // Use stable get_or_init and convert init errors into a panic with context.
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Unique username per test so tests can share one server
pub fn unique_username(prefix: &str) -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    format!(
        "{}-{}-{}",
        prefix,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

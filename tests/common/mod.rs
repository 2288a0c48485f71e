//! Shared utilities for integration tests.

use std::net::SocketAddr;

use serde_json::Value;
use tamper_engine::config::TamperConfig;
use tamper_engine::http::HttpServer;
use tamper_engine::lifecycle::Shutdown;
use tokio::net::TcpListener;

pub const TEST_API_KEY: &str = "integration-test-key";

/// A bridge running on an ephemeral port.
pub struct TestBridge {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestBridge {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON body and decode the JSON reply.
    pub async fn post(&self, path: &str, body: &Value) -> Value {
        let res = self.client.post(self.url(path)).json(body).send().await.unwrap();
        assert!(res.status().is_success(), "{} returned {}", path, res.status());
        res.json().await.unwrap()
    }
}

impl Drop for TestBridge {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Default config with the admin API switched on.
pub fn test_config() -> TamperConfig {
    let mut config = TamperConfig::default();
    config.admin.enabled = true;
    config.admin.api_key = TEST_API_KEY.to_string();
    config
}

/// Start a bridge with `config` and return once it is accepting connections.
pub async fn start_bridge(config: TamperConfig) -> TestBridge {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestBridge {
        addr,
        client: reqwest::Client::new(),
        shutdown,
    }
}

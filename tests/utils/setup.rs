#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use roomlink::{
    stub::{self, StubState},
    ClientConfig, RoomClient, ToastBoard,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub stub: StubState,
    pub endpoint: String,
    pub client: RoomClient,
    pub toasts: Arc<ToastBoard>,
    _server: JoinHandle<()>,
}

impl TestSetup {
    /// Another client against the same stub, e.g. a second browser
    pub fn second_client(&self, player_name: &str) -> (RoomClient, Arc<ToastBoard>) {
        roomlink::connect(ClientConfig::for_endpoint(&self.endpoint).with_player_name(player_name))
    }
}

pub struct TestSetupBuilder {
    timeout: Option<Duration>,
    player_name: String,
    default_topics: bool,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            timeout: None,
            player_name: "Guest".to_string(),
            default_topics: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_player(mut self, player_name: &str) -> Self {
        self.player_name = player_name.to_string();
        self
    }

    pub fn with_default_topics(mut self) -> Self {
        self.default_topics = true;
        self
    }

    pub async fn build(self) -> TestSetup {
        let stub = if self.default_topics {
            StubState::with_default_topics()
        } else {
            StubState::new()
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server_state = stub.clone();
        let server = tokio::spawn(async move {
            stub::serve(listener, server_state).await.unwrap();
        });

        let endpoint = format!("http://{}{}", addr, stub::STUB_PATH);
        let mut config =
            ClientConfig::for_endpoint(&endpoint).with_player_name(self.player_name.as_str());
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        let (client, toasts) = roomlink::connect(config);

        TestSetup {
            stub,
            endpoint,
            client,
            toasts,
            _server: server,
        }
    }
}

/// Endpoint on a loopback port nothing listens on
pub async fn unreachable_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, stub::STUB_PATH)
}

//! Test helpers for integration tests
//!
//! Provides utilities for spawning a relay on an ephemeral port and
//! driving it with real WebSocket clients.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use relay_common::AppConfig;
use relay_gateway::protocol::RelayFrame;
use relay_gateway::server::{create_app, create_gateway_state, GatewayState, SOCKET_PATH};
use reqwest::Client;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long a client waits for a frame before failing
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Window used to assert that nothing else arrives
pub const QUIET_WINDOW: Duration = Duration::from_millis(200);

/// Configuration used by test servers
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.app.name = "relay-integration".to_string();
    config.relay.port = 0;
    config
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    /// Shared with the running server, for inspecting live state
    pub state: GatewayState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_gateway_state(config);
        let app = create_app(state.clone());

        // Bind to an ephemeral port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(RECV_TIMEOUT).build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the WebSocket URL of the relay
    pub fn ws_url(&self) -> String {
        format!("ws://{}{}", self.addr, SOCKET_PATH)
    }

    /// Open a relay connection and consume its handshake
    pub async fn connect(&self) -> Result<TestClient> {
        TestClient::connect(&self.ws_url()).await
    }

    /// Number of connections the server currently tracks
    pub fn connection_count(&self) -> usize {
        self.state.connection_manager().connection_count()
    }

    /// Number of bound sessions
    pub fn session_count(&self) -> usize {
        self.state.sessions().len()
    }
}

/// A WebSocket client speaking the relay protocol
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Session id announced in the handshake
    pub session_id: String,
}

impl TestClient {
    /// Connect and wait for the `connect` handshake
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws, _response) = connect_async(url).await?;
        let mut client = Self {
            ws,
            session_id: String::new(),
        };

        let hello = client.next_frame().await?;
        if hello.event != "connect" {
            bail!("expected connect handshake, got {hello}");
        }

        client.session_id = hello
            .data
            .as_ref()
            .and_then(|d| d.get("sid"))
            .and_then(Value::as_str)
            .context("handshake without sid")?
            .to_string();

        Ok(client)
    }

    /// Emit an event with a payload
    pub async fn emit(&mut self, event: &str, data: Value) -> Result<()> {
        let frame = RelayFrame {
            event: event.to_string(),
            data: Some(data),
        };
        self.send_text(&frame.to_json()?).await
    }

    /// Send a raw text frame
    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.ws.send(Message::Text(text.to_string().into())).await?;
        Ok(())
    }

    /// Wait for the next relay frame, skipping control frames
    pub async fn next_frame(&mut self) -> Result<RelayFrame> {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .context("timed out waiting for frame")?;

            match msg {
                Some(Ok(Message::Text(text))) => return Ok(RelayFrame::from_json(&text)?),
                Some(Ok(Message::Close(_))) | None => bail!("connection closed"),
                Some(Ok(Message::Binary(_))) => bail!("unexpected binary frame"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Check that no relay frame arrives within the quiet window
    pub async fn assert_quiet(&mut self) -> Result<()> {
        match tokio::time::timeout(QUIET_WINDOW, self.next_frame()).await {
            Err(_) => Ok(()),
            Ok(Ok(frame)) => bail!("unexpected frame {frame}: {:?}", frame.data),
            Ok(Err(e)) => Err(e),
        }
    }

    /// Send a raw binary frame
    pub async fn send_binary(&mut self, bytes: &[u8]) -> Result<()> {
        self.ws.send(Message::Binary(bytes.to_vec().into())).await?;
        Ok(())
    }

    /// Wait until the server closes the connection
    ///
    /// Returns the close code carried by the server's Close frame, if any.
    pub async fn expect_closed(&mut self) -> Result<Option<u16>> {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .context("timed out waiting for close")?;

            match msg {
                Some(Ok(Message::Close(frame))) => return Ok(frame.map(|f| u16::from(f.code))),
                Some(Err(_)) | None => return Ok(None),
                Some(Ok(_)) => continue,
            }
        }
    }

    /// Close the connection from the client side
    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}

/// Poll a condition until it holds or the receive timeout passes
pub async fn wait_until(condition: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;

    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    condition()
}

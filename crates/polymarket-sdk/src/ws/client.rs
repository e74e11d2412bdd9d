//! WebSocket client for the Polymarket market and user channels
//!
//! Endpoint: wss://ws-subscriptions-clob.polymarket.com/ws/{market|user}
//!
//! # Features
//! - Market channel: public, subscribe by asset ids
//! - User channel: L2 credentials in the subscription `auth` field
//! - Dynamic subscribe / unsubscribe on a live connection
//! - Text `PING` keepalive, `PONG` replies ignored
//!
//! A closed or failed connection ends the session; callers reconnect.
//!
//! # Source
//! - WSS Overview: https://docs.polymarket.com/developers/CLOB/websocket/wss-overview
//! - Market Channel: https://docs.polymarket.com/developers/CLOB/websocket/market-channel
//! - User Channel: https://docs.polymarket.com/developers/CLOB/websocket/user-channel

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use super::handler::WsEventHandler;
use crate::auth::{AuthManager, AuthTier};
use crate::config::{normalize_base_url, ClientConfig};
use crate::error::AuthError;
use crate::types::{
    ChannelType, MessageStats, SubscribeRequest, SubscriptionChange, SubscriptionOperation, WsAuth,
    WsFrame,
};

/// Default keepalive interval
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(10);

/// How often `run` checks the shutdown flag while idle
const SHUTDOWN_POLL: Duration = Duration::from_millis(250);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection factory for both channels
#[derive(Clone)]
pub struct WsClient {
    base_url: String,
    auth: Arc<AuthManager>,
    ping_interval: Duration,
    enable_features: bool,
}

impl WsClient {
    pub fn new(auth: Arc<AuthManager>) -> Self {
        Self::with_config(&ClientConfig::default(), auth)
    }

    pub fn with_config(config: &ClientConfig, auth: Arc<AuthManager>) -> Self {
        Self {
            base_url: normalize_base_url(&config.ws_base_url),
            auth,
            ping_interval: DEFAULT_PING_INTERVAL,
            enable_features: true,
        }
    }

    /// Create with custom endpoint (for testing)
    pub fn with_base_url(base_url: &str, auth: Arc<AuthManager>) -> Self {
        Self::with_config(&ClientConfig::default().with_ws_base_url(base_url), auth)
    }

    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval;
        self
    }

    /// Enable or disable feature-flagged market messages
    pub fn with_features(mut self, enable: bool) -> Self {
        self.enable_features = enable;
        self
    }

    pub fn endpoint(&self, channel: ChannelType) -> String {
        format!("{}{}", self.base_url, channel.path())
    }

    /// Connect to the market channel and subscribe to `asset_ids`
    pub async fn connect_market(&self, asset_ids: Vec<String>) -> Result<WsConnection> {
        info!("Subscribing to {} assets: {:?}", asset_ids.len(), &asset_ids);
        let request = SubscribeRequest::market(asset_ids, self.enable_features);
        let payload = serde_json::to_string(&request)?;
        debug!("Subscribe request: {}", payload);

        self.connect(ChannelType::Market, payload).await
    }

    /// Connect to the user channel for `markets` (condition ids)
    ///
    /// Requires L2 credentials; fails before dialing without them.
    pub async fn connect_user(&self, markets: Vec<String>) -> Result<WsConnection> {
        let credentials = self
            .auth
            .get_api_credentials()
            .ok_or(AuthError::AuthRequired { required: AuthTier::L2 })?;

        info!("Subscribing to user channel for {} markets", markets.len());
        let request = SubscribeRequest::user(WsAuth::from(&credentials), markets);
        let payload = serde_json::to_string(&request)?;
        debug!("Subscribe request: auth=[REDACTED] markets={:?}", request.markets);

        self.connect(ChannelType::User, payload).await
    }

    async fn connect(
        &self,
        channel: ChannelType,
        subscribe_payload: String,
    ) -> Result<WsConnection> {
        let endpoint = self.endpoint(channel);
        let parsed = url::Url::parse(&endpoint)
            .with_context(|| format!("Invalid WebSocket endpoint: {}", endpoint))?;
        if !matches!(parsed.scheme(), "ws" | "wss") {
            anyhow::bail!("WebSocket endpoint must use ws:// or wss://: {}", endpoint);
        }
        info!("Connecting to {}", endpoint);

        let (ws_stream, response) =
            connect_async(endpoint.as_str()).await.context("WebSocket connection failed")?;

        debug!("WebSocket connected, status: {}", response.status());

        let (mut write, read) = ws_stream.split();

        write
            .send(Message::Text(subscribe_payload.into()))
            .await
            .context("Failed to send subscribe request")?;

        Ok(WsConnection {
            channel,
            write,
            read,
            ping_interval: self.ping_interval,
            stats: MessageStats::new(),
        })
    }
}

/// A live, subscribed channel connection
pub struct WsConnection {
    channel: ChannelType,
    write: SplitSink<WsStream, Message>,
    read: SplitStream<WsStream>,
    ping_interval: Duration,
    stats: MessageStats,
}

impl WsConnection {
    pub fn channel(&self) -> ChannelType {
        self.channel
    }

    pub fn stats(&self) -> &MessageStats {
        &self.stats
    }

    /// Add assets to the live subscription
    pub async fn subscribe_assets(&mut self, asset_ids: Vec<String>) -> Result<()> {
        self.send_change(asset_ids, SubscriptionOperation::Subscribe).await
    }

    /// Remove assets from the live subscription
    pub async fn unsubscribe_assets(&mut self, asset_ids: Vec<String>) -> Result<()> {
        self.send_change(asset_ids, SubscriptionOperation::Unsubscribe).await
    }

    async fn send_change(
        &mut self,
        asset_ids: Vec<String>,
        operation: SubscriptionOperation,
    ) -> Result<()> {
        let change = SubscriptionChange { asset_ids, operation };
        let payload = serde_json::to_string(&change)?;
        debug!("Subscription change: {}", payload);

        self.write
            .send(Message::Text(payload.into()))
            .await
            .context("Failed to send subscription change")
    }

    /// Send a close frame
    pub async fn close(&mut self) -> Result<()> {
        self.write.close().await.context("Failed to close WebSocket")
    }

    /// Read until the stream ends, dispatching every event to `handler`
    pub async fn run(&mut self, handler: &mut dyn WsEventHandler) -> Result<MessageStats> {
        self.run_until(handler, 0, Arc::new(AtomicBool::new(false))).await
    }

    /// Read until the stream ends, `limit` events (0 = unlimited), or shutdown
    pub async fn run_until(
        &mut self,
        handler: &mut dyn WsEventHandler,
        limit: u64,
        shutdown: Arc<AtomicBool>,
    ) -> Result<MessageStats> {
        let mut ping = tokio::time::interval(self.ping_interval);
        // First tick fires immediately
        ping.tick().await;
        let mut poll = tokio::time::interval(SHUTDOWN_POLL);
        let mut collected: u64 = 0;

        while !shutdown.load(Ordering::Relaxed) {
            if limit > 0 && collected >= limit {
                info!("Reached message limit: {}", limit);
                break;
            }

            tokio::select! {
                msg = self.read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        if text.trim() == "PONG" {
                            self.stats.pongs_received += 1;
                            continue;
                        }

                        let frame = WsFrame::parse(&text);
                        self.stats.record_frame(&frame);
                        for event in frame.into_events() {
                            // A batched frame can overshoot the limit
                            if limit > 0 && collected >= limit {
                                break;
                            }
                            handler.on_event(&event);
                            collected += 1;
                        }

                        if self.stats.total_messages % 100 == 0 {
                            debug!(
                                "Collected {} messages, {} unknown",
                                self.stats.total_messages, self.stats.unknown_type_count
                            );
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = self.write.send(Message::Pong(data)).await {
                            warn!("Failed to send pong: {}", e);
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Server closed connection");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary and control frames carry no events
                    }
                    Some(Err(e)) => {
                        let error = anyhow::Error::new(e).context("WebSocket read failed");
                        warn!("{:#}", error);
                        handler.on_error(&error);
                        break;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        break;
                    }
                },
                _ = ping.tick() => {
                    if let Err(e) = self.write.send(Message::Text("PING".into())).await {
                        let error = anyhow::Error::new(e).context("Failed to send PING");
                        warn!("{:#}", error);
                        handler.on_error(&error);
                        break;
                    }
                    self.stats.pings_sent += 1;
                }
                _ = poll.tick() => {}
            }
        }

        info!(
            "{:?} channel stopped. Total: {}, Parsed: {}, Unknown: {}",
            self.channel,
            self.stats.total_messages,
            self.stats.parsed_ok,
            self.stats.unknown_type_count
        );

        Ok(self.stats.clone())
    }
}

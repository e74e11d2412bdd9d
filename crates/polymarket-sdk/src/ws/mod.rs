//! WebSocket streaming for market data and user order / trade events
//!
//! # Components
//! - `WsClient`: dials `/ws/market` or `/ws/user` and subscribes
//! - `WsConnection`: live connection with dynamic subscriptions and `run`
//! - `WsEventHandler`: typed callbacks for parsed events

mod client;
mod handler;

pub use client::{WsClient, WsConnection, DEFAULT_PING_INTERVAL};
pub use handler::{dispatch, WsEventHandler};

//! Event callbacks for WebSocket sessions

use crate::types::{
    BookMessage, LastTradePriceMessage, MarketMessage, OrderMessage, PriceChangeMessage,
    TickSizeChangeMessage, TradeMessage, UnknownMessage, UserMessage, WsEvent,
};

/// Receives events from [`WsConnection::run`](super::WsConnection::run)
///
/// Every method has a no-op default; implement the ones you need.
/// Override `on_event` to see every event before typed dispatch.
pub trait WsEventHandler: Send {
    fn on_event(&mut self, event: &WsEvent) {
        dispatch(self, event);
    }

    fn on_book(&mut self, _msg: &BookMessage) {}

    fn on_price_change(&mut self, _msg: &PriceChangeMessage) {}

    fn on_tick_size_change(&mut self, _msg: &TickSizeChangeMessage) {}

    fn on_last_trade_price(&mut self, _msg: &LastTradePriceMessage) {}

    fn on_trade(&mut self, _msg: &TradeMessage) {}

    fn on_order(&mut self, _msg: &OrderMessage) {}

    /// Feature-flagged market events (best_bid_ask, new_market, market_resolved)
    fn on_feature_event(&mut self, _msg: &MarketMessage) {}

    fn on_unknown(&mut self, _msg: &UnknownMessage) {}

    /// Transport error; the session ends after this call
    fn on_error(&mut self, _error: &anyhow::Error) {}
}

/// Route an event to the typed handler method
pub fn dispatch<H: WsEventHandler + ?Sized>(handler: &mut H, event: &WsEvent) {
    match event {
        WsEvent::Market(MarketMessage::Book(msg)) => handler.on_book(msg),
        WsEvent::Market(MarketMessage::PriceChange(msg)) => handler.on_price_change(msg),
        WsEvent::Market(MarketMessage::TickSizeChange(msg)) => handler.on_tick_size_change(msg),
        WsEvent::Market(MarketMessage::LastTradePrice(msg)) => handler.on_last_trade_price(msg),
        WsEvent::Market(msg) => handler.on_feature_event(msg),
        WsEvent::User(UserMessage::Trade(msg)) => handler.on_trade(msg),
        WsEvent::User(UserMessage::Order(msg)) => handler.on_order(msg),
        WsEvent::Unknown(msg) => handler.on_unknown(msg),
    }
}

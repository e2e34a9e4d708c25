//! Trade notifications from a chain watcher to preview consumers.
//!
//! A watcher holds a [`TradePublisher`] and pushes confirmed trades; the consumer
//! owns a [`TradeSubscriber`] that folds them into its own [`CurveState`].
//! There is no shared or global state: the feed ends when every publisher is dropped.

use crate::error::FeedClosed;
use crate::impact::{CurveState, Direction};
use crate::units::sanitize;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};

/// A confirmed trade on a token's curve
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Token the trade belongs to
    pub token: String,
    /// Buy or sell
    pub direction: Direction,
    /// Native currency that entered (buy) or left (sell) the curve
    pub native_amount: f64,
    /// Tokens minted (buy) or burned (sell)
    pub token_amount: f64,
}

impl TradeEvent {
    /// Returns `state` after this trade; both sides floor at zero
    pub fn apply(&self, state: CurveState) -> CurveState {
        let native = sanitize(self.native_amount);
        let tokens = sanitize(self.token_amount);
        let collateral = sanitize(state.current_collateral);
        let supply = sanitize(state.virtual_supply);
        match self.direction {
            Direction::Buy => CurveState::new(collateral + native, supply + tokens),
            Direction::Sell => CurveState::new((collateral - native).max(0.0), (supply - tokens).max(0.0)),
        }
    }
}

/// Sending half, held by the chain watcher
#[derive(Clone, Debug)]
pub struct TradePublisher {
    tx: Sender<TradeEvent>,
}

impl TradePublisher {
    /// Queues a trade for the subscriber
    pub fn publish(&self, event: TradeEvent) -> Result<(), FeedClosed> {
        self.tx.send(event).map_err(|_| FeedClosed)
    }
}

/// Receiving half; owns the curve state it keeps current
#[derive(Debug)]
pub struct TradeSubscriber {
    rx: Receiver<TradeEvent>,
    token: Option<String>,
    state: CurveState,
    applied: u64,
}

/// Creates a feed whose subscriber starts from `initial`
pub fn trade_feed(initial: CurveState) -> (TradePublisher, TradeSubscriber) {
    let (tx, rx) = mpsc::channel();
    (
        TradePublisher { tx },
        TradeSubscriber { rx, token: None, state: initial, applied: 0 },
    )
}

impl TradeSubscriber {
    /// Only apply events for `token`; others are skipped
    pub fn for_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Current state after all applied events
    pub fn state(&self) -> CurveState { self.state }

    /// Number of events applied so far
    pub fn applied(&self) -> u64 { self.applied }

    fn accept(&mut self, event: &TradeEvent) -> bool {
        if let Some(token) = &self.token {
            if *token != event.token {
                debug!("skipping {} trade for {}", event.direction, event.token);
                return false;
            }
        }
        self.state = event.apply(self.state);
        self.applied += 1;
        info!(
            "{} {} native / {} tokens on {} -> spot {:.6e}",
            event.direction,
            event.native_amount,
            event.token_amount,
            event.token,
            self.state.spot_price()
        );
        true
    }

    /// Blocks for the next matching event and applies it; `None` once the feed is closed
    pub fn recv(&mut self) -> Option<TradeEvent> {
        while let Ok(event) = self.rx.recv() {
            if self.accept(&event) {
                return Some(event);
            }
        }
        None
    }

    /// Applies every event already queued without blocking; returns how many were applied
    pub fn drain(&mut self) -> usize {
        let mut n = 0;
        while let Ok(event) = self.rx.try_recv() {
            if self.accept(&event) {
                n += 1;
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn ev(token: &str, direction: Direction, native: f64, tokens: f64) -> TradeEvent {
        TradeEvent { token: token.into(), direction, native_amount: native, token_amount: tokens }
    }

    #[test]
    fn apply_moves_both_sides_and_floors_at_zero() {
        let s = CurveState::new(10.0, 1000.0);
        let s = ev("t", Direction::Buy, 1.0, 95.0).apply(s);
        assert_eq!(s, CurveState::new(11.0, 1095.0));
        let s = ev("t", Direction::Sell, 20.0, 2000.0).apply(s);
        assert_eq!(s, CurveState::new(0.0, 0.0));
    }

    #[test]
    fn drain_applies_queued_events_in_order() {
        let (publisher, mut sub) = trade_feed(CurveState::new(10.0, 1000.0));
        publisher.publish(ev("t", Direction::Buy, 2.0, 100.0)).unwrap();
        publisher.publish(ev("t", Direction::Sell, 1.0, 50.0)).unwrap();
        assert_eq!(sub.drain(), 2);
        assert_eq!(sub.state(), CurveState::new(11.0, 1050.0));
        assert_eq!(sub.applied(), 2);
        assert_eq!(sub.drain(), 0);
    }

    #[test]
    fn token_filter_skips_other_tokens() {
        let (publisher, sub) = trade_feed(CurveState::new(1.0, 1.0));
        let mut sub = sub.for_token("0xabc");
        publisher.publish(ev("0xdef", Direction::Buy, 5.0, 5.0)).unwrap();
        publisher.publish(ev("0xabc", Direction::Buy, 1.0, 1.0)).unwrap();
        assert_eq!(sub.drain(), 1);
        assert_eq!(sub.state(), CurveState::new(2.0, 2.0));
    }

    #[test]
    fn recv_ends_when_publishers_drop() {
        let (publisher, mut sub) = trade_feed(CurveState::default());
        let watcher = thread::spawn(move || {
            for _ in 0..3 {
                publisher.publish(ev("t", Direction::Buy, 1.0, 10.0)).unwrap();
            }
        });
        let mut seen = 0;
        while sub.recv().is_some() {
            seen += 1;
        }
        watcher.join().unwrap();
        assert_eq!(seen, 3);
        assert_eq!(sub.state(), CurveState::new(3.0, 30.0));
    }

    #[test]
    fn publish_fails_after_subscriber_drops() {
        let (publisher, sub) = trade_feed(CurveState::default());
        drop(sub);
        assert_eq!(publisher.publish(ev("t", Direction::Buy, 1.0, 1.0)), Err(FeedClosed));
    }
}

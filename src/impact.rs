//! Price impact of a prospective trade against a collateral/virtual-supply snapshot.
//!
//! Spot price is `collateral / virtual_supply`. A trade's impact is estimated with a
//! single trapezoidal step: the trade executes at the mean of the current price and an
//! end-price estimate, and impact is the relative move of the spot price afterwards.
//!
//! These functions never fail. Non-finite or negative inputs are floored to zero,
//! an empty pool falls back to [`simple_impact`], and a sell that would drain the
//! pool saturates at 100%.

use crate::error::ParseError;
use crate::units::sanitize;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound for curve-based impact estimates, in percent
pub const MAX_CURVE_IMPACT_PCT: f64 = 50.0;
/// Upper bound for the fallback heuristic, in percent
pub const MAX_FALLBACK_IMPACT_PCT: f64 = 100.0;
/// Reported when a sell would empty the pool
pub const DRAIN_IMPACT_PCT: f64 = 100.0;
/// Reported when there is no liquidity information at all
pub const UNKNOWN_LIQUIDITY_IMPACT_PCT: f64 = 50.0;

/// Side of a trade
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Native currency in, tokens out
    Buy,
    /// Tokens in, native currency out
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
        })
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Direction::Buy),
            "sell" => Ok(Direction::Sell),
            _ => Err(ParseError::Direction(s.to_string())),
        }
    }
}

/// Snapshot of on-chain curve state, in whole units
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveState {
    /// Native currency held by the curve contract
    pub current_collateral: f64,
    /// Supply figure the curve prices against
    pub virtual_supply: f64,
}

impl CurveState {
    /// Creates a snapshot from collateral and virtual supply
    pub fn new(current_collateral: f64, virtual_supply: f64) -> Self {
        Self { current_collateral, virtual_supply }
    }

    /// True when either side of the pool is empty (or not a usable number)
    pub fn is_degenerate(&self) -> bool {
        sanitize(self.current_collateral) <= 0.0 || sanitize(self.virtual_supply) <= 0.0
    }

    /// collateral / virtual supply, or 0 for a degenerate pool
    pub fn spot_price(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        sanitize(self.current_collateral / self.virtual_supply)
    }
}

/// A hypothetical trade to preview
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    /// Buy or sell
    pub direction: Direction,
    /// Native currency for buys, tokens for sells
    pub amount: f64,
}

impl TradeRequest {
    /// Buy with `amount` native currency
    pub fn buy(amount: f64) -> Self { Self { direction: Direction::Buy, amount } }
    /// Sell `amount` tokens
    pub fn sell(amount: f64) -> Self { Self { direction: Direction::Sell, amount } }
}

/// How an impact figure was obtained
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactBasis {
    /// Trapezoidal estimate against collateral and virtual supply
    Curve,
    /// `sqrt(amount / liquidity)` heuristic for an empty pool
    Fallback,
    /// Sell would exhaust supply or collateral
    Drained,
}

/// Estimated price impact of a trade
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceImpact {
    /// Impact in percent, within [0, 100]
    pub impact_percent: f64,
    /// Whether the raw estimate was cut back to its bound
    pub clamped: bool,
    /// Which formula produced the figure
    pub basis: ImpactBasis,
}

impl PriceImpact {
    fn bounded(raw: f64, max: f64, basis: ImpactBasis) -> Self {
        let raw = if raw.is_nan() { 0.0 } else { raw };
        Self {
            impact_percent: raw.clamp(0.0, max),
            clamped: raw > max || raw < 0.0,
            basis,
        }
    }
}

/// Trade preview: impact plus the numbers shown next to it
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeQuote {
    /// The previewed trade, after input sanitizing
    pub request: TradeRequest,
    /// Spot price before the trade
    pub spot_before: f64,
    /// Estimated spot price after the trade, if the curve path applied
    pub spot_after: Option<f64>,
    /// Estimated tokens (buy) or native currency (sell) received
    pub estimated_out: Option<f64>,
    /// Price impact
    pub impact: PriceImpact,
}

/// Heuristic impact for a pool without usable state: sqrt(amount / liquidity) * 100.
///
/// Clamped to [0, 100]; no liquidity at all reports 50%.
pub fn simple_impact(liquidity: f64, amount: f64) -> f64 {
    let liquidity = sanitize(liquidity);
    if liquidity <= 0.0 {
        return UNKNOWN_LIQUIDITY_IMPACT_PCT;
    }
    let raw = (sanitize(amount) / liquidity).sqrt() * 100.0;
    if raw.is_finite() { raw.clamp(0.0, MAX_FALLBACK_IMPACT_PCT) } else { MAX_FALLBACK_IMPACT_PCT }
}

/// Price impact of `trade` against `state`, within [0, 100]
pub fn price_impact(state: &CurveState, trade: &TradeRequest) -> PriceImpact {
    quote(state, trade).impact
}

/// Full trade preview for `trade` against `state`
pub fn quote(state: &CurveState, trade: &TradeRequest) -> TradeQuote {
    let collateral = sanitize(state.current_collateral);
    let virtual_supply = sanitize(state.virtual_supply);
    let request = TradeRequest { direction: trade.direction, amount: sanitize(trade.amount) };
    let amount = request.amount;

    if virtual_supply <= 0.0 || collateral <= 0.0 {
        let impact = PriceImpact {
            impact_percent: simple_impact(collateral, amount),
            // sqrt(amount / liquidity) exceeds 1 exactly when amount > liquidity
            clamped: collateral > 0.0 && amount > collateral,
            basis: ImpactBasis::Fallback,
        };
        debug!(
            "degenerate pool (collateral={collateral}, virtual_supply={virtual_supply}); \
             fallback impact for {} {amount}",
            request.direction
        );
        return TradeQuote {
            request,
            spot_before: 0.0,
            spot_after: None,
            estimated_out: None,
            impact,
        };
    }

    let current = collateral / virtual_supply;
    match request.direction {
        Direction::Buy => {
            let new_collateral = collateral + amount;
            let average = (current + new_collateral / virtual_supply) / 2.0;
            let tokens_out = amount / average;
            let new_virtual = virtual_supply + tokens_out;
            let new_price = new_collateral / new_virtual;
            let raw = (new_price - current) / current * 100.0;
            TradeQuote {
                request,
                spot_before: current,
                spot_after: Some(new_price),
                estimated_out: Some(tokens_out),
                impact: PriceImpact::bounded(raw, MAX_CURVE_IMPACT_PCT, ImpactBasis::Curve),
            }
        }
        Direction::Sell => {
            let drained = TradeQuote {
                request,
                spot_before: current,
                spot_after: None,
                estimated_out: None,
                impact: PriceImpact {
                    impact_percent: DRAIN_IMPACT_PCT,
                    clamped: false,
                    basis: ImpactBasis::Drained,
                },
            };
            if amount >= virtual_supply {
                debug!("sell of {amount} exhausts virtual supply {virtual_supply}");
                return drained;
            }
            let new_virtual = virtual_supply - amount;
            let average = (current + collateral / new_virtual) / 2.0;
            let native_out = amount * average;
            let new_collateral = collateral - native_out;
            if new_collateral <= 0.0 || new_virtual <= 0.0 || !new_collateral.is_finite() {
                debug!("sell of {amount} drains collateral {collateral}");
                return drained;
            }
            let new_price = new_collateral / new_virtual;
            let raw = (current - new_price) / current * 100.0;
            TradeQuote {
                request,
                spot_before: current,
                spot_after: Some(new_price),
                estimated_out: Some(native_out),
                impact: PriceImpact::bounded(raw, MAX_CURVE_IMPACT_PCT, ImpactBasis::Curve),
            }
        }
    }
}

/// Minimum acceptable output for a slippage tolerance in basis points:
/// expected * (10000 - bps) / 10000, with bps clamped to [0, 10000]
pub fn min_received(expected_out: f64, slippage_bps: f64) -> f64 {
    let bps = if slippage_bps.is_nan() { 0.0 } else { slippage_bps.clamp(0.0, 10_000.0) };
    sanitize(expected_out) * (10_000.0 - bps) / 10_000.0
}

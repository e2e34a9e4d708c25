#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
//! Library entry for the launchpad bonding-curve pricer.
//!
//! Prices tokens on a linear bonding curve and estimates the price impact of
//! prospective buys and sells from a collateral/virtual-supply snapshot. All
//! pricing functions are pure and never fail; string input is parsed once at
//! the [`units`] boundary.
//!
//! # Modules
//! - [`curves`]: Curve constants, theoretical price, chart sampling
//! - [`impact`]: Price impact and trade previews
//! - [`severity`]: Impact warning levels
//! - [`units`]: Decimal and wei parsing
//! - [`snapshot`]: JSON snapshot of chain reads
//! - [`events`]: Trade feed from chain watcher to consumers
//! - [`verifier`]: Analytic vs numeric checks
//! - [`plot`]: Visualization (optional in binaries)

/// Errors raised at the parsing boundary and by the trade feed
pub mod error;

/// Linear bonding curve pricing
pub mod curves;

/// Price impact estimation and trade previews
pub mod impact;

/// Severity buckets and warnings for price impact
pub mod severity;

/// Typed parsing of decimal and wei strings
pub mod units;

/// Loading curve constants and state from JSON
pub mod snapshot;

/// Channel-based trade notifications
pub mod events;

/// Verification tools for curve properties and numerical accuracy
pub mod verifier;

/// Visualization utilities for generating charts
pub mod plot;

pub use curves::{theoretical_price, Curve, CurveParams, LinearCurve};
pub use impact::{price_impact, quote, simple_impact, CurveState, Direction, PriceImpact, TradeQuote, TradeRequest};
pub use severity::{classify_impact, Severity};

//! Linear bonding curve pricing

use serde::{Deserialize, Serialize};

/// Generic interface for a price-vs-supply bonding curve
pub trait Curve {
    /// Returns the name/type of this curve implementation
    fn name(&self) -> &'static str;

    /// Returns the theoretical price at a given token supply
    fn price_at(&self, supply: f64) -> f64;

    /// First supply point of the sale span
    fn supply_start(&self) -> f64;

    /// Last supply point of the sale span
    fn supply_end(&self) -> f64;

    /// Samples `points` evenly spaced (supply, price) pairs over the sale span, endpoints included
    fn sample(&self, points: usize) -> Vec<(f64, f64)> {
        let (a, b) = (self.supply_start(), self.supply_end());
        match points {
            0 => Vec::new(),
            1 => vec![(a, self.price_at(a))],
            n => (0..n)
                .map(|i| {
                    let s = if i + 1 == n { b } else { a + (b - a) * i as f64 / (n - 1) as f64 };
                    (s, self.price_at(s))
                })
                .collect(),
        }
    }
}

/// Contract constants of a launchpad token's bonding curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveParams {
    /// Hard cap on token supply
    pub max_supply: f64,
    /// Supply minted at creation, where the curve starts
    #[serde(alias = "initialSupply")]
    pub initial_mint: f64,
    /// Price at `initial_mint`
    pub initial_price: f64,
    /// Relative price increase across the whole span (1.0 = price doubles at max supply)
    pub price_rate_coefficient: f64,
}

impl CurveParams {
    #[inline]
    fn span(&self) -> f64 { self.max_supply - self.initial_mint }

    /// P(s) = P_0 + P_0 * (s - s_0) * k / (S_max - s_0)
    ///
    /// Supply outside `[initial_mint, max_supply]` extrapolates linearly. A zero-width
    /// span is flat at `initial_price`; non-finite inputs price at 0.
    pub fn theoretical_price(&self, supply: f64) -> f64 {
        let span = self.span();
        let price = if span == 0.0 {
            self.initial_price
        } else {
            self.initial_price
                + self.initial_price * (supply - self.initial_mint) * self.price_rate_coefficient / span
        };
        if price.is_finite() { price } else { 0.0 }
    }

    /// Share of the sale span already sold, in percent, clamped to [0, 100]
    pub fn supply_progress(&self, supply: f64) -> f64 {
        let span = self.span();
        if !span.is_finite() || span <= 0.0 || !supply.is_finite() {
            return 0.0;
        }
        ((supply - self.initial_mint) / span * 100.0).clamp(0.0, 100.0)
    }

    /// Native currency needed to move supply from `from` to `to`: ∫P(s) ds.
    ///
    /// Exact for a linear curve; negative when `to < from`.
    pub fn raise_between(&self, from: f64, to: f64) -> f64 {
        let raise = (to - from) * (self.theoretical_price(from) + self.theoretical_price(to)) / 2.0;
        if raise.is_finite() { raise } else { 0.0 }
    }

    /// Fully diluted value of `supply` tokens at the curve price
    pub fn market_cap(&self, supply: f64) -> f64 {
        let cap = supply * self.theoretical_price(supply);
        if cap.is_finite() { cap } else { 0.0 }
    }
}

/// Free-function form of [`CurveParams::theoretical_price`]
pub fn theoretical_price(supply: f64, params: &CurveParams) -> f64 {
    params.theoretical_price(supply)
}

/// The launchpad's linear curve as a [`Curve`]
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LinearCurve {
    /// Contract constants
    pub params: CurveParams,
}

impl Curve for LinearCurve {
    fn name(&self) -> &'static str { "Linear(initialPrice, k)" }
    fn price_at(&self, supply: f64) -> f64 { self.params.theoretical_price(supply) }
    fn supply_start(&self) -> f64 { self.params.initial_mint }
    fn supply_end(&self) -> f64 { self.params.max_supply }
}

//! Verification tools for curve and impact properties

use crate::curves::{Curve, CurveParams, LinearCurve};
use crate::impact::{price_impact, CurveState, Direction, TradeRequest};
use anyhow::{anyhow, Result};

/// Numerical checks on a sampled curve
#[derive(Debug)]
pub struct Report {
    /// Number of sample points checked
    pub points: usize,
    /// |P(initial_mint) - initial_price|
    pub anchor_err: f64,
    /// Numerical raise over the span (segment sum)
    pub raise_sum: f64,
    /// Closed-form raise over the span
    pub raise_closed: f64,
    /// Relative error between sum and closed form
    pub rel_err_raise: f64,
    /// Whether price is non-decreasing along the samples
    pub monotone_ok: bool,
}

/// Check the anchor price, monotonicity and Σ segment raises against ∫P ds
pub fn verify_curve(params: &CurveParams, points: usize) -> Result<Report> {
    if points < 2 {
        return Err(anyhow!("need at least 2 sample points (got {})", points));
    }
    let curve = LinearCurve { params: *params };
    let samples = curve.sample(points);

    let mut sum = 0.0_f64;
    let mut comp = 0.0_f64;
    let mut monotone_ok = true;
    for w in samples.windows(2) {
        let ((s0, p0), (s1, p1)) = (w[0], w[1]);
        if p1 < p0 { monotone_ok = false; }
        let seg = (s1 - s0) * (p0 + p1) / 2.0;
        let t = sum + seg;
        if sum.abs() >= seg.abs() { comp += (sum - t) + seg; } else { comp += (seg - t) + sum; }
        sum = t;
    }
    let raise_sum = sum + comp;
    let raise_closed = params.raise_between(params.initial_mint, params.max_supply);
    let rel = if raise_closed.abs() > 0.0 { (raise_sum - raise_closed).abs() / raise_closed.abs() } else { 0.0 };

    Ok(Report {
        points,
        anchor_err: (params.theoretical_price(params.initial_mint) - params.initial_price).abs(),
        raise_sum,
        raise_closed,
        rel_err_raise: rel,
        monotone_ok,
    })
}

/// Impact checks over a ladder of trade sizes
#[derive(Debug)]
pub struct ImpactReport {
    /// Side checked
    pub direction: Direction,
    /// Sizes checked
    pub sizes: usize,
    /// Largest impact seen
    pub max_impact: f64,
    /// Whether impact never decreased as size grew
    pub monotone_ok: bool,
    /// Whether every impact lay in [0, 100]
    pub bounded_ok: bool,
}

/// Check that impact stays in [0, 100] and grows with trade size
pub fn verify_impact(state: &CurveState, direction: Direction, sizes: &[f64]) -> Result<ImpactReport> {
    if sizes.is_empty() {
        return Err(anyhow!("no trade sizes to check"));
    }
    if sizes.windows(2).any(|w| w[1] < w[0]) {
        return Err(anyhow!("trade sizes must be ascending"));
    }
    let mut prev = f64::NEG_INFINITY;
    let mut max_impact = 0.0_f64;
    let mut monotone_ok = true;
    let mut bounded_ok = true;
    for &amount in sizes {
        let pct = price_impact(state, &TradeRequest { direction, amount }).impact_percent;
        if !(0.0..=100.0).contains(&pct) { bounded_ok = false; }
        if pct + 1e-9 < prev { monotone_ok = false; }
        prev = pct;
        max_impact = max_impact.max(pct);
    }
    Ok(ImpactReport { direction, sizes: sizes.len(), max_impact, monotone_ok, bounded_ok })
}

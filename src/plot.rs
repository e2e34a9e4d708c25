//! Visualization utilities for generating charts

use crate::curves::Curve;
use crate::impact::{price_impact, CurveState, TradeRequest};
use anyhow::Result;
use plotters::prelude::*;

/// Generates a price vs supply chart over the curve's sale span
pub fn plot_price_vs_supply<C: Curve>(c: &C, points: usize, out_path: &str) -> Result<()> {
    let root = BitMapBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let data = c.sample(points.max(2));
    let x_min = c.supply_start().min(c.supply_end());
    let x_max = c.supply_end().max(x_min + 1e-12);
    let y_max = data.iter().map(|(_, y)| *y).fold(0.0, f64::max).max(1e-12);
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(format!("Price vs Supply ({})", c.name()), ("sans-serif", 28))
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, 0.0..(y_max * 1.05))?;
    chart.configure_mesh().draw()?;
    chart.draw_series(LineSeries::new(data, &BLACK))?;
    root.present()?;
    Ok(())
}

/// Generates buy and sell impact curves against trade size
pub fn plot_impact_vs_size(state: &CurveState, sizes: &[f64], out_path: &str) -> Result<()> {
    let root = BitMapBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let buy: Vec<(f64, f64)> = sizes
        .iter()
        .map(|&a| (a, price_impact(state, &TradeRequest::buy(a)).impact_percent))
        .collect();
    let sell: Vec<(f64, f64)> = sizes
        .iter()
        .map(|&a| (a, price_impact(state, &TradeRequest::sell(a)).impact_percent))
        .collect();
    let x_max = sizes.iter().copied().fold(0.0, f64::max).max(1e-12);
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Price Impact vs Trade Size", ("sans-serif", 28))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..105.0)?;
    chart.configure_mesh().y_desc("impact %").draw()?;
    chart
        .draw_series(LineSeries::new(buy, &BLUE))?
        .label("buy (native in)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(LineSeries::new(sell, &RED))?
        .label("sell (tokens in)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

use havencurve::curves::{Curve, CurveParams, LinearCurve};
use havencurve::events::{trade_feed, TradeEvent};
use havencurve::impact::{min_received, price_impact, quote, CurveState, Direction, TradeQuote, TradeRequest};
use havencurve::plot::{plot_impact_vs_size, plot_price_vs_supply};
use havencurve::severity::{classify_impact, Severity};
use havencurve::snapshot::Snapshot;
use havencurve::units::parse_decimal;
use havencurve::verifier::{verify_curve, verify_impact};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::thread;

#[derive(Parser, Debug)]
#[command(
    name = "havencurve",
    version,
    about = "Launchpad bonding curve pricer + price impact previews"
)]
struct Args {
    /// curve | impact | replay
    #[arg(long, default_value = "curve")]
    mode: String,

    /// JSON snapshot of contract constants and state (wei strings); overrides the flags below
    #[arg(long)]
    snapshot: Option<String>,

    #[arg(long, default_value_t = 1_000_000_000.0)]
    max_supply: f64,
    #[arg(long, alias = "initial-supply", default_value_t = 200_000_000.0)]
    initial_mint: f64,
    #[arg(long, default_value_t = 0.000001)]
    initial_price: f64,
    #[arg(long, default_value_t = 2.0)]
    price_rate_coefficient: f64,

    #[arg(long, default_value = "10", value_parser = parse_decimal)]
    collateral: f64,
    #[arg(long, default_value = "1000", value_parser = parse_decimal)]
    virtual_supply: f64,

    #[arg(long, default_value = "buy")]
    direction: Direction,
    /// Native currency for buys, tokens for sells
    #[arg(long, default_value = "1", value_parser = parse_decimal)]
    amount: f64,
    #[arg(long, default_value_t = 100.0)]
    slippage_bps: f64,

    /// Sample points for the curve chart/CSV
    #[arg(long, default_value_t = 500)]
    points: usize,
    /// Largest trade size in the impact sweep (default: max of collateral and virtual supply)
    #[arg(long)]
    max_size: Option<f64>,
    #[arg(long, default_value_t = 200)]
    sizes: usize,

    /// Trades CSV for replay: direction,native_amount,token_amount
    #[arg(long)]
    trades: Option<String>,
    #[arg(long, default_value = "token")]
    token: String,

    #[arg(long, default_value = "out")]
    out_dir: String,
    #[arg(long = "no-draw", action = clap::ArgAction::SetFalse, default_value_t = true)]
    draw: bool,
    #[arg(long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Serialize)]
struct CurveRow {
    supply: f64,
    price: f64,
    progress_pct: f64,
    market_cap: f64,
}

#[derive(Serialize)]
struct ImpactRow {
    amount: f64,
    buy_impact_pct: f64,
    sell_impact_pct: f64,
}

#[derive(Deserialize)]
struct TradeRow {
    direction: Direction,
    native_amount: f64,
    token_amount: f64,
}

#[derive(Serialize)]
struct ReplayRow {
    seq: u64,
    direction: Direction,
    native_amount: f64,
    token_amount: f64,
    collateral: f64,
    virtual_supply: f64,
    spot_price: f64,
    preview_impact_pct: f64,
}

#[derive(Serialize)]
struct Preview {
    quote: TradeQuote,
    severity: Severity,
    warning: &'static str,
    min_received: Option<f64>,
}

fn validate_curve_inputs(args: &Args, params: &CurveParams) -> Result<()> {
    for (name, v) in [
        ("max_supply", params.max_supply),
        ("initial_mint", params.initial_mint),
        ("initial_price", params.initial_price),
        ("price_rate_coefficient", params.price_rate_coefficient),
    ] {
        if !v.is_finite() || v < 0.0 {
            return Err(anyhow!("{} must be finite and ≥ 0 (got {})", name, v));
        }
    }
    if params.max_supply <= params.initial_mint {
        return Err(anyhow!(
            "require max_supply > initial_mint; got max_supply={} ≤ initial_mint={}",
            params.max_supply,
            params.initial_mint
        ));
    }
    if args.points < 2 {
        return Err(anyhow!("points must be ≥ 2 (got {})", args.points));
    }
    Ok(())
}

fn validate_impact_inputs(args: &Args) -> Result<()> {
    if args.sizes < 1 {
        return Err(anyhow!("sizes must be ≥ 1 (got {})", args.sizes));
    }
    if !(0.0..=10_000.0).contains(&args.slippage_bps) {
        return Err(anyhow!("slippage_bps must be in [0, 10000] (got {})", args.slippage_bps));
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "warn" }),
    )
    .init();

    let (params, state) = match &args.snapshot {
        Some(path) => {
            let snap = Snapshot::load(path)?;
            let state = match snap.state {
                Some(state) => state,
                None => {
                    warn!(
                        "snapshot {} has no state; using --collateral={} --virtual-supply={}",
                        path, args.collateral, args.virtual_supply
                    );
                    CurveState::new(args.collateral, args.virtual_supply)
                }
            };
            (snap.params, state)
        }
        None => (
            CurveParams {
                max_supply: args.max_supply,
                initial_mint: args.initial_mint,
                initial_price: args.initial_price,
                price_rate_coefficient: args.price_rate_coefficient,
            },
            CurveState::new(args.collateral, args.virtual_supply),
        ),
    };
    debug!("params={:?} state={:?}", params, state);

    create_dir_all(&args.out_dir)?;

    match args.mode.as_str() {
        "curve" => run_curve(&args, params),
        "impact" => run_impact(&args, state),
        "replay" => run_replay(&args, state),
        m => Err(anyhow!("unknown mode: {}", m)),
    }
}

fn run_curve(args: &Args, params: CurveParams) -> Result<()> {
    validate_curve_inputs(args, &params)?;
    let curve = LinearCurve { params };
    if args.verbose {
        let rep = verify_curve(&params, args.points)?;
        println!(
            "[{}] points={} anchor_err={:.3e} raise_sum={:.6} closed={:.6} rel_err={:.3e} monotone={}",
            curve.name(),
            rep.points,
            rep.anchor_err,
            rep.raise_sum,
            rep.raise_closed,
            rep.rel_err_raise,
            rep.monotone_ok
        );
        println!(
            "  Price at initial mint={:.6e}, at max supply={:.6e}",
            params.theoretical_price(params.initial_mint),
            params.theoretical_price(params.max_supply)
        );
    }

    let file_path = format!("{}/curve.csv", args.out_dir);
    let mut file = File::create(&file_path)?;
    writeln!(file, "# Linear bonding curve")?;
    writeln!(
        file,
        "# maxSupply={}, initialMint={}, initialPrice={}, priceRateCoefficient={}",
        params.max_supply, params.initial_mint, params.initial_price, params.price_rate_coefficient
    )?;
    writeln!(
        file,
        "# Raise to max supply: {:.6}",
        params.raise_between(params.initial_mint, params.max_supply)
    )?;
    writeln!(file)?;

    let mut wtr = csv::Writer::from_writer(file);
    for (supply, price) in curve.sample(args.points) {
        wtr.serialize(CurveRow {
            supply,
            price,
            progress_pct: params.supply_progress(supply),
            market_cap: params.market_cap(supply),
        })?;
    }
    wtr.flush()?;
    info!("wrote {}", file_path);

    if args.draw {
        plot_price_vs_supply(&curve, args.points, &format!("{}/price_vs_supply.png", &args.out_dir))?;
    }
    Ok(())
}

fn size_ladder(args: &Args, state: &CurveState) -> Vec<f64> {
    let max = args
        .max_size
        .unwrap_or_else(|| state.current_collateral.max(state.virtual_supply))
        .max(1e-12);
    (1..=args.sizes).map(|i| max * i as f64 / args.sizes as f64).collect()
}

fn run_impact(args: &Args, state: CurveState) -> Result<()> {
    validate_impact_inputs(args)?;
    let request = TradeRequest { direction: args.direction, amount: args.amount };
    let q = quote(&state, &request);
    let severity = classify_impact(q.impact.impact_percent);
    let preview = Preview {
        quote: q,
        severity,
        warning: severity.warning(),
        min_received: q.estimated_out.map(|out| min_received(out, args.slippage_bps)),
    };
    println!("{}", serde_json::to_string_pretty(&preview)?);

    let sizes = size_ladder(args, &state);
    if args.verbose {
        for dir in [Direction::Buy, Direction::Sell] {
            let rep = verify_impact(&state, dir, &sizes)?;
            println!(
                "[{}] sizes={} max_impact={:.4}% monotone={} bounded={}",
                rep.direction, rep.sizes, rep.max_impact, rep.monotone_ok, rep.bounded_ok
            );
        }
    }

    let file_path = format!("{}/impact.csv", args.out_dir);
    let mut wtr = csv::Writer::from_path(&file_path)?;
    for &amount in &sizes {
        wtr.serialize(ImpactRow {
            amount,
            buy_impact_pct: price_impact(&state, &TradeRequest::buy(amount)).impact_percent,
            sell_impact_pct: price_impact(&state, &TradeRequest::sell(amount)).impact_percent,
        })?;
    }
    wtr.flush()?;
    info!("wrote {}", file_path);

    if args.draw {
        plot_impact_vs_size(&state, &sizes, &format!("{}/impact_vs_size.png", &args.out_dir))?;
    }
    Ok(())
}

fn run_replay(args: &Args, state: CurveState) -> Result<()> {
    let path = args
        .trades
        .as_ref()
        .ok_or_else(|| anyhow!("replay: need --trades"))?;
    let mut rdr = csv::Reader::from_path(path).with_context(|| format!("opening trades {}", path))?;
    let mut events = Vec::new();
    for row in rdr.deserialize() {
        let row: TradeRow = row.with_context(|| format!("reading trades {}", path))?;
        events.push(TradeEvent {
            token: args.token.clone(),
            direction: row.direction,
            native_amount: row.native_amount,
            token_amount: row.token_amount,
        });
    }

    let (publisher, subscriber) = trade_feed(state);
    let mut subscriber = subscriber.for_token(args.token.clone());
    let watcher = thread::spawn(move || {
        for event in events {
            if publisher.publish(event).is_err() {
                break;
            }
        }
    });

    let preview = TradeRequest { direction: args.direction, amount: args.amount };
    let file_path = format!("{}/replay.csv", args.out_dir);
    let mut wtr = csv::Writer::from_path(&file_path)?;
    while let Some(event) = subscriber.recv() {
        let s = subscriber.state();
        wtr.serialize(ReplayRow {
            seq: subscriber.applied(),
            direction: event.direction,
            native_amount: event.native_amount,
            token_amount: event.token_amount,
            collateral: s.current_collateral,
            virtual_supply: s.virtual_supply,
            spot_price: s.spot_price(),
            preview_impact_pct: price_impact(&s, &preview).impact_percent,
        })?;
    }
    wtr.flush()?;
    watcher
        .join()
        .map_err(|_| anyhow!("trade watcher thread panicked"))?;
    info!("replayed {} trades into {}", subscriber.applied(), file_path);
    if args.verbose {
        let s = subscriber.state();
        println!(
            "final collateral={:.6} virtual_supply={:.6} spot={:.6e}",
            s.current_collateral,
            s.virtual_supply,
            s.spot_price()
        );
    }
    Ok(())
}

//! JSON snapshot of contract constants and curve state, as read from chain.
//!
//! ```json
//! {
//!   "params": { "maxSupply": "1000000000000000000000000000", "initialMint": "...",
//!               "initialPrice": "...", "priceRateCoefficient": "..." },
//!   "state":  { "currentCollateral": "...", "virtualSupply": "..." }
//! }
//! ```
//!
//! Every field is a wei (18-decimal) integer string, exactly as the contract returns it.

use crate::curves::CurveParams;
use crate::impact::CurveState;
use crate::units::parse_wei;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParams {
    max_supply: String,
    #[serde(alias = "initialSupply")]
    initial_mint: String,
    initial_price: String,
    price_rate_coefficient: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawState {
    current_collateral: String,
    virtual_supply: String,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    params: RawParams,
    state: Option<RawState>,
}

/// Parsed snapshot
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    /// Contract constants
    pub params: CurveParams,
    /// Curve state, absent when only constants were read
    pub state: Option<CurveState>,
}

fn wei(field: &str, value: &str) -> Result<f64> {
    parse_wei(value).with_context(|| format!("snapshot field `{field}`"))
}

impl Snapshot {
    /// Parses a snapshot from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(text).context("malformed snapshot JSON")?;
        let params = CurveParams {
            max_supply: wei("maxSupply", &raw.params.max_supply)?,
            initial_mint: wei("initialMint", &raw.params.initial_mint)?,
            initial_price: wei("initialPrice", &raw.params.initial_price)?,
            price_rate_coefficient: wei("priceRateCoefficient", &raw.params.price_rate_coefficient)?,
        };
        let state = match raw.state {
            Some(s) => Some(CurveState {
                current_collateral: wei("currentCollateral", &s.current_collateral)?,
                virtual_supply: wei("virtualSupply", &s.virtual_supply)?,
            }),
            None => None,
        };
        Ok(Self { params, state })
    }

    /// Reads and parses a snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "params": {
            "maxSupply": "1000000000000000000000000000",
            "initialSupply": "200000000000000000000000000",
            "initialPrice": "1000000000000",
            "priceRateCoefficient": "2000000000000000000"
        },
        "state": { "currentCollateral": "10000000000000000000", "virtualSupply": "1000000000000000000000" }
    }"#;

    #[test]
    fn parses_wei_fields_and_alias() {
        let s = Snapshot::from_json(SAMPLE).unwrap();
        assert!((s.params.max_supply - 1e9).abs() < 1e-3);
        assert!((s.params.initial_mint - 2e8).abs() < 1e-3);
        assert!((s.params.initial_price - 1e-6).abs() < 1e-18);
        assert_eq!(s.params.price_rate_coefficient, 2.0);
        let st = s.state.unwrap();
        assert_eq!(st.current_collateral, 10.0);
        assert_eq!(st.virtual_supply, 1000.0);
    }

    #[test]
    fn state_is_optional() {
        let json = r#"{"params":{"maxSupply":"10","initialMint":"1","initialPrice":"1","priceRateCoefficient":"1"}}"#;
        assert!(Snapshot::from_json(json).unwrap().state.is_none());
    }

    #[test]
    fn bad_field_names_the_field() {
        let json = r#"{"params":{"maxSupply":"ten","initialMint":"1","initialPrice":"1","priceRateCoefficient":"1"}}"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(format!("{err:#}").contains("maxSupply"));
    }
}

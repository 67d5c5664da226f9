use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The curve names the pipeline recognizes. Filter criteria must name one of
/// these exactly; anything else is rejected before any file is touched.
pub const KNOWN_CURVES: [&str; 26] = [
    "NYMEX",
    "HSC",
    "TGP - 500",
    "TRANSCO 65",
    "FGT - Z3",
    "CG MAINLINE",
    "NGPL - TxOk",
    "NGPL - MIDCON",
    "PEPL",
    "VENTURA",
    "DEMARC",
    "CHICAGO",
    "MICHCON",
    "DOMINION",
    "TCO",
    "TETCO - M3",
    "TRANSCO Z6",
    "ALGONQUIN",
    "EP PERMIAN",
    "EP SAN JUAN",
    "WAHA",
    "ROCKIES",
    "CIG",
    "PG&E CITYGATE",
    "SOCAL",
    "AECO",
];

static CURVE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| KNOWN_CURVES.iter().copied().collect());

pub fn is_known_curve(name: &str) -> bool {
    CURVE_SET.contains(name)
}

/// Which side of the market a row belongs to. Marker values that are neither
/// call nor put (the source files use e.g. `EWMA` here) parse to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionSide {
    Call,
    Put,
    None,
}

impl OptionSide {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CALL" | "C" => OptionSide::Call,
            "PUT" | "P" => OptionSide::Put,
            _ => OptionSide::None,
        }
    }

    pub fn is_call(&self) -> bool {
        *self == OptionSide::Call
    }

    pub fn is_put(&self) -> bool {
        *self == OptionSide::Put
    }
}

impl std::fmt::Display for OptionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionSide::Call => write!(f, "Call"),
            OptionSide::Put => write!(f, "Put"),
            OptionSide::None => write!(f, "None"),
        }
    }
}

/// One validated row of curve data. The source files put the curve name in
/// their `Basis` column and the strike label in `Type`; the validator
/// untangles that so downstream code never sees the raw header names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub curve: String,
    pub basis: String,
    pub side: OptionSide,
    pub mid: f64,
}

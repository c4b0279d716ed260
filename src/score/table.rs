use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::cfd::DEFAULT_SUB_WEIGHT;
use crate::error::{Error, Result};

/// Bundled default table, embedded at compile time.
const PUBLISHED_TABLE: &str = include_str!("../../data/cfd_published.json");
const PUBLISHED_TABLE_NAME: &str = "data/cfd_published.json";

/// Positional and substitution weights for table-driven CFD scoring.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightTable {
    pub pos_weights: Vec<f64>,
    /// (guide base, target base) -> weight
    pub sub_weights: HashMap<(u8, u8), f64>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    pos_weights: Vec<f64>,
    sub_weights: BTreeMap<String, f64>,
}

impl WeightTable {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawTable = serde_json::from_str(json).map_err(|e| Error::Format(format!("weight table: {}", e)))?;

        if let Some(i) = raw.pos_weights.iter().position(|w| !w.is_finite()) {
            return Err(Error::Format(format!("pos_weights[{}] is not a finite number", i)));
        }
        let mut sub_weights = HashMap::with_capacity(raw.sub_weights.len());
        for (token, weight) in raw.sub_weights {
            if !weight.is_finite() {
                return Err(Error::Format(format!("sub_weights['{}'] is not a finite number", token)));
            }
            sub_weights.insert(parse_pair(&token)?, weight);
        }

        Ok(Self {
            pos_weights: raw.pos_weights,
            sub_weights,
        })
    }

    #[inline]
    pub fn sub_weight(&self, from: u8, to: u8) -> f64 {
        self.sub_weights
            .get(&(from.to_ascii_uppercase(), to.to_ascii_uppercase()))
            .copied()
            .unwrap_or(DEFAULT_SUB_WEIGHT)
    }
}

/// "A>G" -> (b'A', b'G')
fn parse_pair(token: &str) -> Result<(u8, u8)> {
    let bad = || Error::Format(format!("invalid substitution token '{}', expected e.g. \"A>G\"", token));
    let (from, to) = token.split_once('>').ok_or_else(bad)?;
    let base = |s: &str| -> Option<u8> {
        match s.trim().as_bytes() {
            [b] if matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T') => Some(b.to_ascii_uppercase()),
            _ => None,
        }
    };
    match (base(from), base(to)) {
        (Some(f), Some(t)) => Ok((f, t)),
        _ => Err(bad()),
    }
}

pub fn load_table(path: &Path) -> Result<WeightTable> {
    if !path.is_file() {
        return Err(Error::MissingResource(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let table = WeightTable::from_json(&content)?;
    debug!(
        path = %path.display(),
        positions = table.pos_weights.len(),
        substitutions = table.sub_weights.len(),
        "loaded weight table"
    );
    Ok(table)
}

pub fn load_published_table() -> Result<WeightTable> {
    if PUBLISHED_TABLE.trim().is_empty() {
        return Err(Error::MissingResource(PUBLISHED_TABLE_NAME.into()));
    }
    WeightTable::from_json(PUBLISHED_TABLE)
}

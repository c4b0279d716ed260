//! 打分引擎：五种确定性打分函数，输出 0–100，100 为完全匹配（PAM 惩罚之前）。

use std::fmt;

use clap::ValueEnum;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::search::{Guide, Hit};

pub mod cfd;
pub mod position;
pub mod table;

pub use cfd::{cfd_score, cfd_score_full, cfd_score_with_table};
pub use position::{mit_like_score, position_weighted_score};
pub use table::{load_published_table, load_table, WeightTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMethod {
    /// position-weighted
    #[default]
    #[value(name = "pw")]
    Pw,
    /// MIT-like
    #[value(name = "mit")]
    Mit,
    /// simplified CFD
    #[value(name = "cfd")]
    Cfd,
    /// CFD with the built-in substitution matrix
    #[value(name = "cfd_full")]
    CfdFull,
    /// CFD driven by a weight table
    #[value(name = "cfd_table")]
    CfdTable,
}

impl ScoreMethod {
    pub fn label(self) -> &'static str {
        match self {
            ScoreMethod::Pw => "pw",
            ScoreMethod::Mit => "mit",
            ScoreMethod::Cfd => "cfd",
            ScoreMethod::CfdFull => "cfd_full",
            ScoreMethod::CfdTable => "cfd_table",
        }
    }

    /// Uniform entry point; methods that ignore `pam` or `table` simply drop them.
    pub fn score(self, guide: &str, target: &str, pam: &str, table: Option<&WeightTable>) -> Result<f64> {
        match self {
            ScoreMethod::Pw => position_weighted_score(guide, target),
            ScoreMethod::Mit => mit_like_score(guide, target),
            ScoreMethod::Cfd => cfd_score(guide, target, pam),
            ScoreMethod::CfdFull => cfd_score_full(guide, target, pam),
            ScoreMethod::CfdTable => cfd_score_with_table(guide, target, table, pam),
        }
    }
}

impl fmt::Display for ScoreMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A hit enriched with every built-in score plus the user-selected `score`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHit {
    pub hit: Hit,
    pub score_pw: f64,
    pub score_mit: f64,
    pub score_cfd: f64,
    pub score_cfd_full: f64,
    pub score: f64,
}

pub fn score_hit(
    guide: &Guide,
    hit: Hit,
    pam: &str,
    method: ScoreMethod,
    table: Option<&WeightTable>,
) -> Result<ScoredHit> {
    let g = guide.as_str();
    let t = hit.target_seq.as_str();
    let score_pw = position_weighted_score(g, t)?;
    let score_mit = mit_like_score(g, t)?;
    let score_cfd = cfd_score(g, t, pam)?;
    let score_cfd_full = cfd_score_full(g, t, pam)?;
    let score = match method {
        ScoreMethod::Pw => score_pw,
        ScoreMethod::Mit => score_mit,
        ScoreMethod::Cfd => score_cfd,
        ScoreMethod::CfdFull => score_cfd_full,
        ScoreMethod::CfdTable => cfd_score_with_table(g, t, table, pam)?,
    };
    Ok(ScoredHit {
        hit,
        score_pw,
        score_mit,
        score_cfd,
        score_cfd_full,
        score,
    })
}

/// Score every hit and order by `score` descending; ties keep scan order.
pub fn score_hits(
    guide: &Guide,
    hits: Vec<Hit>,
    pam: &str,
    method: ScoreMethod,
    table: Option<&WeightTable>,
) -> Result<Vec<ScoredHit>> {
    let mut scored = hits
        .into_par_iter()
        .map(|h| score_hit(guide, h, pam, method, table))
        .collect::<Result<Vec<_>>>()?;
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(scored)
}

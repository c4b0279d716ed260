//! CFD（Cutting Frequency Determination）近似打分。
//!
//! 三种变体共享同一乘法模型：每个错配位置贡献因子 `max(0, 1 - pos[i] * w(g, t))`，
//! 区别在于位置权重曲线与替换权重的来源。PAM 不是 "NGG" 时整体再乘一个惩罚系数。

use tracing::debug;

use super::table::WeightTable;
use crate::error::{ensure_same_len, Result};
use crate::util::dna;

pub const CANONICAL_PAM: &str = "NGG";

/// Non-canonical PAM factor for [`cfd_score`].
pub const SIMPLE_PAM_PENALTY: f64 = 0.9;
/// Non-canonical PAM factor for [`cfd_score_full`] and [`cfd_score_with_table`].
pub const FULL_PAM_PENALTY: f64 = 0.92;
/// Substitution weight for pairs missing from a matrix or table.
pub const DEFAULT_SUB_WEIGHT: f64 = 0.85;

/// Transition-type substitutions are tolerated slightly better in the simplified model.
const SIMPLE_TRANSITIONS: [(u8, u8); 4] = [(b'G', b'A'), (b'C', b'T'), (b'A', b'G'), (b'T', b'C')];

const FULL_SUB_MATRIX: [((u8, u8), f64); 12] = [
    ((b'A', b'C'), 0.8),
    ((b'A', b'G'), 0.6),
    ((b'A', b'T'), 0.9),
    ((b'C', b'A'), 0.7),
    ((b'C', b'G'), 0.85),
    ((b'C', b'T'), 0.6),
    ((b'G', b'A'), 0.6),
    ((b'G', b'C'), 0.85),
    ((b'G', b'T'), 0.75),
    ((b'T', b'A'), 0.9),
    ((b'T', b'C'), 0.6),
    ((b'T', b'G'), 0.8),
];

#[inline]
pub fn is_canonical_pam(pam: &str) -> bool {
    pam.eq_ignore_ascii_case(CANONICAL_PAM)
}

/// `((i + 1) / L)^1.5`：从 PAM 远端到近端单调递增，近端为 1。
pub fn generated_profile(len: usize) -> Vec<f64> {
    let l = len as f64;
    (0..len).map(|i| ((i + 1) as f64 / l).powf(1.5)).collect()
}

fn full_sub_weight(from: u8, to: u8) -> f64 {
    FULL_SUB_MATRIX
        .iter()
        .find(|(pair, _)| *pair == (from, to))
        .map_or(DEFAULT_SUB_WEIGHT, |&(_, w)| w)
}

/// Product of per-mismatch factors, scaled to 0-100.
fn multiplicative<P, W>(guide: &[u8], target: &[u8], pos: P, sub: W) -> f64
where
    P: Fn(usize) -> f64,
    W: Fn(u8, u8) -> f64,
{
    let score = dna::mismatch_positions(guide, target)
        .into_iter()
        .map(|i| {
            let g = guide[i].to_ascii_uppercase();
            let t = target[i].to_ascii_uppercase();
            (1.0 - pos(i) * sub(g, t)).max(0.0)
        })
        .product::<f64>();
    score * 100.0
}

/// Simplified CFD: linear positional ramp `0.02 .. 0.20`, transitions weighted 0.9.
pub fn cfd_score(guide: &str, target: &str, pam: &str) -> Result<f64> {
    let (g, t) = (guide.as_bytes(), target.as_bytes());
    ensure_same_len(g, t)?;
    let span = g.len().saturating_sub(1).max(1) as f64;
    let mut score = multiplicative(
        g,
        t,
        |i| 0.02 + (i as f64 / span) * 0.18,
        |a, b| {
            if SIMPLE_TRANSITIONS.contains(&(a, b)) {
                0.9
            } else {
                1.0
            }
        },
    );
    if !is_canonical_pam(pam) {
        score *= SIMPLE_PAM_PENALTY;
    }
    Ok(score.max(0.0))
}

/// CFD with the `((i+1)/L)^1.5` profile and the fixed 12-entry substitution matrix.
pub fn cfd_score_full(guide: &str, target: &str, pam: &str) -> Result<f64> {
    let (g, t) = (guide.as_bytes(), target.as_bytes());
    ensure_same_len(g, t)?;
    let profile = generated_profile(g.len());
    let mut score = multiplicative(g, t, |i| profile[i], full_sub_weight);
    if !is_canonical_pam(pam) {
        score *= FULL_PAM_PENALTY;
    }
    Ok(score.max(0.0))
}

/// CFD driven by an explicit [`WeightTable`].
///
/// Without a table this is [`cfd_score_full`]. A table whose positional weights
/// do not cover exactly `L` positions falls back to [`generated_profile`].
pub fn cfd_score_with_table(guide: &str, target: &str, table: Option<&WeightTable>, pam: &str) -> Result<f64> {
    let Some(table) = table else {
        return cfd_score_full(guide, target, pam);
    };
    let (g, t) = (guide.as_bytes(), target.as_bytes());
    ensure_same_len(g, t)?;

    let generated;
    let profile: &[f64] = if table.pos_weights.len() == g.len() {
        &table.pos_weights
    } else {
        debug!(
            table_len = table.pos_weights.len(),
            guide_len = g.len(),
            "positional weights do not match guide length, using generated profile"
        );
        generated = generated_profile(g.len());
        &generated
    };

    let mut score = multiplicative(g, t, |i| profile[i], |a, b| table.sub_weight(a, b));
    if !is_canonical_pam(pam) {
        score *= FULL_PAM_PENALTY;
    }
    Ok(score.clamp(0.0, 100.0))
}

use crate::error::{ensure_same_len, Result};
use crate::util::dna;

/// Position-weighted score (0-100). Weight of position `i` is `i + 1`, so the
/// PAM-proximal end (index L-1) costs the most.
pub fn position_weighted_score(guide: &str, target: &str) -> Result<f64> {
    let (g, t) = (guide.as_bytes(), target.as_bytes());
    ensure_same_len(g, t)?;
    let l = g.len();
    if l == 0 {
        return Ok(100.0);
    }
    let total = (l * (l + 1) / 2) as f64;
    let penalty: usize = dna::mismatch_positions(g, t).iter().map(|&i| i + 1).sum();
    Ok((1.0 - penalty as f64 / total).max(0.0) * 100.0)
}

/// MIT-like multiplicative score with per-position penalty `0.01 + i / (5L)`.
pub fn mit_like_score(guide: &str, target: &str) -> Result<f64> {
    let (g, t) = (guide.as_bytes(), target.as_bytes());
    ensure_same_len(g, t)?;
    let l = g.len() as f64;
    let score = dna::mismatch_positions(g, t)
        .into_iter()
        .map(|i| 1.0 - (0.01 + i as f64 / (l * 5.0)))
        .product::<f64>();
    Ok((score * 100.0).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const GUIDE: &str = "GAGTCCGAGCAGAAGAAGA";

    #[test]
    fn exact_match_scores_100() {
        assert!((position_weighted_score(GUIDE, GUIDE).unwrap() - 100.0).abs() < 1e-9);
        assert!((mit_like_score(GUIDE, &GUIDE.to_lowercase()).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn single_mismatch_values() {
        let t = "AAGTCCGAGCAGAAGAAGA";
        // weight 1 out of 190
        let pw = position_weighted_score(GUIDE, t).unwrap();
        assert!((pw - (1.0 - 1.0 / 190.0) * 100.0).abs() < 1e-9);
        let mit = mit_like_score(GUIDE, t).unwrap();
        assert!((mit - 99.0).abs() < 1e-9);
    }

    #[test]
    fn pam_proximal_mismatch_costs_more() {
        let distal = "AAGTCCGAGCAGAAGAAGA";
        let proximal = "GAGTCCGAGCAGAAGAAGC";
        assert!(position_weighted_score(GUIDE, proximal).unwrap() <= position_weighted_score(GUIDE, distal).unwrap());
        assert!(mit_like_score(GUIDE, proximal).unwrap() <= mit_like_score(GUIDE, distal).unwrap());
    }

    #[test]
    fn all_mismatches_floor_at_zero() {
        let t = "CTCAGGTCTAGTCTTCTTC";
        assert_eq!(position_weighted_score(GUIDE, t).unwrap(), 0.0);
        assert!(mit_like_score(GUIDE, t).unwrap() >= 0.0);
    }

    #[test]
    fn length_mismatch_is_invalid_input() {
        assert!(matches!(position_weighted_score("AAA", "AA"), Err(Error::InvalidInput(_))));
        assert!(matches!(mit_like_score("AAA", "AA"), Err(Error::InvalidInput(_))));
    }
}

//! PAM 感知的脱靶位点扫描。
//!
//! 对每条参考序列的正链与反向互补链逐位枚举长度为 L 的窗口，
//! 在下游有限偏移范围内寻找 PAM，满足错配预算的窗口生成 [`Hit`]。

use std::fmt;

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::util::dna;

pub mod pam;

pub use pam::PamPattern;

pub const DEFAULT_PAM: &str = "NGG";
/// 期望的完整 guide 长度；更短的 guide 允许 PAM 向下游错开若干碱基。
pub const CANONICAL_GUIDE_LEN: usize = 20;
pub const DEFAULT_MAX_MISMATCHES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSequence {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

impl ReferenceSequence {
    pub fn new(id: impl Into<String>, seq: impl AsRef<[u8]>) -> Self {
        Self {
            id: id.into(),
            desc: None,
            seq: seq.as_ref().to_ascii_uppercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guide {
    seq: String,
}

impl Guide {
    pub fn new(seq: &str) -> Result<Self> {
        let seq = seq.trim().to_ascii_uppercase();
        if seq.is_empty() {
            return Err(Error::InvalidInput("guide must be a non-empty sequence".to_string()));
        }
        Ok(Self { seq })
    }

    pub fn as_str(&self) -> &str {
        &self.seq
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.seq.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

impl fmt::Display for Guide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.seq)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn symbol(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 候选位点。坐标为原始正向参考上的 0-based 闭区间；`target_seq` 与 guide 同向。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hit {
    pub seq_id: String,
    pub start: usize,
    pub end: usize,
    pub strand: Strand,
    pub target_seq: String,
    pub mismatches: usize,
    pub mismatch_positions: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub pam: PamPattern,
    pub max_mismatches: usize,
    pub canonical_guide_len: usize,
}

impl ScanConfig {
    pub fn new(pam: PamPattern, max_mismatches: usize) -> Self {
        Self {
            pam,
            max_mismatches,
            canonical_guide_len: CANONICAL_GUIDE_LEN,
        }
    }

    pub fn with_canonical_guide_len(mut self, len: usize) -> Self {
        self.canonical_guide_len = len;
        self
    }

    /// PAM 相对 guide 末端可向下游错开的最大碱基数。
    #[inline]
    pub fn max_offset(&self, guide_len: usize) -> usize {
        self.canonical_guide_len.saturating_sub(guide_len)
    }
}

/// Convert a signed mismatch budget (as typed by a user) into the scanner's unit.
pub fn mismatch_budget(value: i64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::InvalidInput(format!("max mismatches must be non-negative, got {}", value)))
}

/// 顺序扫描所有参考序列。输出顺序：按输入序列顺序，每条序列先正链后反链，链内按起点递增。
pub fn scan<'a, I>(guide: &Guide, references: I, config: &ScanConfig) -> Vec<Hit>
where
    I: IntoIterator<Item = &'a ReferenceSequence>,
{
    references
        .into_iter()
        .flat_map(|r| scan_sequence(guide, r, config))
        .collect()
}

/// 与 [`scan`] 结果一致，但按参考序列并行（当前 rayon 线程池）。
pub fn scan_parallel(guide: &Guide, references: &[ReferenceSequence], config: &ScanConfig) -> Vec<Hit> {
    references
        .par_iter()
        .flat_map_iter(|r| scan_sequence(guide, r, config))
        .collect()
}

pub fn scan_sequence(guide: &Guide, reference: &ReferenceSequence, config: &ScanConfig) -> Vec<Hit> {
    let seq = &reference.seq;
    let n = seq.len();
    let l = guide.len();
    let mut hits = Vec::new();

    scan_strand(guide.as_bytes(), seq, config, |i, target, positions| {
        hits.push(Hit {
            seq_id: reference.id.clone(),
            start: i,
            end: i + l - 1,
            strand: Strand::Forward,
            target_seq: String::from_utf8_lossy(target).into_owned(),
            mismatches: positions.len(),
            mismatch_positions: positions,
        });
    });
    let n_fwd = hits.len();

    // 反向互补链上的局部下标 i 对应原始坐标 [n-i-L, n-i-1]，与 PAM 长度无关
    let rc = dna::revcomp(seq);
    scan_strand(guide.as_bytes(), &rc, config, |i, target, positions| {
        hits.push(Hit {
            seq_id: reference.id.clone(),
            start: n - i - l,
            end: n - i - 1,
            strand: Strand::Reverse,
            target_seq: String::from_utf8_lossy(target).into_owned(),
            mismatches: positions.len(),
            mismatch_positions: positions,
        });
    });

    debug!(
        seq_id = %reference.id,
        len = n,
        forward = n_fwd,
        reverse = hits.len() - n_fwd,
        "scanned reference"
    );
    hits
}

fn scan_strand<F>(guide: &[u8], strand: &[u8], config: &ScanConfig, mut emit: F)
where
    F: FnMut(usize, &[u8], Vec<usize>),
{
    let n = strand.len();
    let l = guide.len();
    let p = config.pam.len();
    if l == 0 || n < l + p {
        return;
    }
    let max_offset = config.max_offset(l);

    for i in 0..=n - l - p {
        // 首个命中的偏移即可，target 不随偏移变化
        let pam_found = (0..=max_offset).any(|off| {
            let ps = i + l + off;
            strand
                .get(ps..ps + p)
                .map_or(false, |w| config.pam.matches(w))
        });
        if !pam_found {
            continue;
        }
        let target = &strand[i..i + l];
        let positions = dna::mismatch_positions(guide, target);
        if positions.len() <= config.max_mismatches {
            emit(i, target, positions);
        }
    }
}

//! # guidescan
//!
//! CRISPR guide 脱靶位点搜索与活性打分。
//!
//! 本 crate 提供：
//!
//! - **PAM 匹配**：支持 'N' 通配符的定长模式匹配
//! - **序列扫描**：正链与反向互补链上的 PAM 感知近似匹配（仅 Hamming 错配）
//! - **打分**：位置加权、MIT-like、三种 CFD 变体（简化 / 完整矩阵 / 权重表）
//! - **权重表**：JSON 权重表加载，附带一份默认表
//!
//! ## 快速示例
//!
//! ```rust
//! use guidescan::search::{self, Guide, PamPattern, ReferenceSequence, ScanConfig};
//! use guidescan::score::ScoreMethod;
//!
//! let guide = Guide::new("GAGTCCGAGCAGAAGAAGA").unwrap();
//! let reference = ReferenceSequence::new("chr1", "AAAGAGTCCGAGCAGAAGAAGAAGG");
//! let config = ScanConfig::new(PamPattern::new("NGG").unwrap(), 2);
//!
//! let hits = search::scan(&guide, [&reference], &config);
//! assert_eq!(hits[0].start, 3);
//!
//! let score = ScoreMethod::CfdFull
//!     .score(guide.as_str(), &hits[0].target_seq, "NGG", None)
//!     .unwrap();
//! assert!((score - 100.0).abs() < 1e-9);
//! ```
//!
//! ## 模块说明
//!
//! - [`search`] — PAM 匹配与序列扫描
//! - [`score`] — 打分函数与权重表
//! - [`io`] — FASTA 读取，结果 CSV 读写
//! - [`report`] — 结果摘要与统计
//! - [`util`] — 反向互补、错配位置等 DNA 工具函数

pub mod error;
pub mod io;
pub mod report;
pub mod score;
pub mod search;
pub mod util;

pub use error::{Error, Result};

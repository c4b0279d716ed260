use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::score::{ScoreMethod, ScoredHit};

pub const RESULT_FIELDS: [&str; 12] = [
    "seq_id",
    "start",
    "end",
    "strand",
    "target_seq",
    "mismatches",
    "mismatch_positions",
    "score_pw",
    "score_mit",
    "score_cfd",
    "score_cfd_full",
    "score",
];

/// One CSV line of a result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub seq_id: String,
    pub start: usize,
    pub end: usize,
    pub strand: String,
    pub target_seq: String,
    pub mismatches: usize,
    /// comma separated, 0-based
    pub mismatch_positions: String,
    pub score_pw: f64,
    pub score_mit: f64,
    pub score_cfd: f64,
    pub score_cfd_full: f64,
    pub score: f64,
}

impl From<&ScoredHit> for ResultRow {
    fn from(s: &ScoredHit) -> Self {
        let h = &s.hit;
        Self {
            seq_id: h.seq_id.clone(),
            start: h.start,
            end: h.end,
            strand: h.strand.to_string(),
            target_seq: h.target_seq.clone(),
            mismatches: h.mismatches,
            mismatch_positions: join_positions(&h.mismatch_positions),
            score_pw: s.score_pw,
            score_mit: s.score_mit,
            score_cfd: s.score_cfd,
            score_cfd_full: s.score_cfd_full,
            score: s.score,
        }
    }
}

pub fn join_positions(positions: &[usize]) -> String {
    positions
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn write_results<W: Write>(out: W, hits: &[ScoredHit]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    if hits.is_empty() {
        // serde only emits the header alongside the first record
        wtr.write_record(RESULT_FIELDS)?;
    }
    for h in hits {
        wtr.serialize(ResultRow::from(h))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_results_file(path: &Path, hits: &[ScoredHit]) -> Result<()> {
    let fh = std::fs::File::create(path)?;
    write_results(std::io::BufWriter::new(fh), hits)
}

pub fn read_results_file(path: &Path) -> Result<Vec<ResultRow>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let rows = rdr.deserialize().collect::<std::result::Result<Vec<ResultRow>, _>>()?;
    Ok(rows)
}

/// Aligned, human-friendly rendering of the result columns.
pub fn render_table(hits: &[ScoredHit]) -> String {
    const FIELDS: [&str; 8] = [
        "seq_id",
        "start",
        "end",
        "strand",
        "target_seq",
        "mismatches",
        "mismatch_positions",
        "score",
    ];
    let rows: Vec<[String; 8]> = hits
        .iter()
        .map(|s| {
            let h = &s.hit;
            [
                h.seq_id.clone(),
                h.start.to_string(),
                h.end.to_string(),
                h.strand.to_string(),
                h.target_seq.clone(),
                h.mismatches.to_string(),
                join_positions(&h.mismatch_positions),
                format!("{:.2}", s.score),
            ]
        })
        .collect();

    let mut widths = FIELDS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let dashes: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    let mut out = String::new();
    out.push_str(&pad_row(FIELDS, &widths));
    out.push('\n');
    out.push_str(&pad_row(dashes.iter().map(String::as_str), &widths));
    out.push('\n');
    for row in &rows {
        out.push_str(&pad_row(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn pad_row<'a>(cells: impl IntoIterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells
        .into_iter()
        .zip(widths)
        .map(|(c, &w)| format!("{:<w$}", c, w = w))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

/// Sidecar describing how a result table was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub guide: String,
    pub pam: String,
    pub fasta: String,
    pub max_mismatches: usize,
    pub score_method: ScoreMethod,
    pub weight_table: Option<String>,
    pub hits: usize,
    pub command: String,
    pub timestamp: String,
}

impl RunManifest {
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let fh = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(fh, self).map_err(std::io::Error::from)?;
        Ok(())
    }
}

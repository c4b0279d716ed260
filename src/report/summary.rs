use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    High,
    Moderate,
    Low,
    VeryLow,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            RiskLevel::High
        } else if score >= 70.0 {
            RiskLevel::Moderate
        } else if score >= 40.0 {
            RiskLevel::Low
        } else {
            RiskLevel::VeryLow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Low => "low",
            RiskLevel::VeryLow => "very_low",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RiskLevel::High => "High — predicted active (likely on-target)",
            RiskLevel::Moderate => "Moderate — possible activity",
            RiskLevel::Low => "Low — unlikely to be highly active",
            RiskLevel::VeryLow => "Very low — unlikely active",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts `""`, `"[]"`, `"None"`, `"1,5"` and `"[1, 5]"`.
pub fn parse_positions(tok: &str) -> Result<Vec<usize>> {
    let tok = tok.trim();
    if tok == "None" {
        return Ok(Vec::new());
    }
    tok.trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| Error::Format(format!("invalid mismatch position '{}'", s)))
        })
        .collect()
}

/// 1-based, comma separated; `"None"` when empty.
pub fn human_positions(positions: &[usize]) -> String {
    if positions.is_empty() {
        return "None".to_string();
    }
    positions
        .iter()
        .map(|p| (p + 1).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn summarize(mismatches: usize, positions: &[usize], score: f64) -> (String, RiskLevel) {
    let risk = RiskLevel::from_score(score);
    let desc = risk.description();
    let summary = if mismatches == 0 {
        format!("Exact match. {} (score={:.2}).", desc, score)
    } else {
        let noun = if mismatches == 1 { "mismatch" } else { "mismatches" };
        format!(
            "{} {} at position(s) {}. {} (score={:.2}).",
            mismatches,
            noun,
            human_positions(positions),
            desc,
            score
        )
    };
    (summary, risk)
}

/// Copy a result table, appending (or overwriting) `summary` and `risk_level`
/// columns. Returns the number of rows written.
pub fn summarize_csv<R: Read, W: Write>(input: R, output: W) -> Result<usize> {
    let mut rdr = csv::Reader::from_reader(input);
    let mut headers = rdr.headers()?.clone();
    let column = |h: &csv::StringRecord, name: &str| h.iter().position(|c| c == name);

    let i_mm = column(&headers, "mismatches");
    let i_pos = column(&headers, "mismatch_positions");
    let i_score = column(&headers, "score");
    let i_summary = column(&headers, "summary").unwrap_or_else(|| {
        headers.push_field("summary");
        headers.len() - 1
    });
    let i_risk = column(&headers, "risk_level").unwrap_or_else(|| {
        headers.push_field("risk_level");
        headers.len() - 1
    });

    let mut wtr = csv::Writer::from_writer(output);
    wtr.write_record(&headers)?;

    let mut n = 0usize;
    for record in rdr.records() {
        let record = record?;
        let field = |i: Option<usize>| i.and_then(|i| record.get(i)).map(str::trim).unwrap_or("");

        let mismatches = match field(i_mm) {
            "" => 0,
            s => s
                .parse::<usize>()
                .map_err(|_| Error::Format(format!("invalid mismatch count '{}'", s)))?,
        };
        let positions = parse_positions(field(i_pos))?;
        let score = match field(i_score) {
            "" => 0.0,
            s => s
                .parse::<f64>()
                .map_err(|_| Error::Format(format!("invalid score '{}'", s)))?,
        };
        let (summary, risk) = summarize(mismatches, &positions, score);

        let mut out: Vec<String> = record.iter().map(str::to_string).collect();
        out.resize(headers.len(), String::new());
        out[i_summary] = summary;
        out[i_risk] = risk.label().to_string();
        wtr.write_record(&out)?;
        n += 1;
    }
    wtr.flush()?;
    Ok(n)
}

pub fn summarize_file(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_file() {
        return Err(Error::MissingResource(src.to_path_buf()));
    }
    let input = std::fs::File::open(src)?;
    let output = std::io::BufWriter::new(std::fs::File::create(dst)?);
    summarize_csv(input, output)
}

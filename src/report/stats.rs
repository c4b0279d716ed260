use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// sample standard deviation (n - 1); NaN for fewer than two values
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStats {
    /// `None` for an empty column.
    pub fn from_values(name: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            name: name.to_string(),
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl fmt::Display for ColumnStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary statistics for '{}':", self.name)?;
        writeln!(f, "count  {:>12}", self.count)?;
        for (label, v) in [
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ] {
            writeln!(f, "{:<5}  {:>12.6}", label, v)?;
        }
        Ok(())
    }
}

fn is_score_column(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("score") || lower.contains("eff")
}

/// Statistics for every column whose name mentions "score" or "eff".
/// Blank cells are skipped; any other non-numeric cell is a format error.
pub fn column_stats<R: Read>(input: R) -> Result<Vec<ColumnStats>> {
    let mut rdr = csv::Reader::from_reader(input);
    let headers = rdr.headers()?.clone();
    let columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| is_score_column(name))
        .collect();

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); columns.len()];
    for record in rdr.records() {
        let record = record?;
        for (slot, &(i, name)) in values.iter_mut().zip(&columns) {
            let cell = record.get(i).map(str::trim).unwrap_or("");
            if cell.is_empty() {
                continue;
            }
            let v = cell
                .parse::<f64>()
                .map_err(|_| Error::Format(format!("column '{}' has non-numeric value '{}'", name, cell)))?;
            slot.push(v);
        }
    }

    Ok(columns
        .iter()
        .zip(&values)
        .filter_map(|(&(_, name), vals)| ColumnStats::from_values(name, vals))
        .collect())
}

pub fn column_stats_file(path: &Path) -> Result<Vec<ColumnStats>> {
    if !path.is_file() {
        return Err(Error::MissingResource(path.to_path_buf()));
    }
    column_stats(std::fs::File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_matches_linear_quantiles() {
        let s = ColumnStats::from_values("score", &[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.q25, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q75, 3.25);
        assert!((s.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_undefined_std() {
        let s = ColumnStats::from_values("score", &[7.0]).unwrap();
        assert!(s.std.is_nan());
        assert_eq!(s.median, 7.0);
        assert!(ColumnStats::from_values("score", &[]).is_none());
    }

    #[test]
    fn picks_score_and_efficiency_columns() {
        let input = "seq_id,start,score_pw,Efficiency,score\nchr1,0,100,0.5,90\nchr1,5,80,,70\n";
        let stats = column_stats(input.as_bytes()).unwrap();
        let names: Vec<_> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["score_pw", "Efficiency", "score"]);
        assert_eq!(stats[1].count, 1);
        assert_eq!(stats[2].mean, 80.0);
    }

    #[test]
    fn no_score_columns_yields_nothing() {
        let stats = column_stats("seq_id,start\nchr1,0\n".as_bytes()).unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn non_numeric_cell_is_format_error() {
        let err = column_stats("score\nhigh\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn display_lists_every_statistic() {
        let text = ColumnStats::from_values("score", &[1.0, 2.0]).unwrap().to_string();
        for label in ["count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
            assert!(text.contains(label), "{}", label);
        }
    }
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use guidescan::io::{fasta, results};
use guidescan::report;
use guidescan::score::{self, ScoreMethod, WeightTable};
use guidescan::search::{self, Guide, PamPattern, ScanConfig};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "guidescan",
    author,
    version,
    about = "PAM-aware off-target search and scoring for CRISPR guides",
    arg_required_else_help = true
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search a FASTA for off-target sites of a guide
    Search {
        /// Guide sequence
        #[arg(long)]
        guide: String,
        /// PAM pattern, 'N' matches any base
        #[arg(long, default_value = search::DEFAULT_PAM)]
        pam: String,
        /// Reference FASTA file
        #[arg(long)]
        fasta: PathBuf,
        /// Output CSV path
        #[arg(short, long, default_value = "results.csv")]
        out: PathBuf,
        #[arg(long = "max-mismatches", default_value_t = search::DEFAULT_MAX_MISMATCHES as i64, allow_negative_numbers = true)]
        max_mismatches: i64,
        /// Method used for the `score` column
        #[arg(long = "score-method", value_enum, default_value_t = ScoreMethod::Pw)]
        score_method: ScoreMethod,
        /// Weight table JSON for cfd_table scoring
        #[arg(long = "cfd-table", conflicts_with = "published_table")]
        cfd_table: Option<PathBuf>,
        /// Use the bundled weight table for cfd_table scoring
        #[arg(long = "published-table")]
        published_table: bool,
        /// Expected full guide length; shorter guides may see the PAM shifted downstream
        #[arg(long = "canonical-len", default_value_t = search::CANONICAL_GUIDE_LEN)]
        canonical_len: usize,
        /// Print a human-friendly table to stdout
        #[arg(long)]
        pretty: bool,
        /// Also write <out>.manifest.json describing the run
        #[arg(long)]
        manifest: bool,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
    /// Add plain-English summary and risk level columns to a result CSV
    Summarize {
        /// Result CSV produced by `search`
        input: PathBuf,
        /// Annotated output CSV
        output: PathBuf,
    },
    /// Print summary statistics for the score columns of a result CSV
    Stats {
        input: PathBuf,
    },
}

struct SearchOpt {
    guide: String,
    pam: String,
    fasta: PathBuf,
    out: PathBuf,
    max_mismatches: i64,
    score_method: ScoreMethod,
    cfd_table: Option<PathBuf>,
    published_table: bool,
    canonical_len: usize,
    pretty: bool,
    manifest: bool,
    threads: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("guidescan=debug,info")
    } else {
        EnvFilter::new("guidescan=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match cli.command {
        Commands::Search {
            guide,
            pam,
            fasta,
            out,
            max_mismatches,
            score_method,
            cfd_table,
            published_table,
            canonical_len,
            pretty,
            manifest,
            threads,
        } => run_search(SearchOpt {
            guide,
            pam,
            fasta,
            out,
            max_mismatches,
            score_method,
            cfd_table,
            published_table,
            canonical_len,
            pretty,
            manifest,
            threads,
        }),
        Commands::Summarize { input, output } => run_summarize(&input, &output),
        Commands::Stats { input } => run_stats(&input),
    }
}

fn validate(opt: &SearchOpt) -> Result<()> {
    let mut errors = Vec::new();
    if opt.guide.trim().is_empty() {
        errors.push("--guide is required and must be a non-empty string.".to_string());
    }
    if !opt.fasta.is_file() {
        errors.push(format!("--fasta file '{}' does not exist.", opt.fasta.display()));
    }
    if opt.max_mismatches < 0 {
        errors.push("--max-mismatches must be non-negative.".to_string());
    }
    if let Some(t) = &opt.cfd_table {
        if !t.is_file() {
            errors.push(format!("--cfd-table file '{}' does not exist.", t.display()));
        }
    }
    if !errors.is_empty() {
        anyhow::bail!("input validation error(s):\n  - {}", errors.join("\n  - "));
    }
    Ok(())
}

fn load_weight_table(opt: &SearchOpt) -> Result<Option<WeightTable>> {
    let table = if let Some(path) = &opt.cfd_table {
        Some(score::load_table(path).with_context(|| format!("cannot load weight table '{}'", path.display()))?)
    } else if opt.published_table {
        Some(score::load_published_table().context("cannot load bundled weight table")?)
    } else {
        None
    };
    if table.is_some() && opt.score_method != ScoreMethod::CfdTable {
        warn!(
            "weight table only affects --score-method cfd_table (selected: {})",
            opt.score_method
        );
    }
    Ok(table)
}

fn run_search(opt: SearchOpt) -> Result<()> {
    validate(&opt)?;

    let guide = Guide::new(&opt.guide)?;
    let pam = PamPattern::new(&opt.pam)?;
    let budget = search::mismatch_budget(opt.max_mismatches)?;
    let config = ScanConfig::new(pam, budget).with_canonical_guide_len(opt.canonical_len);
    let table = load_weight_table(&opt)?;

    let references = fasta::read_references(&opt.fasta)
        .with_context(|| format!("cannot read reference FASTA '{}'", opt.fasta.display()))?;
    if references.is_empty() {
        anyhow::bail!("FASTA file '{}' contains no sequences", opt.fasta.display());
    }
    let total_len: usize = references.iter().map(|r| r.seq.len()).sum();
    info!(
        sequences = references.len(),
        total_len,
        guide_len = guide.len(),
        pam = %config.pam,
        max_mismatches = budget,
        "scanning references"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .build()
        .context("cannot build thread pool")?;
    let pam_str = config.pam.to_string();
    let scored = pool.install(|| {
        let hits = search::scan_parallel(&guide, &references, &config);
        score::score_hits(&guide, hits, &pam_str, opt.score_method, table.as_ref())
    })?;

    results::write_results_file(&opt.out, &scored)
        .with_context(|| format!("cannot write results to '{}'", opt.out.display()))?;

    if opt.pretty {
        print!("{}", results::render_table(&scored));
    }

    if opt.manifest {
        let path = PathBuf::from(format!("{}.manifest.json", opt.out.display()));
        let manifest = results::RunManifest {
            guide: guide.to_string(),
            pam: pam_str.clone(),
            fasta: opt.fasta.display().to_string(),
            max_mismatches: budget,
            score_method: opt.score_method,
            weight_table: match (&opt.cfd_table, opt.published_table) {
                (Some(p), _) => Some(p.display().to_string()),
                (None, true) => Some("bundled".to_string()),
                (None, false) => None,
            },
            hits: scored.len(),
            command: std::env::args().collect::<Vec<_>>().join(" "),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        manifest
            .save_to_file(&path)
            .with_context(|| format!("cannot write manifest '{}'", path.display()))?;
        info!(path = %path.display(), "wrote run manifest");
    }

    println!("Wrote {} hits to {}", scored.len(), opt.out.display());
    Ok(())
}

fn run_summarize(input: &Path, output: &Path) -> Result<()> {
    let n = report::summarize_file(input, output)
        .with_context(|| format!("cannot summarize '{}'", input.display()))?;
    info!(rows = n, "summarized results");
    println!("Wrote {}", output.display());
    Ok(())
}

fn run_stats(input: &Path) -> Result<()> {
    let stats = report::column_stats_file(input)
        .with_context(|| format!("cannot read results '{}'", input.display()))?;
    if stats.is_empty() {
        println!("No efficiency or score columns found in results CSV.");
        return Ok(());
    }
    for s in &stats {
        println!("\n{}", s);
    }
    Ok(())
}

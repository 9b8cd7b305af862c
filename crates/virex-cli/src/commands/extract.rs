//! Extract command - walk a directory of message files and write the report.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{info, warn};
use walkdir::WalkDir;

use virex_core::report::{self, ContainerSummary, PipeWriter, ReportLayout, RunReport};
use virex_core::walker::WalkStatsSnapshot;
use virex_core::{ArtifactSink, ContainerWalker, KindRules, WalkContext, WalkOutput};

use super::{load_config, load_extractor};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Root directory searched recursively for message files
    #[arg(required = true)]
    root: PathBuf,

    /// Delimited output file (rows are appended)
    #[arg(short, long, default_value = "output.txt")]
    output: PathBuf,

    /// Directory for per-file summaries and the global report
    #[arg(short, long, default_value = "resultats_extraction")]
    results_dir: PathBuf,

    /// Save rendered PDF text and field dumps under this directory
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "1")]
    jobs: usize,

    /// Field schema (JSON) replacing the built-in one
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Skip per-file summaries and the global report
    #[arg(long)]
    no_summaries: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.root.is_dir() {
        anyhow::bail!("Root directory not found: {}", args.root.display());
    }

    let extractor = load_extractor(&config, args.schema.as_deref())?;
    let sentinel = extractor.sentinel().to_string();
    let layout = ReportLayout::from_config(&config.report, extractor.schema(), &sentinel);

    let mut walker = ContainerWalker::from_config(extractor, &config);
    if let Some(dir) = &args.artifacts {
        let mut artifacts = config.artifacts.clone();
        if !artifacts.save_text && !artifacts.save_records {
            artifacts.save_text = true;
            artifacts.save_records = true;
        }
        walker = walker.with_artifacts(ArtifactSink::new(dir, &artifacts));
    }

    let files = find_containers(&args.root, walker.kind_rules());
    if files.is_empty() {
        anyhow::bail!("No message files found under {}", args.root.display());
    }

    println!(
        "{} Found {} message files",
        style("ℹ").blue(),
        files.len()
    );

    let write_summaries = config.report.write_summaries && !args.no_summaries;
    if write_summaries {
        fs::create_dir_all(&args.results_dir)?;
    }
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let (results, stats) = walk_all(
        Arc::new(walker),
        files,
        args.jobs,
        config.walker.dedupe_across_containers,
        &pb,
    )
    .await?;
    pb.finish_and_clear();

    let mut writer = PipeWriter::open(&args.output, layout)?;
    let mut run_report = RunReport::new();

    for result in &results {
        let source = result.path.display().to_string();

        for (label, document) in result.output.iter() {
            writer.write_row(&report::build_row(&source, label, document))?;
        }

        if write_summaries {
            let summary = ContainerSummary::from_walk(source.as_str(), &result.output, &sentinel);
            let file_name = result
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.clone());
            if let Err(e) = summary.write_to(&args.results_dir, &file_name) {
                warn!("Cannot write summary for {}: {}", source, e);
            }
            run_report.add(&summary);
        }
    }
    writer.flush()?;

    if write_summaries {
        let report_path = run_report.write_to(&args.results_dir)?;
        info!("Global report written to {}", report_path.display());
    }

    println!();
    println!("{}", style("Extraction Summary").bold().underlined());
    println!("  Message files:     {}", results.len());
    println!("  Containers opened: {}", stats.containers_opened);
    println!(
        "  PDFs extracted:    {}",
        style(stats.pdfs_extracted).green()
    );
    if stats.pdfs_without_text > 0 {
        println!(
            "  PDFs without text: {}",
            style(stats.pdfs_without_text).yellow()
        );
    }
    if stats.containers_skipped > 0 {
        println!("  Already visited:   {}", stats.containers_skipped);
    }
    if stats.open_failures > 0 {
        println!("  Unreadable:        {}", style(stats.open_failures).red());
    }
    println!("  Rows written:      {}", writer.rows_written());
    println!("  Time elapsed:      {:.2}s", start.elapsed().as_secs_f64());
    println!();
    println!(
        "{} Report written to {}",
        style("✓").green(),
        args.output.display()
    );

    Ok(())
}

/// Walk result of one top-level message file.
struct FileResult {
    path: PathBuf,
    output: WalkOutput,
}

/// Walk every file on blocking tasks, at most `jobs` at a time.
///
/// Results come back in input order, with the counters of the whole run.
/// With `dedupe` all files share one walk context; otherwise each file gets
/// its own.
async fn walk_all(
    walker: Arc<ContainerWalker>,
    files: Vec<PathBuf>,
    jobs: usize,
    dedupe: bool,
    pb: &ProgressBar,
) -> anyhow::Result<(Vec<FileResult>, WalkStatsSnapshot)> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let shared = Arc::new(WalkContext::new());
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let walker = Arc::clone(&walker);
        let ctx = if dedupe {
            Arc::clone(&shared)
        } else {
            Arc::new(WalkContext::new())
        };
        let pb = pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            info!("Processing {}", path.display());
            let output = walker.walk_path(&ctx, &path);
            drop(permit);
            pb.inc(1);
            (path, output, ctx)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    let mut stats = WalkStatsSnapshot::default();
    for handle in handles {
        let (path, output, ctx) = handle.await?;
        if !dedupe {
            stats += ctx.stats.snapshot();
        }
        results.push(FileResult { path, output });
    }

    if dedupe {
        stats = shared.stats.snapshot();
    }

    Ok((results, stats))
}

/// Container files under `root`, sorted by path.
fn find_containers(root: &Path, kinds: &KindRules) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| kinds.is_container_file(&e.file_name().to_string_lossy()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

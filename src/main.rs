use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use breakdown::discovery::{self, DiscoveryConfig};
use breakdown::incremental::{render_report, title_from_path, write_report_to};
use breakdown::parallel_processing::{process_scripts_parallel, write_run_stats, BatchConfig};
use breakdown::reader::read_script_async;
use breakdown::{MentionMatching, ParserConfig, ScriptParser};

#[derive(Parser, Debug)]
#[command(name = "breakdown")]
#[command(about = "Screenplay breakdown: scenes, characters and page estimates from script text")]
#[command(version)]
struct Args {
    /// Script file (.pdf, .txt, .fountain) or directory to scan for scripts
    input: PathBuf,

    /// Document title for a single script (default: file stem)
    #[arg(long)]
    title: Option<String>,

    /// Write the single-script report here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Regenerate reports that already exist
    #[arg(long)]
    overwrite_all: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path for directory runs
    #[arg(long, default_value = "run_stats.json")]
    stats_out: PathBuf,

    /// Scripts processed concurrently (default: CPU count)
    #[arg(long)]
    jobs: Option<usize>,

    /// Match character names in action text regardless of case
    #[arg(long)]
    case_insensitive_mentions: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: JSON logs go to stderr so stdout can carry the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    if !args.input.exists() {
        anyhow::bail!("Input path does not exist: {}", args.input.display());
    }

    let mentions = if args.case_insensitive_mentions {
        MentionMatching::CaseInsensitive
    } else {
        MentionMatching::CaseSensitive
    };
    let parser = ScriptParser::new(ParserConfig::default().with_mentions(mentions))?;

    if args.input.is_dir() {
        run_directory(&args, Arc::new(parser)).await
    } else {
        run_single(&args, &parser).await
    }
}

async fn run_single(args: &Args, parser: &ScriptParser) -> Result<()> {
    let text = read_script_async(&args.input)
        .await
        .with_context(|| format!("Failed to load script {}", args.input.display()))?;
    let title = args
        .title
        .clone()
        .unwrap_or_else(|| title_from_path(&args.input));

    let document = parser.parse(&text, &title);

    match &args.out {
        Some(out) => {
            write_report_to(out, &document).await?;
            info!("Wrote report to {}", out.display());
        }
        None => println!("{}", render_report(&document)?),
    }
    Ok(())
}

async fn run_directory(args: &Args, parser: Arc<ScriptParser>) -> Result<()> {
    let discovery_config = DiscoveryConfig {
        fail_fast: args.fail_fast,
    };

    info!("Starting script discovery in: {}", args.input.display());
    let discovered = discovery::collect_discovered_files(&args.input, discovery_config).await?;

    let (valid, invalid): (Vec<_>, Vec<_>) = discovered.into_iter().partition(|f| f.is_valid());
    for file in &invalid {
        if let Some(error) = &file.error {
            info!("Issue with {}: {}", file.path.display(), error);
        }
    }

    let scripts: Vec<PathBuf> = valid.into_iter().map(|f| f.path).collect();
    let batch_config = BatchConfig {
        max_concurrent: args.jobs.unwrap_or_else(num_cpus::get),
        overwrite_all: args.overwrite_all,
        fail_fast: args.fail_fast,
        show_progress: !args.no_progress,
    };

    let run = process_scripts_parallel(&scripts, parser, &batch_config).await?;
    write_run_stats(&args.stats_out, &run).await?;

    print_summary(&args.stats_out, run.files_processed, run.files_skipped, run.files_failed);
    Ok(())
}

fn print_summary(stats_out: &Path, processed: u64, skipped: u64, failed: u64) {
    println!("breakdown v{} - run complete", env!("CARGO_PKG_VERSION"));
    println!("  Processed: {processed}");
    println!("  Skipped:   {skipped}");
    if failed > 0 {
        println!("  Failed:    {failed}");
    }
    println!("  Stats:     {}", stats_out.display());
}

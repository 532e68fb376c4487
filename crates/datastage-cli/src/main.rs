use clap::Parser;
use datastage_core::logger::ActivationLog;
use datastage_core::materialize::{materialize, MaterializeSummary};
use datastage_core::MaterializeOptions;
use eyre::{Context, Result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datastage")]
#[command(about = "Stage a writable copy of a shared dataset into the working directory")]
struct Cli {
    /// Read-only dataset root to copy from
    #[arg(long, default_value = "/data")]
    source: PathBuf,
    /// Directory to materialize, resolved against the current working directory
    #[arg(long, default_value = "data")]
    target: PathBuf,
    /// Evaluate copy decisions without writing anything
    #[arg(long)]
    dry_run: bool,
    /// Suppress informational messages (errors still print)
    #[arg(long, short = 'q')]
    quiet: bool,
}

/// Console-backed activation log: info to stdout, errors to stderr.
struct ConsoleLog {
    quiet: bool,
}

impl ActivationLog for ConsoleLog {
    fn info(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    fn error(&self, message: &str) {
        eprintln!("[error] {message}");
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log = ConsoleLog { quiet: cli.quiet };
    let options = MaterializeOptions {
        dry_run: cli.dry_run,
        ..Default::default()
    };

    let summary = materialize(&cli.source, &cli.target, &options, &log).with_context(|| {
        format!(
            "failed to materialize {} from {}",
            cli.target.display(),
            cli.source.display()
        )
    })?;

    if summary.source_missing {
        // Already reported through the log; signal failure to the caller.
        std::process::exit(1);
    }

    if !cli.quiet {
        print_summary(cli.dry_run, &summary);
    }

    Ok(())
}

fn print_summary(dry_run: bool, summary: &MaterializeSummary) {
    println!(
        "Materialize{} complete: {} file(s) copied, {} skipped, {} in {:.2?}",
        if dry_run { " (dry run)" } else { "" },
        summary.copied_files,
        summary.skipped_files,
        format_bytes(summary.total_bytes),
        summary.duration
    );
    if summary.dirs_created > 0 {
        println!("• Created {} director(ies)", summary.dirs_created);
    }
    if summary.removed_symlink {
        println!("• Replaced a stale symlink at the target");
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} {}", UNITS[unit])
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

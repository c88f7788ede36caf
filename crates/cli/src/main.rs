#![forbid(unsafe_code)]

mod config;

use clap::Parser;
use fixmeta_patch::{EntryStatus, RunMode, run};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_DRIFT: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "fixmetadata")]
#[command(version)]
#[command(about = "Write program addresses into generated Anchor IDL metadata")]
#[command(
    after_help = "Default targets:\n  target/idl/{udf_solana,photon_mock,price_consumer}.json\n\nIDL directory lookup (when neither --idl-dir nor FIXMETA_IDL_DIR is set):\n  The current directory and then each parent is searched for Anchor.toml.\n  The nearest directory containing it is used as the root, so running from a\n  subdirectory patches the workspace's target/idl, not ./target/idl.\n  Without any Anchor.toml, ./target/idl is used.\n\nManifest entries with `idl:` may omit `address` for udf_solana, photon_mock\nand price_consumer.\n\nEnvironment:\n  RUST_LOG          Log filter (default: info)"
)]
struct Cli {
    /// Directory holding the generated IDL files.
    #[arg(long, env = "FIXMETA_IDL_DIR", value_name = "DIR")]
    idl_dir: Option<PathBuf>,
    /// YAML or JSON manifest replacing the built-in target table.
    #[arg(long, env = "FIXMETA_TARGETS", value_name = "FILE")]
    targets: Option<PathBuf>,
    /// Verify metadata without writing; exits 3 when any IDL drifted.
    #[arg(long, default_value_t = false)]
    check: bool,
    /// Emit logs as JSON lines.
    #[arg(long, env = "FIXMETA_LOG_JSON", default_value_t = false)]
    log_json: bool,
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let cfg = match config::resolve(
        &cwd,
        cli.idl_dir.as_deref(),
        cli.targets.as_deref(),
        cli.check,
    ) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };
    info!(
        mode = cfg.mode.as_str(),
        targets = cfg.targets.len(),
        "metadata run starting"
    );

    let report = match run(&cfg.targets, cfg.mode) {
        Ok(report) => report,
        Err(e) => {
            error!(path = %e.path().display(), step = e.step().as_str(), "metadata run aborted");
            eprintln!("{e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    if report.mode == RunMode::Check {
        let drifted = report.drifted();
        if !drifted.is_empty() {
            for entry in &drifted {
                warn!(path = %entry.path.display(), expected = %entry.address, "idl metadata drifted");
                eprintln!("drifted: {}", entry.path.display());
            }
            return ExitCode::from(EXIT_DRIFT);
        }
    }

    for entry in &report.entries {
        let status = match entry.status {
            EntryStatus::Written { changed: true } => "patched",
            EntryStatus::Written { changed: false } => "unchanged",
            EntryStatus::InSync => "in sync",
            EntryStatus::Drifted => "drifted",
        };
        println!("{status}: {}", entry.path.display());
    }
    ExitCode::SUCCESS
}

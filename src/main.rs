use std::io;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fimtdd::evaluation::CurveFormat;
use fimtdd::ui::cli::args::{Cli, Command};
use fimtdd::ui::cli::status::StatusLine;
use fimtdd::ui::types::build::build_prequential;
use fimtdd::ui::types::choices::TaskChoice;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Schema(args) => {
            println!("{}", args.render()?);
            Ok(())
        }
        Command::Run(args) => run(args.into_task_choice()?),
    }
}

fn run(task: TaskChoice) -> Result<()> {
    let TaskChoice::EvaluatePrequential(params) = task;
    let status = StatusLine {
        max_instances: params.max_instances,
        max_seconds: params.max_seconds,
    };
    let banner = StatusLine::banner(params.sample_frequency, params.mem_check_frequency);
    let dump = params
        .dump_file
        .clone()
        .filter(|path| !path.as_os_str().is_empty())
        .map(|path| (path, CurveFormat::from(params.dump_format)));

    let (tx, rx) = mpsc::channel();
    let mut runner = build_prequential(params)?.with_progress(tx);
    let painter = status.spawn(rx, banner, Duration::from_millis(150));

    let outcome = runner.run().context("prequential run failed");
    let curve = runner.curve().clone();
    drop(runner);
    let _ = painter.join();
    outcome?;

    if let Some((path, format)) = dump {
        curve
            .export(&path, format)
            .with_context(|| format!("cannot write learning curve to {}", path.display()))?;
        info!(path = %path.display(), points = curve.len(), "learning curve written");
    }
    Ok(())
}

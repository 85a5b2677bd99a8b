use crate::evaluation::Snapshot;
use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const MAGENTA: &str = "\x1b[35m";
const BLUE: &str = "\x1b[34m";
const GREY: &str = "\x1b[90m";
const CLEAR_TO_EOL: &str = "\x1B[K";

const BAR_WIDTH: usize = 15;

/// One-line live view of a prequential run, repainted in place on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusLine {
    pub max_instances: Option<u64>,
    pub max_seconds: Option<u64>,
}

impl StatusLine {
    pub fn banner(sample_frequency: u64, mem_check_frequency: u64) -> Vec<String> {
        let started = chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        vec![
            format!("{BOLD}{CYAN}▶ FIMT-DD prequential run{RESET}"),
            format!(
                "{DIM}sample_freq={sample_frequency}  mem_check_freq={mem_check_frequency}  {started}{RESET}"
            ),
            format!("{GREY}{}{RESET}", "─".repeat(72)),
        ]
    }

    pub fn render(&self, s: &Snapshot) -> String {
        let mut segments = vec![
            format!("{GREEN}{BOLD}seen{RESET} {:>9}", s.instances_seen),
            format!("{CYAN}{BOLD}mae{RESET} {}", metric(s.mae)),
            format!("{MAGENTA}{BOLD}rmse{RESET} {}", metric(s.rmse)),
        ];
        if let Some(leaves) = s.extras.get("leaves") {
            segments.push(format!("{BLUE}{BOLD}leaves{RESET} {leaves:>5}"));
        }
        if let Some(drifts) = s.extras.get("drifts_detected") {
            segments.push(format!("{DIM}drifts{RESET} {drifts:>4}"));
        }
        segments.push(format!("{DIM}ram_h{RESET} {:>8.6e}", s.ram_hours));
        segments.push(format!("{DIM}t{RESET} {:>7.3}s", s.seconds));

        if let Some(limit) = self.max_instances {
            segments.push(format!(
                "{DIM}[inst]{RESET} {}",
                progress_bar(s.instances_seen as f64, limit as f64)
            ));
        }
        if let Some(limit) = self.max_seconds {
            segments.push(format!(
                "{DIM}[time]{RESET} {}",
                progress_bar(s.seconds, limit as f64)
            ));
        }
        segments.join("  ")
    }

    /// Prints `banner`, then repaints the latest snapshot every `tick` until
    /// the sender hangs up, ending with the final snapshot on its own line.
    pub fn spawn(self, rx: Receiver<Snapshot>, banner: Vec<String>, tick: Duration) -> JoinHandle<()> {
        thread::spawn(move || {
            let mut out = io::stdout();
            for line in &banner {
                let _ = writeln!(out, "{line}");
            }
            let _ = writeln!(out);

            let mut latest: Option<Snapshot> = None;
            let mut painted = Instant::now();
            loop {
                match rx.recv_timeout(tick) {
                    Ok(s) => latest = Some(s),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
                if painted.elapsed() >= tick {
                    if let Some(s) = &latest {
                        let _ = write!(out, "\r{}{CLEAR_TO_EOL}", self.render(s));
                        let _ = out.flush();
                    }
                    painted = Instant::now();
                }
            }
            if let Some(s) = &latest {
                let _ = writeln!(out, "\r{}{CLEAR_TO_EOL}", self.render(s));
                let _ = out.flush();
            }
        })
    }
}

fn metric(x: f64) -> String {
    if x.is_nan() {
        format!("{DIM}   NaN{RESET}")
    } else {
        format!("{x:>10.6}")
    }
}

/// Empty when there is no positive finite limit.
fn progress_bar(current: f64, total: f64) -> String {
    if !(total.is_finite() && total > 0.0) {
        return String::new();
    }
    let ratio = (current / total).clamp(0.0, 1.0);
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        ratio * 100.0
    )
}

//! Interactive session runner: wires the task engine to stdin/stdout and
//! exports the ledger tables as CSV on the way out.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pasat_core::{Outcome, TaskObserver, answer_domain};
use pasat_engine::{PacedTask, TaskConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::AsyncBufReadExt;
use tracing::warn;

use crate::Args;

/// Prints each stimulus and score as the session runs.
struct ConsoleObserver {
    quiet: bool,
}

impl TaskObserver for ConsoleObserver {
    fn present_stimulus(&self, value: u32) {
        if !self.quiet {
            println!("{value}");
        }
    }

    fn trial_scored(&self, outcome: Outcome, isi: Duration) {
        if !self.quiet {
            println!("  [{outcome}, next interval {} ms]", isi.as_millis());
        }
    }
}

pub async fn run(args: Args) -> Result<()> {
    let config = TaskConfig {
        adjust_window: args.window,
        isi_step: Duration::from_millis(args.step),
        min_isi: Duration::from_millis(args.floor),
        ..TaskConfig::default()
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let observer = ConsoleObserver { quiet: args.quiet };
    let task = PacedTask::with_rng(config.clone(), observer, rng);

    if !args.quiet {
        let domain = answer_domain(&config.alphabet);
        if let (Some(low), Some(high)) = (domain.first(), domain.last()) {
            println!(
                "Add each number to the one before it and type the sum ({low}-{high}), \
                 then Enter. `q` stops the session."
            );
        }
    }

    task.start(
        Duration::from_millis(args.isi),
        args.delay.map(Duration::from_millis),
    )?;

    let deadline = async {
        if args.duration == 0 {
            std::future::pending::<()>().await
        } else {
            tokio::time::sleep(Duration::from_secs(args.duration)).await
        }
    };
    tokio::pin!(deadline);

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            () = &mut deadline => break,
            signal = tokio::signal::ctrl_c() => {
                signal.context("listening for Ctrl-C")?;
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("q") {
                    break;
                }
                match line.parse::<u32>() {
                    Ok(answer) => task.submit_answer(answer),
                    Err(_) => warn!(input = line, "not a number, ignored"),
                }
            }
        }
    }
    task.stop();

    let sessions = task.aggregate_table(stamp)?;
    if sessions.len() > 1 {
        println!();
        print_table(&sessions);
    } else {
        println!("No completed sessions.");
    }

    if let Some(path) = &args.events_csv {
        write_csv(path, &task.events_table(stamp))?;
        println!("Events written to {}", path.display());
    }
    if let Some(path) = &args.sessions_csv {
        write_csv(path, &sessions)?;
        println!("Session summaries written to {}", path.display());
    }

    Ok(())
}

fn stamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Column-aligned table print for the terminal.
fn print_table(rows: &[Vec<String>]) {
    let columns = rows.first().map_or(0, Vec::len);
    let mut widths = vec![0; columns];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

fn write_csv(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        writeln!(out, "{}", csv_line(row))?;
    }
    out.flush()?;
    Ok(())
}

/// Every cell is quoted; embedded quotes are doubled.
fn csv_line(row: &[String]) -> String {
    let cells: Vec<String> = row
        .iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect();
    cells.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_owned()).collect()
    }

    #[test]
    fn csv_cells_are_quoted() {
        assert_eq!(
            csv_line(&row(&["2026-08-30 10:00:00.000", "3000", "start"])),
            "\"2026-08-30 10:00:00.000\",\"3000\",\"start\""
        );
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(csv_line(&row(&["say \"hi\""])), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn empty_row_renders_empty_line() {
        assert_eq!(csv_line(&[]), "");
    }
}

//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use seedwatch_core::format::{format_bytes, format_eta};
use seedwatch_core::{CapabilityReport, Job};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_jobs(jobs: &[Job], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(jobs)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            if jobs.is_empty() {
                println!("no jobs");
                return Ok(());
            }
            println!(
                "{:<14} {:<12} {:>7} {:>12} {:>12} {:>8} {:>8} SIZE",
                "ID", "STATUS", "PROG", "DOWN", "UP", "ETA", "PEERS"
            );
            for job in jobs {
                println!(
                    "{:<14} {:<12} {:>7} {:>12} {:>12} {:>8} {:>8} {}/{}",
                    job.id,
                    job.status,
                    format!("{:.1}%", job.progress),
                    format!("{}/s", format_bytes(job.download_speed)),
                    format!("{}/s", format_bytes(job.upload_speed)),
                    format_eta(job.eta),
                    format!("{}/{}", job.seeders, job.leechers),
                    format_bytes(job.downloaded_size),
                    format_bytes(job.total_size)
                );
                if let Some(reason) = job.failure() {
                    println!("  reason: {reason}");
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn render_capability_report(
    report: &CapabilityReport,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(report)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            println!(
                "downloader available: {}",
                if report.has_downloader { "yes" } else { "no" }
            );
            for (tool, present) in &report.checks {
                println!("  {tool}: {}", if *present { "found" } else { "missing" });
            }
            if let Some(recommended) = &report.recommended {
                println!("recommended install: {recommended}");
            }
        }
    }
    Ok(())
}

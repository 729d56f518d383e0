//! Profile command - profile data files and report anomalies.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use sieve::{ExclusionPolicy, Profiler, ProfilerConfig, Report, Section};

pub fn run(
    files: Vec<PathBuf>,
    exclude_config: Option<PathBuf>,
    skip_table: Vec<String>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for file in &files {
        if !file.exists() {
            return Err(format!("File not found: {}", file.display()).into());
        }
    }

    let mut exclusion = match exclude_config {
        Some(path) => ExclusionPolicy::from_json_file(path)?,
        None => ExclusionPolicy::default(),
    };
    for table in skip_table {
        exclusion = exclusion.skip_table(table);
    }

    let profiler = Profiler::with_config(ProfilerConfig {
        exclusion,
        ..ProfilerConfig::default()
    });

    tracing::info!(files = files.len(), "profiling");
    let run = profiler.profile_files(&files)?;

    if let Some(ref path) = output {
        let content = serde_json::to_string_pretty(&run)?;
        fs::write(path, content)?;
        tracing::info!(path = %path.display(), "wrote report");
    }

    if json {
        println!("{}", run.report.to_json_pretty()?);
        return Ok(());
    }

    print_summary(&run.report);

    if let Some(path) = output {
        println!();
        println!(
            "{} {}",
            "Saved to".green().bold(),
            path.display().to_string().white()
        );
    }

    Ok(())
}

fn print_summary(report: &Report) {
    println!("{}", "Tables:".yellow().bold());
    for (name, schema) in report.tables() {
        let flagged = report.findings_for_table(name).count();
        println!(
            "  {} ({} rows, {} findings): {}",
            name.white().bold(),
            schema.row_count,
            flagged,
            schema.column_names().join(", ")
        );
    }

    for section in [Section::Missing, Section::Abnormal, Section::Duplicate] {
        let findings = report.section(section);
        println!();
        println!(
            "{} {}",
            format!("{}:", section.label()).yellow().bold(),
            findings.len().to_string().white()
        );
        for (key, finding) in findings {
            println!(
                "  {:40} {:>6} rows  {}",
                key.label(),
                finding.row_count(),
                key.check.label().dimmed()
            );
        }
    }

    let summary = report.summary();
    println!();
    if report.is_clean() {
        println!("{}", "No issues found - data looks clean!".green());
    } else {
        println!(
            "Found {} findings ({} missing, {} abnormal, {} duplicate) over {} cells",
            (summary.missing_findings + summary.abnormal_findings + summary.duplicate_findings)
                .to_string()
                .white()
                .bold(),
            summary.missing_findings.to_string().red(),
            summary.abnormal_findings.to_string().yellow(),
            summary.duplicate_findings.to_string().blue(),
            summary.highlighted_cells
        );
    }
}

//! Infer command - show per-column inference for a data file.

use std::path::PathBuf;

use colored::Colorize;
use sieve::inference::ColumnInferencer;
use sieve::input::Parser;

pub fn run(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (table, source) = Parser::new().parse_file(&file)?;
    let schema = ColumnInferencer::new().profile_table(&table);

    println!(
        "{} {} ({}, {} rows, {} columns)",
        "Table".cyan().bold(),
        table.name.white().bold(),
        source.format,
        source.row_count,
        source.column_count
    );
    println!();
    println!(
        "  {:24} {:10} {:18} {:8} {}",
        "column".dimmed(),
        "type".dimmed(),
        "pattern".dimmed(),
        "domain".dimmed(),
        "missing".dimmed()
    );

    for column in &schema.columns {
        let pattern = column
            .pattern
            .as_ref()
            .map(|p| format!("{} ({:.0}%)", p.name, p.rate * 100.0))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:24} {:10} {:18} {:8} {}",
            column.name,
            column.semantic_type.label(),
            pattern,
            format!("{:?}", column.domain).to_lowercase(),
            column.missing_count
        );
    }

    Ok(())
}

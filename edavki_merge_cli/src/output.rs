use std::path::PathBuf;

use clap::ValueEnum;
use edavki_merge_lib::rows::format_position;
use edavki_merge_lib::{MergeOutcome, OutputPaths, SecurityMerge};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Table,
    Json,
}

#[derive(Tabled, Serialize)]
struct SecurityRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Primary rows")]
    #[serde(rename = "Primary rows")]
    primary_rows: usize,
    #[tabled(rename = "Secondary rows")]
    #[serde(rename = "Secondary rows")]
    secondary_rows: usize,
    #[tabled(rename = "Merged rows")]
    #[serde(rename = "Merged rows")]
    merged_rows: usize,
    #[tabled(rename = "Final position")]
    #[serde(rename = "Final position")]
    final_position: String,
}

fn build_security_rows(securities: &[SecurityMerge]) -> Vec<SecurityRow> {
    securities
        .iter()
        .map(|s| SecurityRow {
            code: s.code.clone(),
            primary_rows: s.primary_rows,
            secondary_rows: s.secondary_rows,
            merged_rows: s.merged_rows(),
            final_position: format_position(s.final_position)
                .unwrap_or_else(|_| s.final_position.to_string()),
        })
        .collect()
}

/// What a run produced, as printed on stdout.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub merged_file: PathBuf,
    pub info_file: PathBuf,
    pub errors_file: PathBuf,
    pub matched: Vec<String>,
    pub unmatched: Vec<String>,
    pub securities: Vec<SecurityMerge>,
}

impl RunSummary {
    pub fn new(paths: &OutputPaths, outcome: &MergeOutcome) -> Self {
        Self {
            merged_file: paths.merged.clone(),
            info_file: paths.info.clone(),
            errors_file: paths.errors.clone(),
            matched: outcome.report.matched().to_vec(),
            unmatched: outcome.report.unmatched().to_vec(),
            securities: outcome.securities.clone(),
        }
    }
}

fn summary_text(summary: &RunSummary) -> String {
    format!(
        "Done merging.\nMerged XML: {}\nInfo: {}\nErrors: {}\n",
        summary.merged_file.display(),
        summary.info_file.display(),
        summary.errors_file.display(),
    )
}

pub fn print_summary(summary: &RunSummary, format: &OutputFormat) {
    match format {
        OutputFormat::Text => print!("{}", summary_text(summary)),
        OutputFormat::Table => {
            print!("{}", summary_text(summary));
            print_securities_table(&summary.securities);
        }
        OutputFormat::Json => print_json(summary),
    }
}

pub fn print_securities_table(securities: &[SecurityMerge]) {
    println!("{}", Table::new(build_security_rows(securities)));
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

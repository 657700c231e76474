mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use edavki_merge_lib::{merge_documents, write_outputs, Document, MergeConfig, OutputPaths};

use crate::output::{print_summary, OutputFormat, RunSummary};

#[derive(Parser)]
#[command(name = "edavki-merge")]
#[command(about = "Merge two broker KDVP reports into one eDavki submission")]
struct Cli {
    /// Primary report (eToro); its structure is kept in the output
    primary: PathBuf,

    /// Secondary report whose securities are merged into the primary one
    secondary: PathBuf,

    /// Output directory [default: output/ next to the primary report]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// TOML file overriding namespaces, edp tags and the broker label
    #[arg(long)]
    config: Option<PathBuf>,

    /// Summary format: text, table or json
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("edavki_merge_lib=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MergeConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MergeConfig::default(),
    };

    let mut primary = Document::from_file(&cli.primary)
        .with_context(|| format!("Failed to read primary report {}", cli.primary.display()))?;
    let mut secondary = Document::from_file(&cli.secondary).with_context(|| {
        format!(
            "Failed to read secondary report {}",
            cli.secondary.display()
        )
    })?;

    let outcome =
        merge_documents(&mut primary, &mut secondary, &config).context("Failed to merge reports")?;

    let paths = match cli.output_dir {
        Some(dir) => OutputPaths::in_dir(dir),
        None => OutputPaths::beside(&cli.primary),
    };
    paths
        .create_dir()
        .context("Failed to create output directory")?;
    write_outputs(
        &paths,
        &primary,
        &outcome.report,
        &config.bindings(),
        &config.primary_label,
    )
    .context("Failed to write merge outputs")?;

    print_summary(&RunSummary::new(&paths, &outcome), &cli.format);

    Ok(())
}

//! xltable CLI - turn JSON records into worksheet table definitions

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use xltable::config::{records_from_path, records_from_reader};
use xltable::{Accessor, CellAddress, ColumnKind, TableConfig};

#[derive(Parser)]
#[command(name = "xltable")]
#[command(
    author,
    version,
    about = "Flatten nested JSON records into worksheet table definitions"
)]
struct Cli {
    /// Log more detail to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve records against a table configuration and print the definition as JSON
    Build {
        /// Table configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Records file holding a JSON array ("-" for stdin)
        #[arg(short, long)]
        records: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a table configuration and list its columns
    Check {
        /// Table configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            config,
            records,
            output,
            pretty,
        } => build(&config, &records, output.as_deref(), pretty),
        Commands::Check { config } => check(&config),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<TableConfig> {
    TableConfig::from_path(path)
        .with_context(|| format!("Failed to load configuration '{}'", path.display()))
}

fn build(
    config_path: &Path,
    records_path: &Path,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let config = load_config(config_path)?;

    let records = if records_path == Path::new("-") {
        records_from_reader(io::stdin().lock()).context("Failed to read records from stdin")?
    } else {
        records_from_path(records_path)
            .with_context(|| format!("Failed to read records '{}'", records_path.display()))?
    };
    tracing::debug!(count = records.len(), "loaded records");

    let table = config.build(&records).context("Failed to build table")?;
    let definition = table.definition();

    let mut json = if pretty {
        serde_json::to_string_pretty(&definition)
    } else {
        serde_json::to_string(&definition)
    }
    .context("Failed to serialize table definition")?;
    json.push('\n');

    if let Some(output_path) = output {
        std::fs::write(output_path, &json)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!(
            "Wrote {} rows x {} columns ({}) to '{}'",
            table.row_count(),
            table.column_count(),
            table.range(),
            output_path.display()
        );
    } else {
        io::stdout()
            .write_all(json.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

fn check(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let spec = config.column_spec().context("Invalid column specification")?;
    let options = config.table_options().context("Invalid table options")?;
    let anchor = options.anchor();

    println!("Table: {}", options.name().unwrap_or("(unnamed)"));
    println!("Anchor: {}", anchor);
    println!("Total row: {}", if options.total_row() { "yes" } else { "no" });
    println!("Columns: {}", spec.len());

    for (index, column) in spec.columns().iter().enumerate() {
        let cell = anchor
            .offset(0, index as u64)
            .with_context(|| format!("Column '{}' falls outside the worksheet", column.name))?;
        let letter = CellAddress::column_to_letters(cell.col);
        let source = match &column.kind {
            ColumnKind::Value(Accessor::Path(path)) => format!("path {}", path),
            ColumnKind::Value(Accessor::Function(_)) => "function".to_string(),
            ColumnKind::Formula { template, .. } => format!("formula {}", template),
        };
        println!("  {}\t{}\t{}", letter, column.name, source);
    }

    Ok(())
}

use anyhow::Result;
use arrow::util::pretty::pretty_format_batches;
use clap::Parser;
use faculty_salaries::{config::PipelineConfig, pipeline};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "faculty_salaries", about = "Process faculty salary data")]
struct Cli {
    /// Input file path (PDF or text)
    #[arg(long = "input-data", alias = "input_data")]
    input_data: Option<PathBuf>,

    /// Output text file path (if processing PDF)
    #[arg(long = "output-txt", alias = "output_txt")]
    output_txt: Option<PathBuf>,

    /// Path to estimated gender CSV file
    #[arg(long = "gender-csv", alias = "gender_csv")]
    gender_csv: Option<PathBuf>,

    /// Path to department class map (JSON or YAML)
    #[arg(long = "dept-class-json", alias = "dept_class_json")]
    dept_class_json: Option<PathBuf>,

    /// Directory for the CSV/Feather output (default: next to the input)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// YAML file with any of the settings above; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write a Parquet file
    #[arg(long)]
    parquet: bool,

    /// Skip the Feather file
    #[arg(long)]
    no_feather: bool,

    /// Rows to print after the run
    #[arg(long, default_value_t = 5)]
    preview: usize,
}

impl Cli {
    fn into_config(self) -> Result<(PipelineConfig, usize)> {
        let base = match &self.config {
            Some(path) => PipelineConfig::from_yaml_file(path)?,
            None => PipelineConfig::default(),
        };
        let overrides = PipelineConfig {
            input: self.input_data,
            output_txt: self.output_txt,
            gender_csv: self.gender_csv,
            dept_class_map: self.dept_class_json,
            output_dir: self.output_dir,
            ..Default::default()
        };
        let mut config = base.merge_paths(overrides);
        if self.parquet {
            config.formats.parquet = true;
        }
        if self.no_feather {
            config.formats.feather = false;
        }
        Ok((config, self.preview))
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) configure ────────────────────────────────────────────────
    let (config, preview) = Cli::parse().into_config()?;
    info!(?config, "startup");

    // ─── 3) run ──────────────────────────────────────────────────────
    let report = pipeline::run(&config)?;
    for path in &report.outputs {
        println!("wrote {}", path.display());
    }

    // ─── 4) preview + column info ────────────────────────────────────
    if preview > 0 {
        let batch = report.table.to_record_batch()?;
        let head = batch.slice(0, preview.min(batch.num_rows()));
        println!("{}", pretty_format_batches(&[head])?);
    }

    println!(
        "{} rows from {} blocks, {} columns",
        report.table.len(),
        report.extracted,
        report.table.columns().len()
    );
    for (i, col) in report.table.column_summaries().iter().enumerate() {
        println!(
            " {:>2}  {:<18} {:>6} non-null  {}",
            i, col.name, col.non_null, col.kind
        );
    }

    Ok(())
}

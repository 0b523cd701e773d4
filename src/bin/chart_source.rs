use {
    anyhow::{Context, Result},
    chrono::{DateTime, Utc},
    clap::Parser,
    std::path::PathBuf,
    tracing::{error, info},
    vaccination_chart::{Collector, Config, Processor, write_chart},
};

#[derive(Parser)]
#[clap(
    name = "chart-source",
    about = "Aggregate vaccination appointment probes into chart data"
)]
struct Args {
    /// Directory holding the probe snapshot JSON files
    input_dir: PathBuf,

    /// Path of the chart JSON to write
    output: PathBuf,

    /// Config file path
    #[clap(long, default_value = "chart.toml")]
    config: String,

    /// Override the config's insurance filter
    #[clap(long)]
    public_only: Option<bool>,

    /// Reference instant (RFC 3339) for the recent window, defaults to now
    #[clap(long)]
    now: Option<DateTime<Utc>>,

    /// Log level
    #[clap(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup tracing
    let filter = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config or use defaults
    let config = match Config::load(&args.config) {
        Ok(cfg) => {
            info!("Loaded config from {}", args.config);
            cfg
        }
        Err(_) => {
            info!("Using default config");
            Config::default()
        }
    };

    let aggregation = config.aggregation;
    let public_only = args.public_only.unwrap_or(aggregation.public_only);
    let now = args.now.unwrap_or_else(Utc::now);

    info!("Input: {}", args.input_dir.display());
    info!("Output: {}", args.output.display());
    info!(
        "Timezone: {}, recent window: {:?}, public only: {}",
        aggregation.timezone, aggregation.recent_window, public_only
    );

    if let Err(e) = run(&args, &aggregation, public_only, now) {
        error!("Chart generation failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run(
    args: &Args,
    aggregation: &vaccination_chart::AggregationConfig,
    public_only: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let batches = Collector::new(&args.input_dir).run()?;

    let processor = Processor::new(
        aggregation.calendar(),
        aggregation.recent_window,
        public_only,
    );
    let chart = processor.process(&batches, now)?;

    write_chart(&args.output, &chart)
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        "Wrote {} current aggregates and {} days to {}",
        chart.current.len(),
        chart.overall.len(),
        args.output.display()
    );

    Ok(())
}

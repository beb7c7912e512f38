use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;
use snaplytics::inference::{
    available_fields, field_role, numeric_candidates, typed_numeric_fields,
};
use snaplytics::{
    csv_reader, ingest, AnalysisOptions, ChartType, DashboardState, Dataset, SingleFieldMode,
};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    /// JSON array of objects (or a single object)
    Json,
    /// CSV with a header row
    Csv,
    /// Free text with JSON somewhere inside (code fences, prose)
    Raw,
    /// One stored content item ({"parsed_rows": [...], "model_raw": "..."})
    Content,
    /// Selected content items, each carrying a "rows" array
    Selection,
}

#[derive(Parser, Debug)]
#[command(name = "snaplytics")]
#[command(
    about = "Infer field roles and derive chartable datasets from tabular data",
    long_about = None
)]
struct Args {
    /// Input file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Input format
    #[arg(short, long, value_enum, default_value = "json")]
    format: InputFormat,

    /// X axis field; pass "" to clear the default
    #[arg(short = 'x', long = "x")]
    x_field: Option<String>,

    /// Y axis field; pass "" to clear the default
    #[arg(short = 'y', long = "y")]
    y_field: Option<String>,

    /// Do not pick default axes from the data
    #[arg(long)]
    no_defaults: bool,

    /// Chart type used when both or neither axis is set (line, bar, scatter, pie)
    #[arg(long, default_value = "line")]
    chart: ChartType,

    /// Single-field analysis (frequency, histogram, top10, bottom10)
    #[arg(long, default_value = "frequency")]
    mode: SingleFieldMode,

    /// Convert plain numeric strings ("42", "-3.5") to numbers first
    #[arg(long)]
    coerce: bool,

    /// Comma-separated fields to offer instead of the dataset's own
    #[arg(long)]
    fields: Option<String>,

    /// Print the available fields and their roles instead of a projection
    #[arg(long)]
    describe: bool,

    /// JSON file with analysis options ({"bins": 10, "top_k": 10})
    #[arg(long)]
    config: Option<PathBuf>,

    /// Histogram bin count (overrides config)
    #[arg(long)]
    bins: Option<usize>,

    /// Rows kept by top10/bottom10 (overrides config)
    #[arg(long)]
    top_k: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = load_options(&args)?;

    let mut dataset = read_dataset(&args).context("Failed to read input data")?;
    if args.coerce {
        dataset.coerce_numbers();
    }
    info!(rows = dataset.len(), "Loaded dataset");

    let output = if args.describe {
        describe(&dataset, args.fields.as_deref().unwrap_or_default())
    } else {
        let mut state = DashboardState::new(options);
        if args.no_defaults {
            state.dataset = dataset;
        } else {
            state.load(dataset);
        }
        if let Some(x) = &args.x_field {
            state.set_x(x.as_str());
        }
        if let Some(y) = &args.y_field {
            state.set_y(y.as_str());
        }
        state.set_chart_type(args.chart);
        state.set_single_field_mode(args.mode);
        debug!(axes = ?state.axes, single = state.single_field_selected(), "Dashboard state");

        serde_json::to_value(state.project()).context("Failed to serialize projection")?
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("Failed to serialize output")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", rendered).context("Failed to write output to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_options(args: &Args) -> Result<AnalysisOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid config file '{}'", path.display()))?
        }
        None => AnalysisOptions::default(),
    };

    if let Some(bins) = args.bins {
        options.bins = bins;
    }
    if let Some(top_k) = args.top_k {
        options.top_k = top_k;
    }
    Ok(options)
}

fn open_input(args: &Args) -> Result<Box<dyn Read>> {
    match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open '{}'", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn read_dataset(args: &Args) -> Result<Dataset> {
    let reader = open_input(args)?;

    let dataset = match args.format {
        InputFormat::Csv => csv_reader::read_csv(reader).context("Invalid CSV input")?,
        InputFormat::Json => {
            let value = ingest::read_json(reader).context("Invalid JSON input")?;
            Dataset::from_json(&value)?
        }
        InputFormat::Raw => {
            let text = ingest::read_text(reader).context("Failed to read raw content")?;
            ingest::parse_raw_content(&text)?
        }
        InputFormat::Content => {
            let content = ingest::read_json(reader).context("Invalid JSON input")?;
            ingest::rows_from_content(&content)?
        }
        InputFormat::Selection => {
            let selection = ingest::read_json(reader).context("Invalid JSON input")?;
            ingest::merge_selection(&selection)?
        }
    };

    Ok(dataset)
}

fn describe(dataset: &Dataset, requested: &str) -> serde_json::Value {
    let candidates = numeric_candidates(dataset);
    let fields: Vec<serde_json::Value> = available_fields(requested, dataset)
        .into_iter()
        .map(|field| {
            json!({
                "field": field,
                "role": field_role(dataset, &field),
                "hasNumericValues": candidates.contains(&field),
            })
        })
        .collect();

    json!({
        "rows": dataset.len(),
        "fields": fields,
        "typedNumericFields": typed_numeric_fields(dataset),
    })
}

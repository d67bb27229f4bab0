//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_trade_exporter::CsvTradeExporter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::http_adapter::HttpBacktestAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::chart::{ChartSlot, build_chart_data};
use crate::domain::comparison::run_comparison;
use crate::domain::config_validation::{ClientConfig, validate_base_url, validate_client_config};
use crate::domain::error::CompareError;
use crate::domain::preset::{builtin_presets, find_preset};
use crate::domain::presentation::{ComparisonView, NO_TRADES_MESSAGE};
use crate::domain::request::{BacktestRequest, normalize_symbol, parse_date};
use crate::domain::series::ComparisonResult;
use crate::domain::timeline::build_timeline;
use crate::logging::init_tracing;
use crate::ports::backtest_port::BacktestPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "samcompare",
    about = "Compare a strategy backtest against a buy-and-hold benchmark"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a strategy backtest and a benchmark, then write the comparison report
    Compare(CompareArgs),
    /// List the built-in strategy presets
    Presets,
    /// List the indicators the backend supports
    Indicators {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct CompareArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Ticker to backtest
    #[arg(long)]
    pub symbol: Option<String>,
    /// Preset key, e.g. GOLDEN_CROSS
    #[arg(short, long)]
    pub strategy: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub end: Option<String>,
    /// Benchmark ticker, defaults to SPY
    #[arg(long)]
    pub benchmark: Option<String>,
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub trades_csv: Option<PathBuf>,
}

/// Everything one comparison cycle needs, after config and flags are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareRun {
    pub request: BacktestRequest,
    pub benchmark_symbol: String,
    pub base_url: String,
    pub timeout: Duration,
    pub report_output: PathBuf,
    pub trades_csv: Option<PathBuf>,
}

pub struct CompareOutcome {
    pub comparison: ComparisonResult,
    pub view: ComparisonView,
    pub report_path: PathBuf,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Compare(args) => run_compare(&args),
        Command::Presets => run_presets(),
        Command::Indicators { config, base_url } => {
            run_indicators(config.as_ref(), base_url.as_deref())
        }
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig, CompareError> {
    match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let adapter = FileConfigAdapter::from_file(path)?;
            validate_client_config(&adapter)
        }
        None => validate_client_config(&FileConfigAdapter::empty()),
    }
}

/// Merge flags over config values. Flags win.
pub fn resolve_compare_run(
    config: &ClientConfig,
    args: &CompareArgs,
    today: NaiveDate,
) -> Result<CompareRun, CompareError> {
    let symbol = match &args.symbol {
        Some(s) => s.as_str(),
        None => config.require_symbol()?,
    };
    let preset = find_preset(args.strategy.as_deref().unwrap_or(&config.strategy))?;

    let start = match &args.start {
        Some(raw) => parse_date("start", raw)?,
        None => config.start_date.ok_or_else(|| CompareError::ConfigMissing {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
        })?,
    };
    let end = match &args.end {
        Some(raw) => parse_date("end", raw)?,
        None => config.end_date.unwrap_or(today),
    };

    let benchmark_symbol = match &args.benchmark {
        Some(raw) => normalize_symbol(raw)?,
        None => config.benchmark_symbol.clone(),
    };

    let base_url = match &args.base_url {
        Some(url) => validate_base_url(url)?,
        None => config.base_url.clone(),
    };

    Ok(CompareRun {
        request: BacktestRequest::new(symbol, start, end, &preset)?,
        benchmark_symbol,
        base_url,
        timeout: Duration::from_secs(config.timeout_secs),
        report_output: args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.report_output)),
        trades_csv: args
            .trades_csv
            .clone()
            .or_else(|| config.trades_csv.as_ref().map(PathBuf::from)),
    })
}

/// One full cycle: fetch, align, chart, format, write.
pub async fn run_compare_pipeline(
    port: &dyn BacktestPort,
    report: &dyn ReportPort,
    run: &CompareRun,
) -> Result<CompareOutcome, CompareError> {
    let comparison = run_comparison(port, &run.benchmark_symbol, &run.request).await?;

    let timeline = build_timeline(
        &comparison.strategy.equity,
        comparison.benchmark.as_ref().map(|b| &b.equity),
    );
    let chart_data = build_chart_data(&comparison, &timeline);
    let mut chart = ChartSlot::new(SvgChartAdapter::new());
    let svg = chart.replace(&chart_data)?.svg.clone();
    chart.clear();

    let view = ComparisonView::new(&run.request.symbol, &comparison);
    let report_path = run.report_output.display().to_string();
    report.write(&view, &svg, &report_path)?;

    if let Some(csv_path) = &run.trades_csv {
        CsvTradeExporter::new(csv_path).export(&comparison.strategy.trades)?;
    }

    Ok(CompareOutcome {
        comparison,
        view,
        report_path: run.report_output.clone(),
    })
}

fn current_thread_runtime() -> Result<tokio::runtime::Runtime, CompareError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CompareError::Io)
}

fn start_logging(config: &ClientConfig) {
    if let Err(e) = init_tracing(&config.log_level, config.log_format) {
        eprintln!("warning: {e}");
    }
}

fn run_compare(args: &CompareArgs) -> ExitCode {
    match compare(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn compare(args: &CompareArgs) -> Result<(), CompareError> {
    let config = load_config(args.config.as_ref())?;
    start_logging(&config);

    let today = chrono::Local::now().date_naive();
    let run = resolve_compare_run(&config, args, today)?;
    eprintln!(
        "Comparing {} ({}) against {} from {} to {}",
        run.request.symbol,
        run.request.strategy_label,
        run.benchmark_symbol,
        run.request.range.start_str(),
        run.request.range.end_str()
    );

    let port = HttpBacktestAdapter::new(&run.base_url, run.timeout)?;
    let report = HtmlReportAdapter::new();
    let runtime = current_thread_runtime()?;
    let outcome = runtime.block_on(run_compare_pipeline(&port, &report, &run))?;

    print_summary(&outcome);
    Ok(())
}

fn print_summary(outcome: &CompareOutcome) {
    let view = &outcome.view;
    eprintln!("\n=== {} ===", view.strategy_label);
    eprintln!("Backtest Period:  {}", view.period);
    eprintln!("Total Return:     {}", view.strategy.total_return);
    eprintln!("Max Drawdown:     {}", view.strategy.max_drawdown);
    eprintln!("Sharpe Ratio:     {}", view.strategy.sharpe_ratio);

    eprintln!(
        "\n=== {} ===",
        view.benchmark_label.as_deref().unwrap_or("Benchmark")
    );
    eprintln!("Total Return:     {}", view.benchmark.total_return);
    eprintln!("Max Drawdown:     {}", view.benchmark.max_drawdown);
    eprintln!("Sharpe Ratio:     {}", view.benchmark.sharpe_ratio);
    if let Some(note) = &view.benchmark_note {
        eprintln!("warning: {note}");
    }

    if view.has_trades() {
        eprintln!("\nTrades:           {}", view.trades.len());
    } else {
        eprintln!("\n{NO_TRADES_MESSAGE}");
    }
    eprintln!("\nReport written to: {}", outcome.report_path.display());
}

fn run_presets() -> ExitCode {
    for preset in builtin_presets() {
        println!("{:<18} {}", preset.key, preset.label);
        println!("{:<18} {}", "", preset.params);
        println!("{:<18} {}", "", preset.description);
    }
    ExitCode::SUCCESS
}

fn fetch_indicators(
    config_path: Option<&PathBuf>,
    base_url: Option<&str>,
) -> Result<Vec<String>, CompareError> {
    let config = load_config(config_path)?;
    start_logging(&config);
    let url = match base_url {
        Some(url) => validate_base_url(url)?,
        None => config.base_url.clone(),
    };
    let port = HttpBacktestAdapter::new(&url, Duration::from_secs(config.timeout_secs))?;
    current_thread_runtime()?.block_on(port.list_indicators())
}

fn run_indicators(config_path: Option<&PathBuf>, base_url: Option<&str>) -> ExitCode {
    match fetch_indicators(config_path, base_url) {
        Ok(indicators) => {
            for name in &indicators {
                println!("{name}");
            }
            eprintln!("{} indicators available", indicators.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn validate_file(config_path: &Path) -> Result<(ClientConfig, PathBuf), CompareError> {
    let adapter = FileConfigAdapter::from_file(config_path)?;
    let config = validate_client_config(&adapter)?;
    let source = adapter
        .source()
        .map_or_else(|| config_path.to_path_buf(), Path::to_path_buf);
    Ok((config, source))
}

pub fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let (config, source) = match validate_file(config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("  file:       {}", source.display());
    eprintln!("  api:        {} (timeout {}s)", config.base_url, config.timeout_secs);
    eprintln!("  benchmark:  {}", config.benchmark_symbol);
    eprintln!("  strategy:   {}", config.strategy);
    if let Some(symbol) = &config.symbol {
        eprintln!("  symbol:     {symbol}");
    }
    eprintln!("  report:     {}", config.report_output);
    eprintln!("\nConfig is valid");
    ExitCode::SUCCESS
}

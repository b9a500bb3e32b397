// src/main.rs
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use waveform_analyzer::analysis::{
    render_analysis_png, write_report, AnalysisConfig, JsonLinesSource, PlotStyle,
    SignalAnalyzer, SignalLog,
};
/// Estimate rate, dominant frequency, amplitude and waveform shape per channel
/// of a JSON-lines signal log.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON-lines log with `timestamp` (ms) and one field per channel.
    #[arg(default_value = "out2.json")]
    input: PathBuf,
    /// TOML file overriding analysis defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where to write the PNG plot.
    #[arg(long, default_value = "analysis.png")]
    plot: PathBuf,
    /// Skip rendering the PNG plot.
    #[arg(long)]
    no_plot: bool,
    /// Analyse channels on worker threads.
    #[arg(long)]
    parallel: bool,
}
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    config.parallel |= cli.parallel;
    let file = File::open(&cli.input)
        .with_context(|| format!("opening {}", cli.input.display()))?;
    let mut source = JsonLinesSource::new(BufReader::new(file), config.channels.clone());
    let log = SignalLog::collect(&mut source, config.channels.clone())?;
    info!(
        "read {} records from {} ({} lines skipped, {:.3} s)",
        log.len(),
        cli.input.display(),
        source.skipped_lines(),
        log.duration_seconds()
    );
    let analyzer = SignalAnalyzer::new(config);
    if analyzer.config().parallel {
        info!("analysing {} channels in parallel", log.channels().len());
    }
    let reports = analyzer
        .analyze_log(&log)
        .with_context(|| format!("no data found in {}", cli.input.display()))?;
    write_report(&mut io::stdout().lock(), &reports)?;
    if !cli.no_plot {
        let png = render_analysis_png(&reports, &PlotStyle::default())?;
        fs::write(&cli.plot, png)
            .with_context(|| format!("writing {}", cli.plot.display()))?;
        info!("saved plot to {}", cli.plot.display());
    }
    Ok(())
}

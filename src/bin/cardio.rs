//! Cardio CLI - command-line host for the cardioflux pipeline
//!
//! Commands:
//! - analyze: Run the HRV pipeline over a captured recording file
//! - defaults: Print the default pipeline configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cardioflux::{
    analyze_recording, AnalysisResult, PipelineConfig, PipelineError, SamplePoint, SampleSeries,
    ENGINE_VERSION,
};

/// Cardio - offline HRV analysis for captured ECG recordings
#[derive(Parser)]
#[command(name = "cardio")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Compute HRV statistics from a captured ECG recording", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HRV pipeline over a captured recording
    Analyze {
        /// Input recording path (use - for stdin); lines are either
        /// "elapsed_secs,amplitude" or a bare amplitude per line
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (defaults to report on a terminal, json otherwise)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Pipeline configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the nominal sampling rate (Hz)
        #[arg(long)]
        sampling_rate: Option<f64>,

        /// Also write the text report to the configured template path
        #[arg(long)]
        save_report: bool,
    },

    /// Print the default pipeline configuration as JSON
    Defaults,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Compact JSON result envelope
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Human-readable text report
    Report,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CardioCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            format,
            config,
            sampling_rate,
            save_report,
        } => cmd_analyze(
            &input,
            output.as_deref(),
            format,
            config.as_deref(),
            sampling_rate,
            save_report,
        ),
        Commands::Defaults => cmd_defaults(),
    }
}

fn cmd_analyze(
    input: &Path,
    output: Option<&Path>,
    format: Option<OutputFormat>,
    config_path: Option<&Path>,
    sampling_rate: Option<f64>,
    save_report: bool,
) -> Result<(), CardioCliError> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::from_json(&fs::read_to_string(path)?)?,
        None => PipelineConfig::default(),
    };
    if let Some(rate) = sampling_rate {
        config.sampling_rate_hz = rate;
    }

    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let (series, skipped) = parse_recording(&input_data, config.sampling_rate_hz);
    if skipped > 0 {
        eprintln!("warning: skipped {} unparsable line(s)", skipped);
    }

    let result = analyze_recording(&series, &config)?;

    let format = format.unwrap_or_else(|| {
        if output.is_none() && atty::is(atty::Stream::Stdout) {
            OutputFormat::Report
        } else {
            OutputFormat::Json
        }
    });
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(&result)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&result)?,
        OutputFormat::Report => render_report(&result),
    };

    match output {
        Some(path) if path.to_string_lossy() != "-" => fs::write(path, &rendered)?,
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", rendered)?;
        }
    }

    if save_report {
        let report_path = config.output.report_path(result.computed_at);
        if let Some(parent) = Path::new(&report_path).parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&report_path, render_report(&result))?;
        eprintln!("report written to {}", report_path);
    }

    Ok(())
}

fn cmd_defaults() -> Result<(), CardioCliError> {
    println!("{}", PipelineConfig::default().to_json()?);
    Ok(())
}

/// Parse a captured recording: one sample per line, either
/// `elapsed_secs,amplitude` or a bare amplitude (timestamps synthesized from
/// the nominal rate). Unparsable lines are skipped, not fatal.
fn parse_recording(data: &str, sampling_rate_hz: f64) -> (SampleSeries, usize) {
    let mut samples = Vec::new();
    let mut skipped = 0usize;

    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parsed = match line.split_once(',') {
            Some((t, v)) => match (t.trim().parse::<f64>(), v.trim().parse::<f64>()) {
                (Ok(elapsed_secs), Ok(amplitude)) => Some(SamplePoint {
                    elapsed_secs,
                    amplitude,
                }),
                _ => None,
            },
            None => line.parse::<f64>().ok().map(|amplitude| SamplePoint {
                elapsed_secs: if sampling_rate_hz > 0.0 {
                    samples.len() as f64 / sampling_rate_hz
                } else {
                    0.0
                },
                amplitude,
            }),
        };
        match parsed {
            Some(point) => samples.push(point),
            None => skipped += 1,
        }
    }

    (SampleSeries::new(samples), skipped)
}

/// Render a plain-text report. Undefined metrics are shown as `n/a`,
/// never as a number.
fn render_report(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "HRV Analysis Report ({} v{}, run {})\n",
        result.producer.name, result.producer.version, result.producer.run_id
    ));
    out.push_str(&format!("Computed at: {}\n\n", result.computed_at));

    out.push_str("Recording\n");
    out.push_str(&format!("  Samples:        {}\n", result.recording.sample_count));
    out.push_str(&format!(
        "  Duration:       {:.2} s\n",
        result.recording.duration_secs
    ));
    out.push_str(&format!(
        "  Observed rate:  {}\n",
        result
            .recording
            .effective_rate_hz
            .map(|r| format!("{:.2} Hz", r))
            .unwrap_or_else(|| "n/a".to_string())
    ));
    out.push_str(&format!("  Beats detected: {}\n\n", result.peaks.len()));

    out.push_str("HRV Metrics\n");
    out.push_str(&format!(
        "  Mean RR: {}\n",
        fmt_metric(result.metrics.mean_rr_ms, "ms")
    ));
    out.push_str(&format!(
        "  SDNN:    {}\n",
        fmt_metric(result.metrics.sdnn_ms, "ms")
    ));
    out.push_str(&format!(
        "  RMSSD:   {}\n",
        fmt_metric(result.metrics.rmssd_ms, "ms")
    ));
    out.push_str(&format!(
        "  pNN50:   {}\n",
        fmt_metric(result.metrics.pnn50_pct, "%")
    ));
    out.push_str(&format!(
        "  Mean HR: {}\n",
        fmt_metric(result.metrics.mean_hr_bpm, "bpm")
    ));

    if !result.diagnostics.is_empty() {
        out.push_str("\nDiagnostics\n");
        for diag in &result.diagnostics {
            out.push_str(&format!(
                "  [{:?}/{:?}] {}\n",
                diag.stage, diag.code, diag.message
            ));
        }
    }

    out
}

fn fmt_metric(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.2} {}", v, unit),
        None => "n/a".to_string(),
    }
}

enum CardioCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Pipeline(PipelineError),
}

impl From<io::Error> for CardioCliError {
    fn from(e: io::Error) -> Self {
        CardioCliError::Io(e)
    }
}

impl From<serde_json::Error> for CardioCliError {
    fn from(e: serde_json::Error) -> Self {
        CardioCliError::Json(e)
    }
}

impl From<PipelineError> for CardioCliError {
    fn from(e: PipelineError) -> Self {
        CardioCliError::Pipeline(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CardioCliError> for CliError {
    fn from(e: CardioCliError) -> Self {
        match e {
            CardioCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CardioCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check configuration JSON syntax".to_string()),
            },
            CardioCliError::Pipeline(e) => CliError {
                code: match e {
                    PipelineError::InsufficientData { .. } => "INSUFFICIENT_DATA",
                    PipelineError::InvalidSamplingRate(_) => "INVALID_SAMPLING_RATE",
                }
                .to_string(),
                message: e.to_string(),
                hint: Some("Capture a longer recording or fix the configuration".to_string()),
            },
        }
    }
}

//! Command implementations shared by the `accelog` and `sampler` binaries.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use accelog_core::{SamplerConfig, SessionSummary, TextEncoding};
use accelog_dsp::{FilterSpec, FrequencyPoint, RESPONSE_POINTS};
use anyhow::{Context, Result};
use clap::Args;

use crate::config::{capture_window, AppConfig};
use crate::template::ModuleTemplate;

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Serial port the board is attached to (e.g. /dev/ttyACM0, COM4)
    pub port: String,

    /// Output file name without extension; `.csv` is appended
    pub output: String,

    /// Capture window in seconds
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Text encoding of incoming lines (UTF-8, UTF-16, ASCII, GBK, GB2312, Auto)
    #[arg(short, long)]
    pub encoding: Option<TextEncoding>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Recorded session to filter; only the design is produced when omitted
    pub session: Option<PathBuf>,

    /// Number of filter taps
    #[arg(short = 'n', long)]
    pub taps: Option<usize>,

    /// Sample rate of the recording in Hz
    #[arg(short = 's', long)]
    pub sample_rate: Option<f64>,

    /// Cutoff frequency in Hz
    #[arg(short, long)]
    pub cutoff: Option<f64>,

    /// Where to write the coefficient array
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the magnitude response as CSV
    #[arg(short, long)]
    pub response: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Module name, like i2c etc.
    #[arg(short, long)]
    pub module: String,

    /// What the module is about
    #[arg(short, long)]
    pub description: String,

    /// Name shown as author at the top of the module
    #[arg(short, long)]
    pub author: String,

    /// Directory to write the files into
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,
}

pub fn collect(args: &CollectArgs, config: &AppConfig) -> Result<SessionSummary> {
    let duration = match args.duration {
        Some(secs) => match capture_window(secs) {
            Ok(duration) => duration,
            Err(e) => anyhow::bail!("duration {e}"),
        },
        None => config.collect.duration()?,
    };
    let encoding = match args.encoding {
        Some(encoding) => encoding,
        None => config.collect.text_encoding()?,
    };

    let summary = accelog_core::run(&args.port, &args.output, SamplerConfig { duration, encoding })
        .with_context(|| format!("collection from {} failed", args.port))?;
    println!("Done");
    Ok(summary)
}

pub fn ports() -> Result<()> {
    let ports = accelog_core::list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }
    for port in ports {
        println!("{port}");
    }
    Ok(())
}

fn filter_spec(args: &FilterArgs, config: &AppConfig) -> FilterSpec {
    let defaults = config.filter.spec;
    FilterSpec {
        taps: args.taps.unwrap_or(defaults.taps),
        sample_rate_hz: args.sample_rate.unwrap_or(defaults.sample_rate_hz),
        cutoff_hz: args.cutoff.unwrap_or(defaults.cutoff_hz),
    }
}

/// Frequency at which the response first falls 3 dB below DC.
pub fn corner_frequency(response: &[FrequencyPoint]) -> Option<f64> {
    response
        .iter()
        .find(|p| p.magnitude_db <= -3.0)
        .map(|p| p.frequency_hz)
}

pub fn response_csv(response: &[FrequencyPoint]) -> String {
    let mut out = String::from("frequency_hz,magnitude_db\n");
    for p in response {
        let _ = writeln!(out, "{},{}", p.frequency_hz, p.magnitude_db);
    }
    out
}

/// `<dir>/<stem>_filtered.csv` next to the input session.
pub fn filtered_path(session: &Path) -> PathBuf {
    let stem = session
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "session".to_string());
    session.with_file_name(format!("{stem}_filtered.csv"))
}

/// Filters the `x` trace of a session and renders `time,x,x_filtered` rows
/// with time relative to the first sample.
pub fn filter_session(session: &Path, coeffs: &[f64]) -> Result<Option<String>> {
    let data = accelog_core::load_session(session)?;
    if data.is_empty() {
        log::warn!("{} holds no samples, nothing to filter", session.display());
        return Ok(None);
    }

    let filtered = accelog_dsp::convolve_same(&data.x, coeffs);
    let mut out = String::from("time,x,x_filtered\n");
    for ((t, x), f) in data.normalized_time().iter().zip(&data.x).zip(&filtered) {
        let _ = writeln!(out, "{t},{x},{f}");
    }
    Ok(Some(out))
}

pub fn filter(args: &FilterArgs, config: &AppConfig) -> Result<()> {
    let spec = filter_spec(args, config);
    let coeffs = spec.design().context("invalid filter parameters")?;
    let output = args.output.clone().unwrap_or_else(|| config.filter.output.clone());

    accelog_dsp::write_coefficients(&output, &coeffs)?;
    println!(
        "FIR filter coefficients ({} taps, {} Hz cutoff at {} Hz) written to {}",
        spec.taps,
        spec.cutoff_hz,
        spec.sample_rate_hz,
        output.display()
    );

    let response = accelog_dsp::freqz(&coeffs, spec.sample_rate(), RESPONSE_POINTS);
    match corner_frequency(&response) {
        Some(hz) => log::info!("-3 dB point at {hz:.2} Hz"),
        None => log::info!("response stays within 3 dB up to Nyquist"),
    }
    if let Some(path) = &args.response {
        std::fs::write(path, response_csv(&response))
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Frequency response written to {}", path.display());
    }

    if let Some(session) = &args.session {
        if let Some(rows) = filter_session(session, &coeffs)? {
            let path = filtered_path(session);
            std::fs::write(&path, rows).with_context(|| format!("failed to write {}", path.display()))?;
            println!("Filtered data written to {}", path.display());
        }
    }
    Ok(())
}

pub fn template(args: &TemplateArgs) -> Result<()> {
    let module = ModuleTemplate::new(&args.module, &args.description, &args.author)?;
    let [c_path, h_path] = module.write_to(&args.out_dir)?;
    println!("Generated {} and {}", c_path.display(), h_path.display());
    Ok(())
}

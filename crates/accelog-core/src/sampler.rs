use std::path::Path;
use std::time::{Duration, Instant};

use crate::line::LineSource;
use crate::sample::Sample;
use crate::serial::{SerialConfig, SerialConnection};
use crate::session::{session_path, SessionSummary, SessionWriter};
use crate::{CollectError, TextEncoding};

/// How long a capture runs when nothing else is configured.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    pub duration: Duration,
    pub encoding: TextEncoding,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            encoding: TextEncoding::Utf8,
        }
    }
}

/// Copies well-formed records from a line source into a session file for a
/// fixed wall-clock window.
pub struct Sampler<S> {
    source: S,
    cfg: SamplerConfig,
}

impl<S: LineSource> Sampler<S> {
    /// `source` must frame lines for `cfg.encoding`; see [`LineReader::for_encoding`].
    ///
    /// [`LineReader::for_encoding`]: crate::LineReader::for_encoding
    pub fn new(source: S, cfg: SamplerConfig) -> Self {
        Self { source, cfg }
    }

    /// Writes the session to `output` and returns once the window has elapsed.
    ///
    /// A read error aborts the run; rows already written stay on disk since
    /// the writer is dropped (and the file closed) on the way out.
    pub fn run(&mut self, output: &Path) -> Result<SessionSummary, CollectError> {
        let mut writer = SessionWriter::create(output)?;
        log::debug!("recording {} lines into {}", self.cfg.encoding, writer.path().display());
        let mut summary = SessionSummary::default();

        let start = Instant::now();
        while start.elapsed() < self.cfg.duration {
            let Some(raw) = self.source.read_line()? else {
                summary.empty_reads += 1;
                continue;
            };

            let line = self.cfg.encoding.decode_line(&raw);
            match Sample::parse(&line) {
                Ok(sample) => {
                    writer.write_sample(&sample)?;
                    summary.accepted += 1;
                }
                Err(malformed) => {
                    summary.dropped += 1;
                    log::debug!(
                        "dropping line with {} tokens: {}",
                        malformed.tokens,
                        hex::encode(&raw)
                    );
                }
            }
        }
        summary.elapsed = start.elapsed();

        writer.finish()?;
        Ok(summary)
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

/// Opens `port`, records into `<basename>.csv` for `cfg.duration` and closes both.
pub fn run(port: &str, basename: &str, cfg: SamplerConfig) -> Result<SessionSummary, CollectError> {
    let connection = SerialConnection::open(SerialConfig {
        encoding: cfg.encoding,
        ..SerialConfig::new(port)
    })?;
    log::info!(
        "connected to {} at {} baud, collecting for {:.1}s",
        port,
        connection.config().baud_rate,
        cfg.duration.as_secs_f64()
    );

    let output = session_path(basename);
    let summary = Sampler::new(connection, cfg).run(&output)?;
    log::info!("{}: {}", output.display(), summary);
    Ok(summary)
}

//! Session files: the CSV written during a run and its offline reader.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sample::{csv_header, split_csv_row, Sample, COLUMNS};
use crate::{CollectError, SessionError};

/// `<basename>.csv`, relative to the working directory unless `basename` is absolute.
pub fn session_path(basename: &str) -> PathBuf {
    PathBuf::from(format!("{basename}.csv"))
}

/// Append-only writer for one session file.
///
/// Every row goes to the file with a single write so that a crash mid-run
/// leaves only whole rows behind. The file is closed when the writer drops.
pub struct SessionWriter {
    file: File,
    path: PathBuf,
    rows: usize,
}

impl SessionWriter {
    /// Creates or truncates `path` and writes the header row.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, CollectError> {
        let path = path.into();
        let mut file = File::create(&path).map_err(|source| CollectError::Output {
            path: path.clone(),
            source,
        })?;
        file.write_all(csv_header().as_bytes())
            .map_err(|source| CollectError::Output {
                path: path.clone(),
                source,
            })?;
        Ok(Self { file, path, rows: 0 })
    }

    pub fn write_sample(&mut self, sample: &Sample) -> Result<(), CollectError> {
        self.file
            .write_all(sample.csv_row().as_bytes())
            .map_err(|source| CollectError::Output {
                path: self.path.clone(),
                source,
            })?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes and closes the file, surfacing errors a plain drop would hide.
    pub fn finish(mut self) -> Result<PathBuf, CollectError> {
        self.file.flush().and_then(|_| self.file.sync_all()).map_err(|source| CollectError::Output {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.path)
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub accepted: usize,
    pub dropped: usize,
    pub empty_reads: usize,
    pub elapsed: Duration,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} samples recorded, {} malformed lines dropped, {} empty reads in {:.1}s",
            self.accepted,
            self.dropped,
            self.empty_reads,
            self.elapsed.as_secs_f64()
        )
    }
}

/// A session file loaded as numeric columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionData {
    pub time: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl SessionData {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Timestamps shifted so the first sample is at zero.
    pub fn normalized_time(&self) -> Vec<f64> {
        let origin = self.time.first().copied().unwrap_or_default();
        self.time.iter().map(|t| t - origin).collect()
    }

    fn push(&mut self, [t, x, y, z]: [f64; 4]) {
        self.time.push(t);
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }
}

/// Reads a session CSV. Columns are located by header name; rows whose
/// fields do not parse as numbers are skipped with a warning.
pub fn load_session(path: &Path) -> Result<SessionData, SessionError> {
    let content = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines = content.lines();
    let header = lines.next().ok_or_else(|| SessionError::Empty {
        path: path.to_path_buf(),
    })?;
    let names: Vec<String> = split_csv_row(header);

    let mut index = [0usize; 4];
    for (slot, column) in index.iter_mut().zip(COLUMNS) {
        *slot = names
            .iter()
            .position(|name| name.trim() == column)
            .ok_or(SessionError::MissingColumn {
                path: path.to_path_buf(),
                column,
            })?;
    }

    let mut data = SessionData::default();
    for (lineno, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_csv_row(line);
        match Sample::from_fields(&fields, index).and_then(|sample| sample.values()) {
            Some(values) => data.push(values),
            None => log::warn!("{}:{}: skipping unparsable row `{}`", path.display(), lineno + 2, line),
        }
    }

    log::debug!("loaded {} rows from {}", data.len(), path.display());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_path_appends_extension() {
        assert_eq!(session_path("run1"), PathBuf::from("run1.csv"));
        assert_eq!(session_path("/tmp/a/b"), PathBuf::from("/tmp/a/b.csv"));
    }

    #[test]
    fn test_writer_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        let mut writer = SessionWriter::create(&path).unwrap();
        writer.write_sample(&Sample::parse("1 2 3 4").unwrap()).unwrap();
        assert_eq!(writer.rows(), 1);
        let written = writer.finish().unwrap();
        assert_eq!(written, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "time,x,y,z\n1,2,3,4\n");
    }

    #[test]
    fn test_writer_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        std::fs::write(&path, "stale contents\n1,1,1,1\n").unwrap();
        SessionWriter::create(&path).unwrap().finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "time,x,y,z\n");
    }

    #[test]
    fn test_rows_visible_before_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        let mut writer = SessionWriter::create(&path).unwrap();
        writer.write_sample(&Sample::parse("7 0 0 1").unwrap()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "time,x,y,z\n7,0,0,1\n");
    }

    #[test]
    fn test_load_session_normalizes_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        std::fs::write(&path, "time,x,y,z\n100,0.1,0.2,0.9\n110,0.2,0.3,1.0\n").unwrap();
        let data = load_session(&path).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.x, vec![0.1, 0.2]);
        assert_eq!(data.normalized_time(), vec![0.0, 10.0]);
    }

    #[test]
    fn test_load_session_skips_bad_rows_and_reorders_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        std::fs::write(&path, "x,y,z,time\n1,2,3,0\nnan-ish,2,3\n4,5,6,1\n\n").unwrap();
        let data = load_session(&path).unwrap();
        assert_eq!(data.time, vec![0.0, 1.0]);
        assert_eq!(data.z, vec![3.0, 6.0]);
    }

    #[test]
    fn test_quoted_field_does_not_shift_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        let mut writer = SessionWriter::create(&path).unwrap();
        writer.write_sample(&Sample::parse("1,5 2 3 4").unwrap()).unwrap();
        writer.write_sample(&Sample::parse("2 0.5 0.6 0.7").unwrap()).unwrap();
        writer.finish().unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "time,x,y,z\n\"1,5\",2,3,4\n2,0.5,0.6,0.7\n"
        );
        let data = load_session(&path).unwrap();
        assert_eq!(data.time, vec![2.0]);
        assert_eq!(data.x, vec![0.5]);
        assert_eq!(data.z, vec![0.7]);
    }

    #[test]
    fn test_load_session_errors() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.csv");
        std::fs::write(&empty, "").unwrap();
        assert!(matches!(load_session(&empty), Err(SessionError::Empty { .. })));

        let no_z = dir.path().join("no_z.csv");
        std::fs::write(&no_z, "time,x,y\n1,2,3\n").unwrap();
        assert!(matches!(
            load_session(&no_z),
            Err(SessionError::MissingColumn { column: "z", .. })
        ));

        let missing = dir.path().join("missing.csv");
        assert!(matches!(load_session(&missing), Err(SessionError::Io { .. })));
    }

    #[test]
    fn test_summary_display() {
        let summary = SessionSummary {
            accepted: 2,
            dropped: 1,
            empty_reads: 3,
            elapsed: Duration::from_millis(10_000),
        };
        assert_eq!(
            summary.to_string(),
            "2 samples recorded, 1 malformed lines dropped, 3 empty reads in 10.0s"
        );
    }
}

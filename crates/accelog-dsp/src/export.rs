use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Precision the firmware tables are generated with.
pub const COEFFICIENT_DECIMALS: i32 = 6;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode coefficients: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn round_coefficients(coeffs: &[f64], decimals: i32) -> Vec<f64> {
    let scale = 10f64.powi(decimals);
    coeffs.iter().map(|c| (c * scale).round() / scale).collect()
}

/// Writes `coeffs` as a flat JSON array, rounded to [`COEFFICIENT_DECIMALS`].
pub fn write_coefficients(path: &Path, coeffs: &[f64]) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer(&mut out, &round_coefficients(coeffs, COEFFICIENT_DECIMALS))?;
    out.flush().map_err(io_err)?;
    log::debug!("wrote {} coefficients to {}", coeffs.len(), path.display());
    Ok(())
}

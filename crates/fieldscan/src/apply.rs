//! Embedding field descriptors into a PDF on disk.

use std::path::Path;

use fieldscan_core::{FieldDescriptor, ScanError};
use fieldscan_pdf::{EmbedOutcome, embed_fields};
use tracing::info;

/// Write `fields` into the PDF at `input` as AcroForm fields and save the
/// result to `output`.
///
/// `logical_width` is the width of the coordinate space the descriptors are
/// in, normally [`DetectOptions::target_width`](crate::DetectOptions).
/// Descriptors that cannot be placed are reported in
/// [`EmbedOutcome::skipped`]; the returned bytes are what was written.
///
/// # Errors
///
/// Returns [`ScanError::DocumentOpen`] if `input` cannot be read or parsed,
/// [`ScanError::InvalidOptions`] for a non-positive `logical_width`, and
/// [`ScanError::Processing`] if `output` cannot be written.
pub fn apply_fields(
    input: &Path,
    fields: &[FieldDescriptor],
    output: &Path,
    logical_width: f64,
) -> Result<EmbedOutcome, ScanError> {
    let bytes = std::fs::read(input)
        .map_err(|e| ScanError::DocumentOpen(format!("{}: {e}", input.display())))?;
    let outcome =
        embed_fields(&bytes, fields, logical_width).map_err(|e| match ScanError::from(e) {
            ScanError::DocumentOpen(msg) => {
                ScanError::DocumentOpen(format!("{}: {msg}", input.display()))
            }
            other => other,
        })?;
    std::fs::write(output, &outcome.bytes).map_err(|e| {
        ScanError::Processing(format!("cannot write {}: {e}", output.display()))
    })?;
    info!(
        input = %input.display(),
        output = %output.display(),
        fields = outcome.written.len(),
        "saved form"
    );
    Ok(outcome)
}

use std::io::Read;
use std::path::{Path, PathBuf};

use fieldscan::{FieldDescriptor, apply_fields};

/// Embed the fields listed in `fields` into `file` and save the result.
///
/// Without `output`, the edited PDF is written next to the input as
/// `edited_<name>`.
pub fn run(
    file: &Path,
    fields: &Path,
    output: Option<&Path>,
    target_width: f64,
) -> Result<(), i32> {
    let descriptors = read_fields(fields).map_err(|msg| {
        eprintln!("Error: {msg}");
        1
    })?;
    let output = output.map_or_else(|| default_output(file), Path::to_path_buf);

    let outcome = apply_fields(file, &descriptors, &output, target_width).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    for skipped in &outcome.skipped {
        eprintln!("Skipped '{}': {}", skipped.label, skipped.reason);
    }
    println!(
        "Embedded {} form fields into: {}",
        outcome.written.len(),
        output.display()
    );
    Ok(())
}

fn read_fields(path: &Path) -> Result<Vec<FieldDescriptor>, String> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("cannot read field list from stdin: {e}"))?;
        text
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?
    };
    serde_json::from_str(&text)
        .map_err(|e| format!("invalid field list {}: {e}", path.display()))
}

fn default_output(file: &Path) -> PathBuf {
    let name = file
        .file_name()
        .map_or_else(|| "output.pdf".to_string(), |n| n.to_string_lossy().into_owned());
    file.with_file_name(format!("edited_{name}"))
}

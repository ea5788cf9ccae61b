use std::path::Path;

use fieldscan::FieldNameReport;

/// Read embedded AcroForm names from `file` and write the verification
/// report to `output`.
pub fn run(file: &Path, output: &Path) -> Result<(), i32> {
    println!("--- Reading PDF: {} ---", file.display());

    let report = FieldNameReport::from_file(file).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    if report.is_empty() {
        println!("No form fields found in this PDF.");
        return Ok(());
    }
    println!("Found {} form fields.", report.len());

    report.write_to(output).map_err(|e| {
        eprintln!("Error: cannot write {}: {e}", output.display());
        1
    })?;

    for name in report.trailing_space_names() {
        println!("Trailing space in field name: '{name}'");
    }
    println!("Field names saved to: {}", output.display());
    Ok(())
}

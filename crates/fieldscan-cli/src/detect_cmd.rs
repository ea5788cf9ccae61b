use std::panic;

use fieldscan::{
    ContourMode, DetectOptions, FieldDescriptor, FieldOrder, FormScanner, ScanError,
};
use tracing::debug;

use crate::cli::{DetectArgs, SortOrder};
use crate::page_range::parse_page_range;
use crate::shared::{EMPTY_RESULT, fields_json, print_stdout};

/// Detect fields and print them as JSON.
///
/// Every failure prints `[]` on stdout and a diagnostic on stderr, including
/// a panic inside the pipeline. The exit status reflects the failure only
/// with `--strict`.
pub fn run(args: &DetectArgs) -> Result<(), i32> {
    let json = panic::catch_unwind(|| {
        detect(args).and_then(|fields| {
            fields_json(&fields, args.pretty)
                .map_err(|e| ScanError::Processing(format!("cannot serialize fields: {e}")))
        })
    })
    .unwrap_or_else(|_| {
        Err(ScanError::Processing(
            "field detection aborted unexpectedly".to_string(),
        ))
    });
    match json {
        Ok(json) => print_stdout(&json),
        Err(e) => {
            debug!(kind = e.kind(), "field detection failed");
            eprintln!("Error: {e}");
            print_stdout(EMPTY_RESULT)?;
            if args.strict { Err(1) } else { Ok(()) }
        }
    }
}

fn detect(args: &DetectArgs) -> Result<Vec<FieldDescriptor>, ScanError> {
    let file = args
        .file
        .as_deref()
        .ok_or_else(|| ScanError::DocumentOpen("no PDF path given".to_string()))?;
    scanner_for(args)?.scan_file(file)
}

fn scanner_for(args: &DetectArgs) -> Result<FormScanner, ScanError> {
    let options = DetectOptions {
        zoom: args.zoom,
        target_width: args.target_width,
        contour_mode: if args.outer_only {
            ContourMode::Outer
        } else {
            ContourMode::All
        },
        order: match args.sort {
            SortOrder::Discovery => FieldOrder::Discovery,
            SortOrder::Reading => FieldOrder::Reading,
        },
        ..DetectOptions::default()
    };
    options.validate()?;

    let mut scanner = FormScanner::new(options);
    if let Some(range) = &args.pages {
        let selection = parse_page_range(range).map_err(ScanError::InvalidOptions)?;
        scanner = scanner.with_page_selection(selection);
    }
    if let Some(dir) = &args.debug_dir {
        scanner = scanner.with_debug_dir(dir);
    }
    if let Some(dir) = args.pdfium_dir.as_deref().filter(|d| !d.as_os_str().is_empty()) {
        scanner = scanner.with_pdfium_dir(dir);
    }
    debug!(
        zoom = scanner.options().zoom,
        target_width = scanner.options().target_width,
        "detection options"
    );
    Ok(scanner)
}

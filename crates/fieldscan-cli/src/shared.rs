use std::io::{self, Write};

use fieldscan::FieldDescriptor;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "FIELDSCAN_LOG";

/// What stdout carries when detection fails.
pub const EMPTY_RESULT: &str = "[]";

/// Default filter for a `-v` count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the stderr log subscriber. `FIELDSCAN_LOG` wins over `-v`.
///
/// stdout is reserved for the JSON result, so logs never go there.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// Serialize descriptors as a JSON array.
pub fn fields_json(fields: &[FieldDescriptor], pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(fields)
    } else {
        serde_json::to_string(fields)
    }
}

/// Print one line to stdout and flush it.
pub fn print_stdout(line: &str) -> Result<(), i32> {
    let mut out = io::stdout().lock();
    writeln!(out, "{line}")
        .and_then(|()| out.flush())
        .map_err(|e| {
            eprintln!("Error: cannot write to stdout: {e}");
            1
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldscan::{FieldAlign, FieldType};

    fn field(name: &str) -> FieldDescriptor {
        FieldDescriptor {
            id: "det_0_10_20".to_string(),
            field_type: FieldType::Text,
            page: 0,
            x: 8.0,
            y: 12.0,
            w: 96.0,
            h: 16.0,
            name: name.to_string(),
            required: false,
            font_size: 11,
            align: FieldAlign::Left,
        }
    }

    #[test]
    fn directive_for_verbosity() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "debug");
        assert_eq!(default_directive(5), "trace");
    }

    #[test]
    fn empty_fields_serialize_as_sentinel() {
        assert_eq!(fields_json(&[], false).unwrap(), EMPTY_RESULT);
    }

    #[test]
    fn compact_json_is_one_line() {
        let json = fields_json(&[field("Field_1"), field("Field_2")], false).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with("[{\"id\":\"det_0_10_20\",\"type\":\"text\""));
    }

    #[test]
    fn pretty_json_is_indented() {
        let json = fields_json(&[field("Field_1")], true).unwrap();
        assert!(json.contains("\n  {"));
        assert!(json.contains("\"fontSize\": 11"));
    }
}

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Propose fillable form fields for a PDF and print them as a JSON array.
///
/// On any failure the JSON output is `[]` and the reason goes to stderr.
#[derive(Debug, Parser)]
#[command(name = "fieldscan", about, version, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub detect: DetectArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the form field names already embedded in a PDF
    Verify {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the report
        #[arg(short, long, value_name = "OUT", default_value = "verified_fields.txt")]
        output: PathBuf,

        /// Increase log verbosity (-v: debug, -vv: trace)
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
    },

    /// Embed a JSON field list into a PDF as fillable AcroForm fields
    Apply {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON array of fields as printed by detection ('-' reads stdin)
        #[arg(value_name = "FIELDS")]
        fields: PathBuf,

        /// Where to save the edited PDF (default: edited_<FILE> next to FILE)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Width of the logical coordinate space the fields are in
        #[arg(long, default_value_t = 800.0)]
        target_width: f64,

        /// Increase log verbosity (-v: debug, -vv: trace)
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
    },
}

/// Options of the default detection command.
#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Path to the PDF file
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Page range (e.g. '1,3-5'). Default: all pages
    #[arg(long)]
    pub pages: Option<String>,

    /// Render magnification relative to 72 DPI (default: 2.5)
    #[arg(long, default_value_t = 2.5)]
    pub zoom: f32,

    /// Width of the logical coordinate space (default: 800)
    #[arg(long, default_value_t = 800.0)]
    pub target_width: f64,

    /// Ignore hole borders (interiors of ruled boxes)
    #[arg(long)]
    pub outer_only: bool,

    /// Order of fields within a page
    #[arg(long, value_enum, default_value_t = SortOrder::Discovery)]
    pub sort: SortOrder,

    /// Pretty-print the JSON array
    #[arg(long)]
    pub pretty: bool,

    /// Exit with a non-zero status when detection fails (still prints [])
    #[arg(long)]
    pub strict: bool,

    /// Write per-page binary and grid masks as PNG files into this directory
    #[arg(long, value_name = "DIR")]
    pub debug_dir: Option<PathBuf>,

    /// Directory containing the pdfium shared library
    #[arg(long, value_name = "DIR", env = "FIELDSCAN_PDFIUM_DIR")]
    pub pdfium_dir: Option<PathBuf>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Order of fields within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Order in which regions were traced
    Discovery,
    /// Top-to-bottom, then left-to-right
    Reading,
}

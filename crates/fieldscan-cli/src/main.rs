mod apply_cmd;
mod cli;
mod detect_cmd;
mod page_range;
mod shared;
mod verify_cmd;

use clap::Parser;
use clap::error::ErrorKind;
use cli::{Cli, Commands};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // Usage errors still leave a parseable result on stdout.
            let _ = e.print();
            println!("{}", shared::EMPTY_RESULT);
            std::process::exit(e.exit_code());
        }
    };

    let result = match cli.command {
        Some(Commands::Verify {
            ref file,
            ref output,
            verbose,
        }) => {
            shared::init_logging(verbose);
            verify_cmd::run(file, output)
        }
        Some(Commands::Apply {
            ref file,
            ref fields,
            ref output,
            target_width,
            verbose,
        }) => {
            shared::init_logging(verbose);
            apply_cmd::run(file, fields, output.as_deref(), target_width)
        }
        None => {
            shared::init_logging(cli.detect.verbose);
            detect_cmd::run(&cli.detect)
        }
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

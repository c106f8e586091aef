//! # media-scanner CLI
//!
//! Command-line interface for the 16:9 media scanner.
//!
//! ## Usage
//! ```bash
//! media-scanner ~/Pictures ~/Videos -o wide.json
//! media-scanner ~/Pictures -f csv --no-duplicates -c 8 > wide.csv
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}

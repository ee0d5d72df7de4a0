//! json-to-csv - Convert a JSON list of objects to a CSV file

use clap::Parser;
use empdir_admin::convert::{convert_json_to_csv, DEFAULT_INPUT, DEFAULT_OUTPUT};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "json-to-csv")]
#[command(about = "Convert a JSON array of objects (or one object) to CSV", long_about = None)]
struct Args {
    /// JSON input file
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// CSV output file
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match convert_json_to_csv(&args.input, &args.output) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

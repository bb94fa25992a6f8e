//! asc2pipe: convert JEOL Delta generic-ASCII (.asc + .hdr) exports to NMRPipe format.

use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "asc2pipe",
    version,
    about = "Convert JEOL Delta generic-ASCII (.asc + .hdr) exports to NMRPipe format"
)]
struct Cli {
    /// Input .asc file; the .hdr file must sit next to it
    input: PathBuf,

    /// Output NMRPipe file (or - for stdout)
    #[arg(short, long, default_value = "-")]
    out: String,

    /// Fail on short data files and drifting 2D row coordinates
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Verbose mode
    #[arg(short, long, default_value_t = false)]
    verb: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verb { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    let opts = asc2pipe::AscOptions {
        strict_layout: cli.strict,
    };
    let result = asc2pipe::convert(&cli.input, &opts)?;
    let pipe = result.to_pipe();

    log::info!(
        "{}D, {} plane(s), shape {}",
        pipe.fdata.dim_count(),
        pipe.planes.len(),
        result.data.shape()
    );

    let mut out: Box<dyn Write> = if cli.out == "-" {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        Box::new(BufWriter::new(File::create(&cli.out)?))
    };
    pipe.write_to(&mut out)?;
    out.flush()?;
    Ok(())
}

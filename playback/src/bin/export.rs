use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use playback::Workload;

/// Runs one workload file through the engine and writes the complete
/// trace as JSON for external playback
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the workload JSON file
    #[arg(value_parser = clap::value_parser!(PathBuf))]
    workload: PathBuf,

    /// Where to write the trace; stdout when omitted
    #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
    output: Option<PathBuf>,

    /// Pretty-print the trace
    #[arg(short, long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let fd = File::open(&args.workload)
        .with_context(|| format!("cannot open {}", args.workload.display()))?;
    let workload: Workload =
        serde_json::from_reader(BufReader::new(fd)).context("malformed workload file")?;

    let trace = playback::run(&workload)?;

    match args.output {
        Some(path) => {
            let fd = File::create(&path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut writer = BufWriter::new(fd);
            if args.pretty {
                serde_json::to_writer_pretty(&mut writer, &trace)?;
            } else {
                serde_json::to_writer(&mut writer, &trace)?;
            }
            writer.flush()?;
        }
        None => {
            let out = if args.pretty {
                serde_json::to_string_pretty(&trace)?
            } else {
                serde_json::to_string(&trace)?
            };
            println!("{out}");
        }
    }

    Ok(())
}

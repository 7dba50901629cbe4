// src/bin/gopro2json.rs
use clap::Parser;
use gpmf_telemetry::prelude::*;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing::{error, info, Level};

/// Decode a GPMF metadata dump into a JSON telemetry report
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Skip GPS points recorded without a fix (GPSF == 0)
    #[clap(short, long)]
    skip: bool,

    /// Source video, read for the camera serial and highlight markers
    #[clap(long, value_name = "FILE")]
    container: Option<PathBuf>,

    /// Recording creation time to attach to the report
    #[clap(long, value_name = "TEXT")]
    date: Option<String>,

    /// JSON file with decode options
    #[clap(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Output path; defaults to the dump path with a .json extension
    #[clap(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Binary metadata dump
    dump: PathBuf,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn output_path(args: &Args) -> PathBuf {
    match &args.output {
        Some(path) => path.clone(),
        None => args.dump.with_extension("json"),
    }
}

fn run(args: &Args) -> Result<PathBuf> {
    let mut options = match &args.config {
        Some(path) => DecodeOptions::from_file(path)?,
        None => DecodeOptions::default(),
    };
    if args.skip {
        options.skip_bad_fix = true;
    }

    let mut source = DumpFile::new(&args.dump);
    if let Some(date) = &args.date {
        source = source.with_creation_time(date.clone());
    }

    let output = output_path(args);
    let mut report = decode_source(&source, &options)?.with_source(display(&output));

    if let Some(container) = &args.container {
        let bytes = std::fs::read(container)?;
        report = report.with_container(&bytes);
    }

    let stats = &report.gps.stats;
    info!(
        ok = stats.accepted,
        bad_fix = stats.bad_fix,
        bad_fix_skipped = stats.bad_fix_skipped,
        empty = stats.empty,
        "GPS points"
    );

    let mut writer = BufWriter::new(std::fs::File::create(&output)?);
    report.write_json(&mut writer)?;
    writer.flush()?;
    Ok(output)
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    match run(&args) {
        Ok(output) => info!(output = %output.display(), "report written"),
        Err(e) => {
            error!("{}", e);
            eprintln!("gopro2json: {}", e);
            exit(1);
        }
    }
}

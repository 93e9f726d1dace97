use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use mylang::io::{ConsoleSink, FileSink, FileSource, Sink};
use mylang::{Pipeline, TranspileOptions};

/// Translate a mylang script into Python.
#[derive(Parser, Debug)]
#[command(name = "mylang", version, about)]
struct Args {
    /// Script to translate.
    input: PathBuf,
    /// Where to write the generated Python.
    #[arg(short, long, default_value = "result.py")]
    output: PathBuf,
    /// Do not echo the generated Python to stdout.
    #[arg(long)]
    no_echo: bool,
    /// Accept calls to functions that were never defined.
    #[arg(long)]
    allow_undeclared_calls: bool,
    /// Log stage progress to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let pipeline = Pipeline::new(TranspileOptions {
        check_callees: !args.allow_undeclared_calls,
        ..TranspileOptions::default()
    });
    let source = FileSource::new(&args.input);

    let mut file_sink = FileSink::new(&args.output);
    let mut console_sink = ConsoleSink;
    let mut sinks: Vec<&mut dyn Sink> = vec![&mut file_sink];
    if !args.no_echo {
        sinks.push(&mut console_sink);
    }

    pipeline.run(&source, &mut sinks)?;
    Ok(())
}

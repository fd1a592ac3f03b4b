//! pulsesim - sensor pulse emulator
//!
//! Run with: cargo run -- --reference valid-pulse.csv --noise noise-pulse.csv

mod cli;

use std::io::BufWriter;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};

use cli::Args;
use pulsesim::io::{load_series, LimitSink, WriteSink};
use pulsesim::SignalGenerator;

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // stdout carries the samples, so logs go to stderr
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let config = args.config();

    let reference = load_series(&args.reference).wrap_err_with(|| {
        format!("failed to load reference pulse {}", args.reference.display())
    })?;
    let noise = load_series(&args.noise)
        .wrap_err_with(|| format!("failed to load noise pulse {}", args.noise.display()))?;

    log::info!(
        "reference: {} samples over {}, noise: {} samples over {}",
        reference.len(),
        reference.duration(),
        noise.len(),
        noise.duration()
    );

    let source = config.onset_source();
    let mut generator = SignalGenerator::from_config(&config, &reference, &noise, source)
        .wrap_err("failed to set up the signal generator")?;

    let stdout = std::io::stdout();
    let writer = WriteSink::new(BufWriter::new(stdout.lock()));

    let mut writer = match args.samples {
        Some(limit) => {
            let mut sink = LimitSink::new(writer, limit);
            generator.run(&mut sink)?;
            sink.into_inner()
        }
        None => {
            let mut sink = writer;
            generator.run(&mut sink)?;
            sink
        }
    };

    // A reader hanging up is a normal way to stop; anything else is not
    if let Some(err) = writer.take_failure() {
        return Err(err).wrap_err("failed to write samples");
    }

    Ok(())
}

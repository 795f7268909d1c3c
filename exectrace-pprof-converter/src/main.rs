// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod config;
mod input;

use anyhow::Context;
use config::Config;
use exectrace_pprof::debug_dump::parsed_events;
use exectrace_pprof::{ParseResult, ProfileEncoder};
use input::DecodedTrace;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn init_logging(log_level: &str) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(log_level).context("could not parse log level in configuration")?,
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;
    debug!("Logging subsystem enabled");
    Ok(())
}

fn write_debug_dump(path: &Path, parsed: &ParseResult) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create debug dump {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &parsed_events(parsed))?;
    writeln!(writer)?;
    writer.flush()?;
    info!(path = %path.display(), events = parsed.events.len(), "wrote debug dump");
    Ok(())
}

fn run(config: &Config) -> anyhow::Result<()> {
    let trace = DecodedTrace::read(&config.input)?;
    let (start, stop) = (trace.start(), trace.stop());
    let parsed = trace.into_parse_result();
    info!(
        input = %config.input.display(),
        events = parsed.events.len(),
        stacks = parsed.stacks.len(),
        "read decoded trace"
    );

    if let Some(path) = &config.json {
        write_debug_dump(path, &parsed)?;
    }

    let encoder = ProfileEncoder::new(&parsed, start, stop);
    let buffer = if config.compress {
        encoder.encode_compressed()?.buffer
    } else {
        encoder.encode_to_vec()?
    };
    std::fs::write(&config.output, &buffer)
        .with_context(|| format!("failed to write profile {}", config.output.display()))?;
    info!(
        output = %config.output.display(),
        bytes = buffer.len(),
        cpu_samples = parsed.cpu_samples().count(),
        compressed = config.compress,
        "wrote profile"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::new()?;
    init_logging(&config.log_level)?;
    run(&config)
}

// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use clap::{command, Arg, ArgAction, ArgMatches, Command};
use std::env;
use std::path::PathBuf;

pub const LOG_LEVEL_ENV: &str = "EXECTRACE_PPROF_LOG_LEVEL";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_OUTPUT: &str = "trace.pprof";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The decoded trace, as JSON.
    pub input: PathBuf,
    pub output: PathBuf,
    /// Where to write the debug dump of every event, if anywhere.
    pub json: Option<PathBuf>,
    /// Gzip the profile.
    pub compress: bool,
    pub log_level: String,
}

pub fn cli() -> Command {
    command!()
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("the decoded execution trace (JSON) to convert")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("the path to save the profile to")
                .default_value(DEFAULT_OUTPUT),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("also write every event, with its stack, as JSON to this path")
                .required(false),
        )
        .arg(
            Arg::new("uncompressed")
                .long("uncompressed")
                .action(ArgAction::SetTrue)
                .help("write the profile without gzip compression"),
        )
}

impl Config {
    /// Reads the command line and the environment.
    pub fn new() -> anyhow::Result<Config> {
        Self::from_matches(&cli().get_matches(), env::var(LOG_LEVEL_ENV).ok())
    }

    pub fn from_matches(matches: &ArgMatches, log_level: Option<String>) -> anyhow::Result<Config> {
        let input = matches
            .get_one::<String>("input")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --input"))?;
        let output = matches
            .get_one::<String>("output")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        let json = matches.get_one::<String>("json").map(PathBuf::from);
        let compress = !matches.get_flag("uncompressed");
        let log_level = log_level
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Config {
            input,
            output,
            json,
            compress,
            log_level,
        })
    }
}

// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use exectrace_pprof::collections::FxHashMap;
use exectrace_pprof::{Event, Frame, ParseResult, StackId};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A decoded execution trace together with the window it was captured in.
#[derive(Debug, Deserialize)]
pub struct DecodedTrace {
    pub start_unix_nanos: u64,
    pub stop_unix_nanos: u64,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub stacks: FxHashMap<StackId, Vec<Frame>>,
}

impl DecodedTrace {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open decoded trace {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse decoded trace {}", path.display()))
    }

    pub fn start(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_nanos(self.start_unix_nanos)
    }

    pub fn stop(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_nanos(self.stop_unix_nanos)
    }

    pub fn into_parse_result(self) -> ParseResult {
        ParseResult {
            events: self.events,
            stacks: self.stacks,
        }
    }
}

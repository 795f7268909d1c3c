// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities

#![allow(dead_code)]

use exectrace_pprof::pprof::{deserialize_pprof, string_table_fetch, Profile};
use exectrace_pprof::{Event, EventKind, Frame, ParseResult, ProfileEncoder, StackId};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const START_SECS: u64 = 1_700_000_000;

pub fn window() -> (SystemTime, SystemTime) {
    let start = UNIX_EPOCH + Duration::from_secs(START_SECS);
    (start, start + Duration::from_millis(250))
}

pub fn cpu_sample(goroutine: u64, timestamp: i64, stack_id: StackId) -> Event {
    Event::new(EventKind::CpuSample, goroutine, timestamp, stack_id)
}

pub fn parse_result(events: Vec<Event>, stacks: Vec<(StackId, Vec<Frame>)>) -> ParseResult {
    ParseResult {
        events,
        stacks: stacks.into_iter().collect(),
    }
}

pub fn encode(parsed: &ParseResult) -> Vec<u8> {
    let (start, stop) = window();
    ProfileEncoder::new(parsed, start, stop)
        .encode_to_vec()
        .unwrap()
}

pub fn roundtrip(parsed: &ParseResult) -> Profile {
    deserialize_pprof(&encode(parsed)).unwrap()
}

#[track_caller]
pub fn string(profile: &Profile, id: i64) -> &str {
    string_table_fetch(profile, id).unwrap_or_else(|| panic!("String {id} not found"))
}

/// The labels of a label set as (key, value) strings.
pub fn label_strings(profile: &Profile, label_set_id: u64) -> Vec<(String, String)> {
    let set = profile
        .label_sets
        .iter()
        .find(|set| set.id == label_set_id)
        .unwrap_or_else(|| panic!("label set {label_set_id} not found"));
    set.labels
        .iter()
        .map(|label| {
            (
                string(profile, label.key).to_string(),
                string(profile, label.str).to_string(),
            )
        })
        .collect()
}

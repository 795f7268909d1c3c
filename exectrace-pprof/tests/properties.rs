// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod common;

use common::*;
use exectrace_pprof::{Event, EventKind, Frame, ParseResult};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

const KINDS: [EventKind; 4] = [
    EventKind::CpuSample,
    EventKind::CpuSample,
    EventKind::GoStart,
    EventKind::GoBlock,
];

fn arb_frame() -> impl Strategy<Value = Frame> {
    // Small pools so that PCs, names and files collide often. The file is
    // not derived from the PC, so one PC can show up in different frames.
    (0u64..24, 0usize..3).prop_map(|(pc, file)| {
        Frame::new(
            0x4000 + pc,
            format!("pkg.f{}", pc % 9),
            format!("f{file}.go"),
            pc as i64,
        )
    })
}

fn arb_parse_result() -> impl Strategy<Value = ParseResult> {
    let frames = prop::collection::vec(arb_frame(), 0..6);
    let stacks = prop::collection::hash_map(0u64..12, frames, 0..8);
    let events = prop::collection::vec(
        (0usize..KINDS.len(), 0u64..6, any::<i64>(), 0u64..14),
        0..40,
    );
    (stacks, events).prop_map(|(stacks, events)| ParseResult {
        events: events
            .into_iter()
            .map(|(kind, goroutine, timestamp, stack_id)| {
                Event::new(KINDS[kind], goroutine, timestamp, stack_id)
            })
            .collect(),
        stacks: stacks.into_iter().collect(),
    })
}

proptest! {
    #[test]
    fn profile_invariants(parsed in arb_parse_result()) {
        let profile = roundtrip(&parsed);

        // String table: empty string first, no duplicates.
        prop_assert_eq!("", profile.string_table[0].as_str());
        let unique: HashSet<&String> = profile.string_table.iter().collect();
        prop_assert_eq!(unique.len(), profile.string_table.len());

        // One sample per sampled stack, in first-sample order.
        let mut sampled = Vec::new();
        for event in parsed.cpu_samples() {
            if !sampled.contains(&event.stack_id) {
                sampled.push(event.stack_id);
            }
        }
        prop_assert_eq!(sampled.len(), profile.samples.len());

        let mut total = 0;
        for (sample, stack_id) in profile.samples.iter().zip(&sampled) {
            let breakdown = sample.breakdown.clone().unwrap_or_default();
            prop_assert_eq!(breakdown.timestamps.len(), breakdown.values.len());
            prop_assert_eq!(breakdown.timestamps.len(), breakdown.label_set_ids.len());
            prop_assert_eq!(vec![breakdown.values.iter().sum::<i64>()], sample.values.clone());
            let pcs: Vec<u64> = parsed.stack(*stack_id).iter().map(|f| f.pc).collect();
            prop_assert_eq!(&pcs, &sample.location_ids);
            for id in &breakdown.label_set_ids {
                prop_assert!(profile.label_sets.iter().any(|set| set.id as i64 == *id));
            }
            total += breakdown.timestamps.len();
        }
        prop_assert_eq!(parsed.cpu_samples().count(), total);

        // Label set ids are dense from zero.
        let ids: Vec<u64> = profile.label_sets.iter().map(|set| set.id).collect();
        let expected: Vec<u64> = (0..profile.label_sets.len() as u64).collect();
        prop_assert_eq!(expected, ids);

        // Exactly one function per (name, file) and one location per PC of
        // the sampled stacks.
        let mut pairs = HashSet::new();
        let mut pcs = HashMap::new();
        for stack_id in &sampled {
            for frame in parsed.stack(*stack_id) {
                pairs.insert((frame.function.as_str(), frame.file.as_str()));
                pcs.entry(frame.pc).or_insert(frame);
            }
        }
        prop_assert_eq!(pairs.len(), profile.functions.len());
        prop_assert_eq!(pcs.len(), profile.locations.len());
        let function_ids: HashSet<u64> = profile.functions.iter().map(|f| f.id).collect();
        prop_assert_eq!(function_ids.len(), profile.functions.len());
        prop_assert!(function_ids.iter().all(|id| *id >= 1));

        for location in &profile.locations {
            let frame = pcs[&location.id];
            let function = profile
                .functions
                .iter()
                .find(|f| f.id == location.lines[0].function_id)
                .unwrap();
            prop_assert_eq!(frame.function.as_str(), string(&profile, function.name));
            prop_assert_eq!(frame.file.as_str(), string(&profile, function.filename));
        }
    }

    #[test]
    fn encoding_twice_is_identical(parsed in arb_parse_result()) {
        prop_assert_eq!(encode(&parsed), encode(&parsed));
    }
}

// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::{Record, Value, WireType, NO_OPT_ZERO, OPT_ZERO};
use std::io::{self, Write};

/// Each Sample records values encountered in some program context. For an
/// execution trace the context is a call stack, and the value is the number
/// of CPU samples taken while that stack was running.
///
/// It borrows its data but requires it to be a slice. An iterator wouldn't
/// work well because we have to walk over the fields twice: one to calculate
/// the length, and one to encode it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Sample<'a> {
    /// The ids recorded here correspond to a Profile.location.id, in the
    /// order of the frames of the stack. Each id is its own record, not a
    /// packed array.
    pub location_ids: &'a [Record<u64, 1, NO_OPT_ZERO>],
    /// The aggregate value. Its type and unit are defined by the single
    /// entry in Profile.sample_type.
    pub value: Record<i64, 2, NO_OPT_ZERO>,
    /// The individual events which were aggregated into `value`. This is an
    /// extension to the pprof format.
    pub breakdown: Record<Breakdown<'a>, 4, OPT_ZERO>,
}

/// A per-event decomposition of an aggregated sample. The three arrays are
/// parallel: entry `i` of each describes the same event.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Breakdown<'a> {
    /// Nanosecond timestamps of the events, as reported by the trace.
    pub timestamps: Record<&'a [i64], 1, OPT_ZERO>,
    pub values: Record<&'a [i64], 2, OPT_ZERO>,
    /// Ids of Profile.label_set entries.
    pub label_set_ids: Record<&'a [i64], 3, OPT_ZERO>,
}

impl_message!(Breakdown<'a> { timestamps, values, label_set_ids });

/// # Safety
/// The Default implementation will return all zero-representations.
unsafe impl Value for Sample<'_> {
    const WIRE_TYPE: WireType = WireType::LengthDelimited;

    fn proto_len(&self) -> u64 {
        let locations: u64 = self.location_ids.iter().map(Record::proto_len).sum();
        locations + self.value.proto_len() + self.breakdown.proto_len()
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for location_id in self.location_ids {
            location_id.encode(writer)?;
        }
        self.value.encode(writer)?;
        self.breakdown.encode(writer)
    }
}

#[cfg(feature = "prost_impls")]
impl From<Breakdown<'_>> for crate::prost_impls::Breakdown {
    fn from(breakdown: Breakdown) -> Self {
        Self {
            timestamps: breakdown.timestamps.value.to_vec(),
            values: breakdown.values.value.to_vec(),
            label_set_ids: breakdown.label_set_ids.value.to_vec(),
        }
    }
}

#[cfg(feature = "prost_impls")]
impl From<Sample<'_>> for crate::prost_impls::Sample {
    fn from(sample: Sample) -> Self {
        let breakdown = if sample.breakdown.value == Breakdown::default() {
            None
        } else {
            Some(crate::prost_impls::Breakdown::from(sample.breakdown.value))
        };
        Self {
            location_ids: sample.location_ids.iter().map(|id| id.value).collect(),
            values: vec![sample.value.value],
            labels: Vec::new(),
            breakdown,
        }
    }
}

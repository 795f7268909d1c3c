// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Writes the aggregated CPU samples of a trace as a pprof profile.
//!
//! Top-level records are written in this order, by field number: the sample
//! type (1), label sets (16), samples (2), the synthetic mapping (3),
//! functions (5), locations (4), time (9), duration (10), period type (11),
//! period (12), tick unit (15), and finally the string table (6). Strings are
//! interned while the other sections are written, so the string table goes
//! last.

mod options;

pub use options::*;

use crate::collections::{FxIndexMap, StringTable};
use crate::compressor::{map_io_error, Compressor};
use crate::internal::{
    LabelSetRegistry, SampleAggregator, StackAggregate, SymbolIndex, SYNTHETIC_MAPPING_ID,
};
use crate::{ParseResult, ProfileError, StackId};
use exectrace_pprof_protobuf::{self as pprof, Record, NO_OPT_ZERO, OPT_ZERO};
use std::io::Write;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, trace, warn};

/// Every sample covers one tick of the trace clock.
pub const PERIOD: i64 = 1;

pub struct EncodedProfile {
    pub start: SystemTime,
    pub end: SystemTime,
    pub buffer: Vec<u8>,
}

/// Encodes the CPU samples of one decoded trace. The dedup tables are built
/// fresh for each call and dropped when it returns.
pub struct ProfileEncoder<'a> {
    parsed: &'a ParseResult,
    start: SystemTime,
    stop: SystemTime,
    options: EncoderOptions,
}

impl<'a> ProfileEncoder<'a> {
    /// Creates an encoder for the trace captured between `start` and `stop`.
    pub fn new(parsed: &'a ParseResult, start: SystemTime, stop: SystemTime) -> Self {
        Self {
            parsed,
            start,
            stop,
            options: EncoderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EncoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Writes the uncompressed profile to the writer.
    ///
    /// # Errors
    ///
    /// Fails if the writer does, or if memory for the dedup tables can't be
    /// allocated. Anything already written is incomplete and should be
    /// discarded.
    pub fn encode<W: Write>(self, writer: &mut W) -> Result<(), ProfileError> {
        let options = self.options;
        let mut aggregator =
            SampleAggregator::with_capacity(options.reserve_samples, options.reserve_label_sets)?;
        aggregator.aggregate(self.parsed)?;
        let (aggregates, label_sets) = aggregator.into_parts();
        self.log_aggregates(&aggregates, &label_sets);

        let mut symbols =
            SymbolIndex::with_capacity(options.reserve_functions, options.reserve_locations)?;
        for stack_id in aggregates.keys() {
            symbols.index_stack(self.parsed.stack(*stack_id))?;
        }

        let mut strings = StringTable::with_capacity(options.reserve_strings)?;
        let value_type = pprof::ValueType::new(strings.intern("time")?, strings.intern("ns")?);
        Record::<pprof::ValueType, 1, NO_OPT_ZERO>::from(value_type).encode(writer)?;

        write_label_sets(writer, &mut strings, &label_sets)?;
        self.write_samples(writer, &aggregates)?;

        let mapping = pprof::Mapping {
            id: Record::from(SYNTHETIC_MAPPING_ID),
            ..pprof::Mapping::default()
        };
        Record::<pprof::Mapping, 3, NO_OPT_ZERO>::from(mapping).encode(writer)?;

        for (id, function) in symbols.functions() {
            let name = strings.intern(function.name)?;
            let filename = strings.intern(function.filename)?;
            Record::<pprof::Function, 5, NO_OPT_ZERO>::from(id.to_pprof(name, filename))
                .encode(writer)?;
        }

        for (pc, location) in symbols.locations() {
            Record::<pprof::Location, 4, NO_OPT_ZERO>::from(location.to_pprof(pc))
                .encode(writer)?;
        }

        Record::<i64, 9, OPT_ZERO>::from(unix_nanos(self.start)).encode(writer)?;
        Record::<i64, 10, OPT_ZERO>::from(duration_nanos(self.start, self.stop)).encode(writer)?;

        let period_type = pprof::ValueType::new(strings.intern("time")?, strings.intern("ns")?);
        Record::<pprof::ValueType, 11, NO_OPT_ZERO>::from(period_type).encode(writer)?;
        Record::<i64, 12, OPT_ZERO>::from(PERIOD).encode(writer)?;

        let tick_unit = strings.intern("nanoseconds")?;
        Record::<pprof::StringOffset, 15, OPT_ZERO>::from(tick_unit).encode(writer)?;

        debug!(
            samples = aggregates.len(),
            label_sets = label_sets.len(),
            functions = symbols.function_count(),
            locations = symbols.location_count(),
            strings = strings.len(),
            "encoded execution trace CPU profile"
        );

        strings.encode(writer)
    }

    /// Returns the uncompressed profile.
    pub fn encode_to_vec(self) -> Result<Vec<u8>, ProfileError> {
        let mut buffer = Vec::new();
        self.encode(&mut buffer)?;
        Ok(buffer)
    }

    /// Returns the gzip-compressed profile, which must fit within
    /// [`EncoderOptions::max_compressed_size`].
    pub fn encode_compressed(self) -> Result<EncodedProfile, ProfileError> {
        self.options.validate()?;
        let start = self.start;
        let end = self.stop;
        let mut compressor = Compressor::with_max_capacity(self.options.max_compressed_size);
        self.encode(&mut compressor).map_err(|err| match err {
            ProfileError::Io(err) => map_io_error(err),
            err => err,
        })?;
        let buffer = compressor.finish()?;
        Ok(EncodedProfile { start, end, buffer })
    }

    fn write_samples<W: Write>(
        &self,
        writer: &mut W,
        aggregates: &FxIndexMap<StackId, StackAggregate>,
    ) -> Result<(), ProfileError> {
        let mut location_ids: Vec<Record<u64, 1, NO_OPT_ZERO>> = Vec::new();
        for (stack_id, aggregate) in aggregates {
            let frames = self.parsed.stack(*stack_id);
            location_ids.clear();
            location_ids.try_reserve(frames.len())?;
            location_ids.extend(frames.iter().map(|frame| Record::from(frame.pc)));

            let sample = pprof::Sample {
                location_ids: location_ids.as_slice(),
                value: Record::from(aggregate.value),
                breakdown: Record::from(aggregate.breakdown.as_pprof()),
            };
            Record::<pprof::Sample, 2, NO_OPT_ZERO>::from(sample).encode(writer)?;
        }
        Ok(())
    }

    fn log_aggregates(
        &self,
        aggregates: &FxIndexMap<StackId, StackAggregate>,
        label_sets: &LabelSetRegistry,
    ) {
        if !tracing::enabled!(tracing::Level::TRACE) {
            return;
        }
        for (id, set) in label_sets.iter() {
            trace!(%id, labels = ?set.labels(), "label set");
        }
        for (stack_id, aggregate) in aggregates {
            trace!(
                stack_id = *stack_id,
                value = aggregate.value,
                breakdown = ?aggregate.breakdown,
                "stack observed"
            );
            for frame in self.parsed.stack(*stack_id) {
                trace!(
                    pc = frame.pc,
                    function = %frame.function,
                    file = %frame.file,
                    line = frame.line,
                    "frame"
                );
            }
        }
    }
}

fn write_label_sets<'s, W: Write>(
    writer: &mut W,
    strings: &mut StringTable<'s>,
    label_sets: &'s LabelSetRegistry,
) -> Result<(), ProfileError> {
    let mut labels: Vec<Record<pprof::Label, 2, NO_OPT_ZERO>> = Vec::new();
    for (id, set) in label_sets.iter() {
        labels.clear();
        labels.try_reserve(set.labels().len())?;
        for label in set.labels() {
            let key = strings.intern(label.key.as_ref())?;
            let value = strings.intern(label.value.as_ref())?;
            labels.push(Record::from(pprof::Label::str(key, value)));
        }
        let label_set = pprof::LabelSet {
            id: Record::from(u64::from(id)),
            labels: labels.as_slice(),
        };
        Record::<pprof::LabelSet, 16, NO_OPT_ZERO>::from(label_set).encode(writer)?;
    }
    Ok(())
}

fn clamp_nanos(duration: Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}

/// Nanoseconds since the Unix epoch, or 0 for times before it.
pub fn unix_nanos(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(clamp_nanos)
        .unwrap_or(0)
}

/// The nanoseconds from start to stop. A stop before start is logged and
/// treated as an empty window.
pub fn duration_nanos(start: SystemTime, stop: SystemTime) -> i64 {
    match stop.duration_since(start) {
        Ok(duration) => clamp_nanos(duration),
        Err(err) => {
            warn!(
                behind_nanos = clamp_nanos(err.duration()),
                "profile stop time is before its start time, using a duration of 0"
            );
            0
        }
    }
}

/// Writes the profile for the CPU samples in `parsed` to `out`. The profile
/// is built in memory and handed to `out` in a single write.
pub fn to_pprof<W: Write + ?Sized>(
    parsed: &ParseResult,
    start: SystemTime,
    stop: SystemTime,
    out: &mut W,
) -> Result<(), ProfileError> {
    let buffer = ProfileEncoder::new(parsed, start, stop).encode_to_vec()?;
    out.write_all(&buffer)?;
    Ok(())
}

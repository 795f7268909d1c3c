// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The decoded execution trace, as produced by a trace decoder. The encoder
//! only reads it.

use crate::collections::FxHashMap;
use serde::{Deserialize, Serialize};

/// Identifies a stack in [`ParseResult::stacks`].
pub type StackId = u64;

/// The kind of a decoded trace event. Only [`EventKind::CpuSample`] is
/// consumed by the encoder; the rest are kept so that a decoded trace can be
/// passed through unchanged, e.g. to the debug dump.
///
/// Kinds are (de)serialized by the names the execution tracer uses, see
/// [`EventKind::name`]. The Rust variant names are accepted as aliases.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum EventKind {
    GoCreate,
    GoStart,
    GoEnd,
    GoStop,
    GoSched,
    GoPreempt,
    GoSleep,
    GoBlock,
    GoUnblock,
    GoSysCall,
    ProcStart,
    ProcStop,
    #[serde(rename = "GCStart", alias = "GcStart")]
    GcStart,
    #[serde(rename = "GCDone", alias = "GcDone")]
    GcDone,
    #[serde(rename = "CPUSample", alias = "CpuSample")]
    CpuSample,
    /// Any kind the decoder reports which isn't named above.
    #[serde(other)]
    Unknown,
}

impl EventKind {
    /// The name the execution tracer uses for this kind of event.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::GoCreate => "GoCreate",
            EventKind::GoStart => "GoStart",
            EventKind::GoEnd => "GoEnd",
            EventKind::GoStop => "GoStop",
            EventKind::GoSched => "GoSched",
            EventKind::GoPreempt => "GoPreempt",
            EventKind::GoSleep => "GoSleep",
            EventKind::GoBlock => "GoBlock",
            EventKind::GoUnblock => "GoUnblock",
            EventKind::GoSysCall => "GoSysCall",
            EventKind::ProcStart => "ProcStart",
            EventKind::ProcStop => "ProcStop",
            EventKind::GcStart => "GCStart",
            EventKind::GcDone => "GCDone",
            EventKind::CpuSample => "CPUSample",
            EventKind::Unknown => "Unknown",
        }
    }

    #[inline]
    pub fn is_cpu_sample(&self) -> bool {
        matches!(self, EventKind::CpuSample)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Event {
    pub kind: EventKind,
    pub goroutine: u64,
    /// Nanoseconds, on the trace's clock.
    pub timestamp: i64,
    pub stack_id: StackId,
}

impl Event {
    pub fn new(kind: EventKind, goroutine: u64, timestamp: i64, stack_id: StackId) -> Self {
        Self {
            kind,
            goroutine,
            timestamp,
            stack_id,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Frame {
    pub pc: u64,
    pub function: String,
    pub file: String,
    pub line: i64,
}

impl Frame {
    pub fn new(pc: u64, function: impl Into<String>, file: impl Into<String>, line: i64) -> Self {
        Self {
            pc,
            function: function.into(),
            file: file.into(),
            line,
        }
    }
}

/// The output of the trace decoder: the events in stream order, and the
/// stacks they refer to. Frames are kept in the order the decoder supplied.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ParseResult {
    pub events: Vec<Event>,
    pub stacks: FxHashMap<StackId, Vec<Frame>>,
}

impl ParseResult {
    /// Returns the frames of the stack, or no frames if the decoder didn't
    /// provide the stack.
    pub fn stack(&self, id: StackId) -> &[Frame] {
        self.stacks.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cpu_samples(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|event| event.kind.is_cpu_sample())
    }
}

// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! Converts the CPU samples of a decoded execution trace into a pprof
//! profile.
//!
//! CPU samples are aggregated per call stack. Each aggregated sample also
//! keeps a breakdown of the individual, timestamped events it was built from,
//! and every event in a breakdown refers to a label set which records the
//! goroutine that was running. Both constructs are extensions to the pprof
//! format, see [`exectrace_pprof_protobuf`].
//!
//! ```
//! use exectrace_pprof::{to_pprof, Event, EventKind, Frame, ParseResult};
//! use std::time::{Duration, SystemTime};
//!
//! let mut parsed = ParseResult::default();
//! parsed.stacks.insert(1, vec![Frame::new(0x1000, "main.work", "main.go", 12)]);
//! parsed.events.push(Event::new(EventKind::CpuSample, 7, 1_000, 1));
//!
//! let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
//! let stop = start + Duration::from_millis(10);
//! let mut out = Vec::new();
//! to_pprof(&parsed, start, stop, &mut out).unwrap();
//! assert!(!out.is_empty());
//! ```

pub mod collections;
pub mod compressor;
pub mod debug_dump;
pub mod encoder;
mod error;
pub mod internal;
pub mod pprof;
mod trace;

pub use encoder::*;
pub use error::*;
pub use trace::*;

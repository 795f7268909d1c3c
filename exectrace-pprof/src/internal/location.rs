// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collections::Id;
use crate::internal::FunctionId;
use exectrace_pprof_protobuf::{self as pprof, Record};

/// The only mapping in the profile. Nothing about the process's memory
/// layout is known, so every location points at it.
pub const SYNTHETIC_MAPPING_ID: u64 = 1;

/// A location is keyed by its program counter, which is also its pprof id.
/// It keeps the function and line of the first frame seen for the PC.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Location {
    pub function_id: FunctionId,
    pub line: i64,
}

impl Location {
    pub fn to_pprof(&self, pc: u64) -> pprof::Location {
        pprof::Location {
            id: Record::from(pc),
            mapping_id: Record::from(SYNTHETIC_MAPPING_ID),
            address: Record::from(pc),
            line: Record::from(pprof::Line {
                function_id: Record::from(self.function_id.to_raw_id()),
                lineno: Record::from(self.line),
            }),
        }
    }
}

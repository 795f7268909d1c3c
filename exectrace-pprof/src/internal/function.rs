// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collections::{small_non_zero_pprof_id, Id, Item};
use exectrace_pprof_protobuf::{self as pprof, Record, StringOffset};
use std::fmt;
use std::num::NonZeroU32;

/// A function is identified by its name and the file it's defined in. The
/// strings are borrowed from the decoded trace.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Function<'a> {
    pub name: &'a str,
    pub filename: &'a str,
}

impl Item for Function<'_> {
    type Id = FunctionId;
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct FunctionId(NonZeroU32);

impl Id for FunctionId {
    type RawId = u64;

    fn from_offset(offset: usize) -> Option<Self> {
        small_non_zero_pprof_id(offset).map(Self)
    }

    fn to_raw_id(&self) -> u64 {
        self.0.get().into()
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FunctionId {
    /// Builds the wire message for the function. The caller interns the
    /// strings, since the string table is owned by the serializer.
    pub fn to_pprof(self, name: StringOffset, filename: StringOffset) -> pprof::Function {
        pprof::Function {
            id: Record::from(self.to_raw_id()),
            name: Record::from(name),
            system_name: Record::default(),
            filename: Record::from(filename),
        }
    }
}

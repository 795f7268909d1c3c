// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::{Record, StringOffset, NO_OPT_ZERO, OPT_ZERO};

/// Describes the mapping of a binary in memory, including its address range,
/// file offset, and metadata like build ID.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
pub struct Mapping {
    /// Unique nonzero id for the mapping.
    pub id: Record<u64, 1, NO_OPT_ZERO>,
    /// Address at which the binary (or DLL) is loaded into memory.
    pub memory_start: Record<u64, 2, OPT_ZERO>,
    /// The limit of the address range occupied by this mapping.
    pub memory_limit: Record<u64, 3, OPT_ZERO>,
    /// Offset in the binary that corresponds to the first mapped address.
    pub file_offset: Record<u64, 4, OPT_ZERO>,
    /// The object this entry is loaded from.
    pub filename: Record<StringOffset, 5, OPT_ZERO>,
    /// A string that uniquely identifies a particular program version with
    /// high probability.
    pub build_id: Record<StringOffset, 6, OPT_ZERO>,
}

impl_message!(Mapping {
    id,
    memory_start,
    memory_limit,
    file_offset,
    filename,
    build_id,
});

#[cfg(feature = "prost_impls")]
impl From<Mapping> for crate::prost_impls::Mapping {
    fn from(mapping: Mapping) -> Self {
        Self::from(&mapping)
    }
}

#[cfg(feature = "prost_impls")]
impl From<&Mapping> for crate::prost_impls::Mapping {
    fn from(mapping: &Mapping) -> Self {
        Self {
            id: mapping.id.value,
            memory_start: mapping.memory_start.value,
            memory_limit: mapping.memory_limit.value,
            file_offset: mapping.file_offset.value,
            filename: mapping.filename.value.into(),
            build_id: mapping.build_id.value.into(),
            has_functions: false,
            has_filenames: false,
            has_line_numbers: false,
            has_inline_frames: false,
        }
    }
}

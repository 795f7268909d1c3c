// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::{Record, NO_OPT_ZERO, OPT_ZERO};

/// Describes function and line table debug information. This only supports a
/// single Line, whereas protobuf supports zero or more. The `is_folded`
/// field is omitted for size/CPU reasons.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
pub struct Location {
    /// Unique nonzero id for the location. A profile could use instruction
    /// addresses or any integer sequence as ids.
    pub id: Record<u64, 1, NO_OPT_ZERO>,
    /// The id of the corresponding profile.Mapping for this location.
    /// It can be unset if the mapping is unknown or not applicable for
    /// this profile type.
    pub mapping_id: Record<u64, 2, OPT_ZERO>,
    /// The instruction address for this location, if available. A non-leaf
    /// address may be in the middle of a call instruction. It is up to
    /// display tools to find the beginning of the instruction if necessary.
    pub address: Record<u64, 3, OPT_ZERO>,
    pub line: Record<Line, 4, OPT_ZERO>,
}

/// Represents function and line number information. Omits column.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
pub struct Line {
    /// The id of the corresponding profile.Function for this line.
    pub function_id: Record<u64, 1, OPT_ZERO>,
    /// Line number in source code.
    pub lineno: Record<i64, 2, OPT_ZERO>,
}

impl_message!(Line { function_id, lineno });

#[cfg(feature = "prost_impls")]
impl From<Line> for crate::prost_impls::Line {
    fn from(line: Line) -> Self {
        Self {
            function_id: line.function_id.value,
            line: line.lineno.value,
            column: 0,
        }
    }
}

impl_message!(Location { id, mapping_id, address, line });

#[cfg(feature = "prost_impls")]
impl From<&Location> for crate::prost_impls::Location {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id.value,
            mapping_id: location.mapping_id.value,
            address: location.address.value,
            lines: if location.line == Default::default() {
                Vec::new()
            } else {
                vec![crate::prost_impls::Line::from(location.line.value)]
            },
            is_folded: false,
        }
    }
}

#[cfg(feature = "prost_impls")]
impl From<Location> for crate::prost_impls::Location {
    fn from(location: Location) -> Self {
        Self::from(&location)
    }
}

#[cfg(all(test, feature = "prost_impls"))]
mod tests {
    use super::*;
    use crate::{prost_impls, Value};
    use prost::Message;

    #[track_caller]
    fn test(location: &Location) {
        let mut buffer = Vec::new();
        let prost_location = prost_impls::Location::from(location);

        location.encode(&mut buffer).unwrap();
        let roundtrip = prost_impls::Location::decode(buffer.as_slice()).unwrap();
        assert_eq!(prost_location, roundtrip);
    }

    #[test]
    fn program_counter_as_id() {
        let location = Location {
            id: Record::from(0x45_6789),
            mapping_id: Record::from(1),
            address: Record::from(0x45_6789),
            line: Record::from(Line {
                function_id: Record::from(1),
                lineno: Record::from(42),
            }),
        };
        test(&location);
    }

    #[test]
    fn roundtrip() {
        bolero::check!().with_type::<Location>().for_each(test);
    }
}

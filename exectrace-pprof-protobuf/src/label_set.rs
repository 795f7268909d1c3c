// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::{Label, Record, Value, WireType, NO_OPT_ZERO};
use std::io::{self, Write};

/// A LabelSet is an extension to the pprof format: an identified, ordered
/// collection of labels which breakdown entries refer to by id, rather than
/// repeating the labels on every sample. It is emitted as
/// `Profile.label_set = 16`.
///
/// Ids are dense and begin at zero, so the id is never zero-optimized.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LabelSet<'a> {
    pub id: Record<u64, 1, NO_OPT_ZERO>,
    pub labels: &'a [Record<Label, 2, NO_OPT_ZERO>],
}

/// # Safety
/// The Default implementation will return all zero-representations.
unsafe impl Value for LabelSet<'_> {
    const WIRE_TYPE: WireType = WireType::LengthDelimited;

    fn proto_len(&self) -> u64 {
        self.id.proto_len() + self.labels.iter().map(Record::proto_len).sum::<u64>()
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.id.encode(writer)?;
        for label in self.labels {
            label.encode(writer)?;
        }
        Ok(())
    }
}

#[cfg(feature = "prost_impls")]
impl From<LabelSet<'_>> for crate::prost_impls::LabelSet {
    fn from(label_set: LabelSet) -> Self {
        Self {
            id: label_set.id.value,
            labels: label_set
                .labels
                .iter()
                .map(|record| crate::prost_impls::Label::from(record.value))
                .collect(),
        }
    }
}

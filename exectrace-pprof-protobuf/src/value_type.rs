// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::{Record, StringOffset, OPT_ZERO};

/// ValueType describes the semantics and measurement units of a value. It is
/// used for both `Profile.sample_type` and `Profile.period_type`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
pub struct ValueType {
    pub r#type: Record<StringOffset, 1, OPT_ZERO>,
    pub unit: Record<StringOffset, 2, OPT_ZERO>,
}

impl ValueType {
    pub fn new(r#type: StringOffset, unit: StringOffset) -> Self {
        Self {
            r#type: Record::from(r#type),
            unit: Record::from(unit),
        }
    }
}

impl_message!(ValueType { r#type, unit });

#[cfg(feature = "prost_impls")]
impl From<ValueType> for crate::prost_impls::ValueType {
    fn from(value: ValueType) -> Self {
        Self::from(&value)
    }
}

#[cfg(feature = "prost_impls")]
impl From<&ValueType> for crate::prost_impls::ValueType {
    fn from(value: &ValueType) -> Self {
        Self {
            r#type: value.r#type.value.into(),
            unit: value.unit.value.into(),
        }
    }
}
